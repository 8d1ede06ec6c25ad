use image::{GrayImage, Rgba, RgbaImage};

pub const DPI: u32 = 300;
pub const CM_TO_INCH: f64 = 0.3937007874;
pub const WIDTH_CM: f64 = 7.6;
pub const HEIGHT_CM: f64 = 10.1;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Distance between the edges, matching how the panel is measured.
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Printed size of the sticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
    pub dpi: u32,
}

impl PhysicalSize {
    pub const STICKER: PhysicalSize = PhysicalSize {
        width_cm: WIDTH_CM,
        height_cm: HEIGHT_CM,
        dpi: DPI,
    };

    pub fn pixels(&self) -> (u32, u32) {
        let to_px = |cm: f64| (cm * CM_TO_INCH * self.dpi as f64) as u32;
        (to_px(self.width_cm), to_px(self.height_cm))
    }

    /// PDF user-space points (1/72 inch).
    pub fn points(&self) -> (f64, f64) {
        let to_pt = |cm: f64| cm / 2.54 * 72.0;
        (to_pt(self.width_cm), to_pt(self.height_cm))
    }
}

/// Layout regions of the card, all derived from the pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    /// First row of the yellow band.
    pub split_y: u32,
    pub panel: PixelRect,
    pub panel_radius: u32,
}

impl CanvasGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let radius = (width.min(height) as f64 * 0.0999) as u32;
        let split_y = (height as f64 * 0.72) as u32;
        let inset = (width as f64 * 0.035) as u32;
        let panel = PixelRect::new(inset, inset, width - 1 - inset, split_y - inset);
        let panel_radius = (radius as f64 * 0.65) as u32;

        Self {
            width,
            height,
            radius,
            split_y,
            panel,
            panel_radius,
        }
    }

    pub fn for_size(size: &PhysicalSize) -> Self {
        let (width, height) = size.pixels();
        Self::new(width, height)
    }

    pub fn outer(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width - 1, self.height - 1)
    }

    pub fn band(&self) -> PixelRect {
        PixelRect::new(0, self.split_y, self.width - 1, self.height - 1)
    }

    pub fn band_height(&self) -> u32 {
        self.height - self.split_y
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self::for_size(&PhysicalSize::STICKER)
    }
}

/// Fill every pixel of `rect` (clipped to the canvas).
pub fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>) {
    let x1 = rect.x1.min(canvas.width().saturating_sub(1));
    let y1 = rect.y1.min(canvas.height().saturating_sub(1));
    for y in rect.y0..=y1 {
        for x in rect.x0..=x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Fill `rect` with circular corners of `radius`. A pixel belongs to a corner
/// when its center lies within the corner circle.
pub fn fill_rounded_rect(canvas: &mut RgbaImage, rect: PixelRect, radius: u32, color: Rgba<u8>) {
    let w = rect.width() + 1;
    let h = rect.height() + 1;
    let r = radius.min(w / 2).min(h / 2) as f64;

    let left = rect.x0 as f64 + r;
    let right = (rect.x1 + 1) as f64 - r;
    let top = rect.y0 as f64 + r;
    let bottom = (rect.y1 + 1) as f64 - r;

    let x1 = rect.x1.min(canvas.width().saturating_sub(1));
    let y1 = rect.y1.min(canvas.height().saturating_sub(1));
    for y in rect.y0..=y1 {
        let cy = y as f64 + 0.5;
        for x in rect.x0..=x1 {
            let cx = x as f64 + 0.5;
            let dx = if cx < left {
                left - cx
            } else if cx > right {
                cx - right
            } else {
                0.0
            };
            let dy = if cy < top {
                top - cy
            } else if cy > bottom {
                cy - bottom
            } else {
                0.0
            };
            if dx * dx + dy * dy <= r * r {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Copy a greyscale bitmap onto the canvas as opaque pixels, clipping at the
/// edges.
pub fn paste_gray(canvas: &mut RgbaImage, bitmap: &GrayImage, x: i64, y: i64) {
    let rgba = RgbaImage::from_fn(bitmap.width(), bitmap.height(), |px, py| {
        let v = bitmap.get_pixel(px, py).0[0];
        Rgba([v, v, v, 255])
    });
    image::imageops::replace(canvas, &rgba, x, y);
}
