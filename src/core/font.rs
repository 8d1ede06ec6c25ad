use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};

use crate::core::glyphs::{self, CELL_HEIGHT, CELL_WIDTH, SPACING};

/// Bold and sans-serif fonts tried in order before the bundled font.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "Arial Bold.ttf",
    "Arial-Bold.ttf",
    "Arial.ttf",
    "Arial Black.ttf",
    "/Library/Fonts/Arial Black.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-ExtraBold.ttf",
    "/Library/Fonts/HelveticaNeue.ttc",
    "/System/Library/Fonts/SFNS.ttf",
];

/// Ink size of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

// Ink box relative to the layout origin (left edge, top of the em box).
#[derive(Debug, Clone, Copy, Default)]
struct InkBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl InkBox {
    fn extent(&self) -> TextExtent {
        TextExtent {
            width: (self.right - self.left).max(0) as u32,
            height: (self.bottom - self.top).max(0) as u32,
        }
    }
}

pub enum Typeface {
    /// TrueType/OpenType font loaded from disk
    Outline(Font<'static>),
    /// The bundled bitmap font
    Bitmap,
}

impl Typeface {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Typeface::Bitmap)
    }

    /// Ink extent of `text` at `size`.
    ///
    /// For outline fonts `size` is the rusttype scale: the pixel distance
    /// from ascent to descent, which is smaller than an em-size point of the
    /// same number. The bitmap font scales its cell by whole multiples, never
    /// above `size` and never below one cell.
    pub fn measure(&self, text: &str, size: u32) -> TextExtent {
        self.ink_box(text, size).extent()
    }

    fn ink_box(&self, text: &str, size: u32) -> InkBox {
        match self {
            Typeface::Outline(font) => outline_ink_box(font, text, size),
            Typeface::Bitmap => {
                let scale = bitmap_scale(size) as i32;
                let count = text.chars().count() as i32;
                if count == 0 {
                    return InkBox::default();
                }
                let advance = (CELL_WIDTH + SPACING) as i32 * scale;
                InkBox {
                    left: 0,
                    top: 0,
                    right: count * advance - SPACING as i32 * scale,
                    bottom: CELL_HEIGHT as i32 * scale,
                }
            }
        }
    }

    /// Draw `text` so its ink box starts at `top_left`. A positive `stroke`
    /// thickens every glyph by that radius in pixels.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: u32,
        top_left: (i32, i32),
        color: Rgba<u8>,
        stroke: f32,
    ) {
        let ink = self.ink_box(text, size);
        let origin = (top_left.0 - ink.left, top_left.1 - ink.top);

        let reach = stroke.max(0.0).ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 > stroke * stroke {
                    continue;
                }
                let at = (origin.0 + dx, origin.1 + dy);
                match self {
                    Typeface::Outline(font) => draw_outline(canvas, font, text, size, at, color),
                    Typeface::Bitmap => draw_bitmap(canvas, text, size, at, color),
                }
            }
        }
    }
}

fn bitmap_scale(size: u32) -> u32 {
    (size / CELL_HEIGHT).max(1)
}

fn outline_ink_box(font: &Font<'static>, text: &str, size: u32) -> InkBox {
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;

    let mut ink: Option<InkBox> = None;
    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            ink = Some(match ink {
                None => InkBox {
                    left: bb.min.x,
                    top: bb.min.y,
                    right: bb.max.x,
                    bottom: bb.max.y,
                },
                Some(acc) => InkBox {
                    left: acc.left.min(bb.min.x),
                    top: acc.top.min(bb.min.y),
                    right: acc.right.max(bb.max.x),
                    bottom: acc.bottom.max(bb.max.y),
                },
            });
        }
    }
    ink.unwrap_or_default()
}

fn draw_outline(
    canvas: &mut RgbaImage,
    font: &Font<'static>,
    text: &str,
    size: u32,
    origin: (i32, i32),
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;

    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let x = origin.0 + bb.min.x + gx as i32;
                let y = origin.1 + bb.min.y + gy as i32;
                blend(canvas, x, y, color, coverage);
            });
        }
    }
}

fn draw_bitmap(canvas: &mut RgbaImage, text: &str, size: u32, origin: (i32, i32), color: Rgba<u8>) {
    let scale = bitmap_scale(size) as i32;
    let advance = (CELL_WIDTH + SPACING) as i32 * scale;

    for (i, ch) in text.chars().enumerate() {
        let rows = glyphs::glyph(ch).unwrap_or(glyphs::MISSING);
        let cell_x = origin.0 + i as i32 * advance;
        for cy in 0..CELL_HEIGHT {
            for cx in 0..CELL_WIDTH {
                if !glyphs::is_set(&rows, cx, cy) {
                    continue;
                }
                let x0 = cell_x + cx as i32 * scale;
                let y0 = origin.1 + cy as i32 * scale;
                for y in y0..y0 + scale {
                    for x in x0..x0 + scale {
                        blend(canvas, x, y, color, 1.0);
                    }
                }
            }
        }
    }
}

/// Alpha-blend `color` onto the pixel at `(x, y)`; out of bounds is ignored.
pub fn blend(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let a = coverage.clamp(0.0, 1.0) * color.0[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let inv = 1.0 - a;
    for c in 0..3 {
        dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * inv).round() as u8;
    }
    dst.0[3] = (255.0 * a + dst.0[3] as f32 * inv).round() as u8;
}

/// Supplies the bold typeface used for caption text.
pub trait FontResolver: Send + Sync {
    /// Never fails: implementations fall back to the bundled bitmap font.
    fn resolve_bold(&self) -> Typeface;
}

/// Tries font files in order and keeps the first one that parses.
#[derive(Debug, Clone)]
pub struct FontCandidates {
    paths: Vec<PathBuf>,
}

impl FontCandidates {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for FontCandidates {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_CANDIDATES.iter().copied())
    }
}

impl FontResolver for FontCandidates {
    fn resolve_bold(&self) -> Typeface {
        for path in &self.paths {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match Font::try_from_vec(bytes) {
                Some(font) => {
                    tracing::debug!("using font {}", path.display());
                    return Typeface::Outline(font);
                }
                None => tracing::debug!("{} is not a usable font", path.display()),
            }
        }
        tracing::warn!(
            "none of {} font candidates could be loaded, using bundled bitmap font",
            self.paths.len()
        );
        Typeface::Bitmap
    }
}

/// Always hands out the bundled bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

impl FontResolver for BuiltinFont {
    fn resolve_bold(&self) -> Typeface {
        Typeface::Bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_candidates_fall_back() {
        let resolver = FontCandidates::new(["/nonexistent/font-a.ttf", "/nonexistent/font-b.ttf"]);
        assert!(resolver.resolve_bold().is_builtin());
    }

    #[test]
    fn test_unparsable_candidate_is_skipped() {
        let path = std::env::temp_dir().join("sticker-engine-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let resolver = FontCandidates::new([path.clone()]);
        assert!(resolver.resolve_bold().is_builtin());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_bitmap_measure_scales_with_size() {
        let face = BuiltinFont.resolve_bold();
        assert_eq!(face.measure("AB", 10), TextExtent { width: 11, height: 10 });
        assert_eq!(face.measure("AB", 40), TextExtent { width: 44, height: 40 });
        // sizes under one cell still draw at scale 1
        assert_eq!(face.measure("A", 4), TextExtent { width: 5, height: 10 });
        assert_eq!(face.measure("", 40), TextExtent::default());
    }

    #[test]
    fn test_bitmap_draw_lands_at_top_left() {
        let face = Typeface::Bitmap;
        let mut canvas = RgbaImage::from_pixel(40, 30, Rgba([255, 255, 255, 255]));
        face.draw(&mut canvas, "I", 20, (10, 5), Rgba([0, 0, 0, 255]), 0.0);

        // 'I' top bar starts on body row 0, i.e. cell row 2, columns 1..4
        assert_eq!(canvas.get_pixel(10 + 2, 5 + 4).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(10, 5).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(9, 9).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_stroke_thickens_ink() {
        let face = Typeface::Bitmap;
        let white = Rgba([255, 255, 255, 255]);
        let black = Rgba([0, 0, 0, 255]);

        let mut plain = RgbaImage::from_pixel(40, 30, white);
        face.draw(&mut plain, "I", 20, (10, 5), black, 0.0);
        let mut stroked = RgbaImage::from_pixel(40, 30, white);
        face.draw(&mut stroked, "I", 20, (10, 5), black, 1.5);

        let ink = |img: &RgbaImage| img.pixels().filter(|p| p.0[0] == 0).count();
        assert!(ink(&stroked) > ink(&plain));
    }

    // Outline tests need a font on the host; they pass vacuously without one.
    fn system_font() -> Option<Typeface> {
        let face = FontCandidates::default().resolve_bold();
        if face.is_builtin() {
            eprintln!("no system font found, skipping outline font check");
            return None;
        }
        Some(face)
    }

    #[test]
    fn test_outline_measure_grows_with_size() {
        let Some(face) = system_font() else { return };
        let small = face.measure("ARAÇ SAHİBİNE", 20);
        let large = face.measure("ARAÇ SAHİBİNE", 80);
        assert!(small.width > 0 && small.height > 0);
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn test_outline_height_stays_within_scale() {
        let Some(face) = system_font() else { return };
        let extent = face.measure("ULAŞMAK", 100);
        assert!(extent.height <= 102, "{:?}", extent);
    }

    #[test]
    fn test_outline_draw_lands_at_top_left() {
        let Some(face) = system_font() else { return };
        let white = Rgba([255, 255, 255, 255]);
        let mut canvas = RgbaImage::from_pixel(400, 120, white);
        let top_left = (30, 20);
        face.draw(&mut canvas, "ARAÇ", 60, top_left, Rgba([0, 0, 0, 255]), 0.0);

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != white.0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        let first_col = inked.iter().map(|&(x, _)| x).min().unwrap() as i32;
        let first_row = inked.iter().map(|&(_, y)| y).min().unwrap() as i32;

        // the pixel box rounds outward, so its edge row may carry no coverage
        assert!((top_left.0..=top_left.0 + 1).contains(&first_col), "column {}", first_col);
        assert!((top_left.1..=top_left.1 + 1).contains(&first_row), "row {}", first_row);
    }

    #[test]
    fn test_blend_ignores_out_of_bounds() {
        let mut canvas = RgbaImage::new(2, 2);
        blend(&mut canvas, -1, 0, Rgba([0, 0, 0, 255]), 1.0);
        blend(&mut canvas, 2, 2, Rgba([0, 0, 0, 255]), 1.0);
        blend(&mut canvas, 1, 1, Rgba([10, 20, 30, 255]), 1.0);
        assert_eq!(canvas.get_pixel(1, 1).0, [10, 20, 30, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
