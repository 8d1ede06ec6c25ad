use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::core::caption::{self, FitConstraints, FittedCaption};
use crate::core::canvas::{self, CanvasGeometry, PixelRect};
use crate::core::font::{FontCandidates, FontResolver, Typeface};
use crate::core::payload::PayloadEncoder;
use crate::core::qr;
use crate::error::Result;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const YELLOW: Rgba<u8> = Rgba([242, 195, 0, 255]);

pub const CAPTION: [&str; 2] = ["ARAÇ SAHİBİNE", "ULAŞMAK İÇİN KODU OKUT"];

const QR_PADDING_RATIO: f64 = 0.035;
const CAPTION_MARGIN_RATIO: f64 = 0.05;
const CAPTION_INITIAL_RATIO: f64 = 0.21;
const CAPTION_MIN_SIZE: u32 = 10;
const CAPTION_STEP: u32 = 2;
const CAPTION_GAP_RATIO: f64 = 0.22;
const CAPTION_SLACK_RATIO: f64 = 0.006;
const CAPTION_LIFT_RATIO: f64 = 0.012;
const CAPTION_STROKE: f32 = 1.5;

/// Lays out the card and draws it for one contact.
pub struct StickerComposer {
    geometry: CanvasGeometry,
    encoder: PayloadEncoder,
    fonts: Arc<dyn FontResolver>,
    caption: Vec<String>,
}

impl StickerComposer {
    pub fn new(encoder: PayloadEncoder) -> Self {
        Self {
            geometry: CanvasGeometry::default(),
            encoder,
            fonts: Arc::new(FontCandidates::default()),
            caption: CAPTION.iter().map(|line| line.to_string()).collect(),
        }
    }

    pub fn with_fonts(mut self, fonts: Arc<dyn FontResolver>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn encoder(&self) -> &PayloadEncoder {
        &self.encoder
    }

    pub fn caption_constraints(&self) -> FitConstraints {
        let g = &self.geometry;
        FitConstraints {
            max_width: g.width - (g.width as f64 * CAPTION_MARGIN_RATIO) as u32,
            max_height: g.band_height() - (g.height as f64 * CAPTION_SLACK_RATIO) as u32,
            initial_size: (g.height as f64 * CAPTION_INITIAL_RATIO) as u32,
            min_size: CAPTION_MIN_SIZE,
            step: CAPTION_STEP,
            line_gap_ratio: CAPTION_GAP_RATIO,
        }
    }

    pub fn compose(&self, name: &str, phone: &str) -> Result<RgbaImage> {
        let g = &self.geometry;
        let mut img = RgbaImage::new(g.width, g.height);

        canvas::fill_rounded_rect(&mut img, g.outer(), g.radius, BLACK);

        // yellow band: round only the bottom corners
        canvas::fill_rounded_rect(&mut img, g.band(), g.radius, YELLOW);
        canvas::fill_rect(
            &mut img,
            PixelRect::new(0, g.split_y, g.width - 1, g.split_y + g.radius),
            YELLOW,
        );

        canvas::fill_rounded_rect(&mut img, g.panel, g.panel_radius, WHITE);

        self.place_qr(&mut img, name, phone)?;
        self.draw_caption(&mut img);

        Ok(img)
    }

    fn place_qr(&self, img: &mut RgbaImage, name: &str, phone: &str) -> Result<()> {
        let panel = self.geometry.panel;
        let payload = self.encoder.encode(name, phone);

        let padding = (panel.width().min(panel.height()) as f64 * QR_PADDING_RATIO) as u32;
        let max_w = panel.width().saturating_sub(padding).max(10);
        let max_h = panel.height().saturating_sub(padding).max(10);

        let bitmap = qr::rasterize(&payload, max_w, max_h, 0)?;
        let x = panel.x0 as i64 + (panel.width() as i64 - bitmap.image.width() as i64) / 2;
        let y = panel.y0 as i64 + (panel.height() as i64 - bitmap.image.height() as i64) / 2;
        tracing::debug!(
            "QR {} modules at {}px/module placed at ({}, {})",
            bitmap.fit.modules,
            bitmap.fit.module_px,
            x,
            y
        );
        canvas::paste_gray(img, &bitmap.image, x, y);

        Ok(())
    }

    /// Fit the caption into the band with the resolved typeface.
    pub fn fit_caption(&self) -> FittedCaption {
        self.fit_with(&self.fonts.resolve_bold())
    }

    fn fit_with(&self, face: &Typeface) -> FittedCaption {
        let lines: Vec<&str> = self.caption.iter().map(String::as_str).collect();
        caption::fit(&lines, &self.caption_constraints(), |text, size| {
            face.measure(text, size)
        })
    }

    fn draw_caption(&self, img: &mut RgbaImage) {
        let g = &self.geometry;
        let face = self.fonts.resolve_bold();
        let fitted = self.fit_with(&face);

        let band_h = g.band_height() as i32;
        let lift = (g.height as f64 * CAPTION_LIFT_RATIO) as i32;
        let start_y = g.split_y as i32 + (band_h - fitted.total_height as i32) / 2 - lift;

        for (i, line) in self.caption.iter().enumerate() {
            let line_w = face.measure(line, fitted.font_size).width as i32;
            let x = (g.width as i32 - line_w) / 2;
            let y = start_y + i as i32 * (fitted.line_height + fitted.gap) as i32;
            face.draw(img, line, fitted.font_size, (x, y), BLACK, CAPTION_STROKE);
        }
    }
}
