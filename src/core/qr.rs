use image::{GrayImage, Luma};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{Result, StickerError};

/// Light modules drawn around the symbol on every side.
pub const BORDER_MODULES: u32 = 2;

/// Smallest module size that still scans reliably from a printed sticker.
pub const MIN_MODULE_PX: u32 = 10;

/// How a symbol was laid out in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrFit {
    /// Modules per side, without the border
    pub modules: u32,
    pub module_px: u32,
    pub border_modules: u32,
}

impl QrFit {
    /// Edge length of the rendered bitmap in pixels.
    pub fn side_px(&self) -> u32 {
        (self.modules + 2 * self.border_modules) * self.module_px
    }

    /// `true` when the legibility floor pushed the bitmap past the box.
    pub fn overflows(&self, max_w: u32, max_h: u32, extra_border_px: u32) -> bool {
        let side = self.side_px();
        let border = extra_border_px.saturating_mul(2);
        side > max_w.saturating_sub(border) || side > max_h.saturating_sub(border)
    }
}

#[derive(Debug, Clone)]
pub struct QrBitmap {
    pub image: GrayImage,
    pub fit: QrFit,
}

fn encode_high(payload: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H).map_err(|e| match e {
        QrError::DataTooLong => StickerError::EncodingCapacity { len: payload.len() },
        other => StickerError::from(other),
    })
}

/// Module count per side for `payload` at level H.
pub fn probe_modules(payload: &str) -> Result<u32> {
    let code = encode_high(payload)?;
    Ok(code.width() as u32)
}

/// Largest integer module size for which the symbol plus its border fits the
/// box, clamped up to [`MIN_MODULE_PX`].
pub fn fit_module_px(modules: u32, max_w: u32, max_h: u32, extra_border_px: u32) -> u32 {
    let border = extra_border_px.saturating_mul(2);
    let avail_w = max_w.saturating_sub(border);
    let avail_h = max_h.saturating_sub(border);
    let span = modules + 2 * BORDER_MODULES;

    let module_px = (avail_w / span).min(avail_h / span);
    module_px.max(MIN_MODULE_PX)
}

/// Render `payload` as a crisp bitmap that fits `max_w` x `max_h`.
///
/// The symbol is encoded twice: once with unit modules to learn its size, then
/// again drawn natively at the chosen module size. The bitmap is never
/// resampled, so module edges stay sharp.
pub fn rasterize(payload: &str, max_w: u32, max_h: u32, extra_border_px: u32) -> Result<QrBitmap> {
    let modules = probe_modules(payload)?;
    let module_px = fit_module_px(modules, max_w, max_h, extra_border_px);

    let fit = QrFit {
        modules,
        module_px,
        border_modules: BORDER_MODULES,
    };
    if fit.overflows(max_w, max_h, extra_border_px) {
        tracing::debug!(
            "QR of {} modules needs {}px, box is {}x{}",
            modules,
            fit.side_px(),
            max_w,
            max_h
        );
    }

    let code = encode_high(payload)?;
    let image = render_modules(&code, fit);

    Ok(QrBitmap { image, fit })
}

fn render_modules(code: &QrCode, fit: QrFit) -> GrayImage {
    let width = code.width();
    let colors = code.to_colors();
    let border_px = fit.border_modules * fit.module_px;
    let side = fit.side_px();

    GrayImage::from_fn(side, side, |x, y| {
        if x < border_px || y < border_px || x >= side - border_px || y >= side - border_px {
            return Luma([255]);
        }
        let mx = ((x - border_px) / fit.module_px) as usize;
        let my = ((y - border_px) / fit.module_px) as usize;
        match colors[my * width + mx] {
            Color::Dark => Luma([0]),
            Color::Light => Luma([255]),
        }
    })
}
