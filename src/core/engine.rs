use std::sync::Arc;
use std::time::Instant;

use crate::core::canvas::PhysicalSize;
use crate::core::composer::StickerComposer;
use crate::core::export::ExportFormat;
use crate::core::font::{FontCandidates, FontResolver};
use crate::core::payload::PayloadEncoder;
use crate::error::{Result, StickerError};
use crate::settings::Config;

/// A validated, trimmed contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Clone)]
pub struct StickerEngine {
    composer: Arc<StickerComposer>,
    size: PhysicalSize,
}

impl StickerEngine {
    pub fn new(config: &Config) -> Self {
        Self::with_fonts(config, Arc::new(FontCandidates::default()))
    }

    pub fn with_fonts(config: &Config, fonts: Arc<dyn FontResolver>) -> Self {
        let encoder = PayloadEncoder::new(config.qr_payload_mode)
            .with_country_code(config.default_country_code.clone());
        Self::with_composer(StickerComposer::new(encoder).with_fonts(fonts))
    }

    pub fn with_composer(composer: StickerComposer) -> Self {
        Self {
            composer: Arc::new(composer),
            size: PhysicalSize::STICKER,
        }
    }

    pub fn composer(&self) -> &StickerComposer {
        &self.composer
    }

    /// Compose and export on the blocking pool so the reactor stays free.
    pub async fn render(&self, contact: ContactRequest, format: ExportFormat) -> Result<Vec<u8>> {
        let engine = self.clone();

        tokio::task::spawn_blocking(move || engine.render_sync(&contact, format))
            .await
            .map_err(|e| StickerError::Task(e.to_string()))?
    }

    pub fn render_sync(&self, contact: &ContactRequest, format: ExportFormat) -> Result<Vec<u8>> {
        let started = Instant::now();

        let img = self.composer.compose(&contact.name, &contact.phone)?;
        let bytes = format.export(&img, &self.size)?;

        tracing::info!(
            "rendered {:?} sticker, mode={}, {} bytes in {:?}",
            format,
            self.composer.encoder().mode(),
            bytes.len(),
            started.elapsed()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::font::BuiltinFont;

    fn engine() -> StickerEngine {
        StickerEngine::with_fonts(&Config::default(), Arc::new(BuiltinFont))
    }

    fn contact() -> ContactRequest {
        ContactRequest {
            name: "Ahmet Yılmaz".to_string(),
            phone: "05321234567".to_string(),
        }
    }

    #[test]
    fn test_default_mode_is_tel() {
        let engine = engine();
        assert_eq!(
            engine.composer().encoder().encode("Ahmet Yılmaz", "05321234567"),
            "tel:+905321234567"
        );
    }

    #[tokio::test]
    async fn test_render_png() {
        let bytes = engine().render(contact(), ExportFormat::Png).await.unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_render_pdf() {
        let bytes = engine().render(contact(), ExportFormat::Pdf).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
