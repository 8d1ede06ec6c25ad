use thiserror::Error;

pub type Result<T> = std::result::Result<T, StickerError>;

#[derive(Error, Debug)]
pub enum StickerError {
    /// Payload does not fit in a version 40 symbol at error correction level H
    #[error("QR payload of {len} bytes exceeds the capacity of error correction level H")]
    EncodingCapacity { len: usize },

    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("render task failed: {0}")]
    Task(String),
}

impl From<qrcode::types::QrError> for StickerError {
    fn from(e: qrcode::types::QrError) -> Self {
        StickerError::QrEncode(e.to_string())
    }
}

impl From<png::EncodingError> for StickerError {
    fn from(e: png::EncodingError) -> Self {
        StickerError::Export(e.to_string())
    }
}

impl From<lopdf::Error> for StickerError {
    fn from(e: lopdf::Error) -> Self {
        StickerError::Export(e.to_string())
    }
}

impl From<std::io::Error> for StickerError {
    fn from(e: std::io::Error) -> Self {
        StickerError::Export(e.to_string())
    }
}
