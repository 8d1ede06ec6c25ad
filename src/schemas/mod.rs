pub mod common;
pub mod sticker;
