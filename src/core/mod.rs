pub mod canvas;
pub mod caption;
pub mod composer;
pub mod engine;
pub mod export;
pub mod font;
pub mod glyphs;
pub mod payload;
pub mod qr;
