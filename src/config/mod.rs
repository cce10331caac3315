//! Конфигурация кодеков.

mod settings;

pub use settings::{init, settings, CodecSettings, MAX_COMPRESSION_LEVEL};
