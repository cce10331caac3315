use std::{fmt, time::Duration};

use serde::Serialize;

use super::EncoderKind;
use crate::codec::CompressionKind;

/// Размеры кодирований одного значения.
///
/// Кодирование, которое завершилось ошибкой, учитывается как 0 байт.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializerStats {
    pub encoder: EncoderKind,
    pub compression: CompressionKind,
    /// Только bincode, без сжатия.
    pub bincode_size: usize,
    /// Только JSON, без сжатия. База для `compression_ratio`.
    pub json_size: usize,
    /// Полный настроенный конвейер (без Base64).
    pub encoded_size: usize,
    /// `encoded_size / json_size`, 0 при пустой базе.
    pub compression_ratio: f64,
    /// Экономия относительно JSON в процентах.
    pub space_saving: f64,
}

impl SerializerStats {
    pub(crate) fn new(
        encoder: EncoderKind,
        compression: CompressionKind,
        bincode_size: usize,
        json_size: usize,
        encoded_size: usize,
    ) -> Self {
        let (compression_ratio, space_saving) = if json_size == 0 {
            (0.0, 0.0)
        } else {
            let ratio = encoded_size as f64 / json_size as f64;
            (ratio, (1.0 - ratio) * 100.0)
        };

        Self {
            encoder,
            compression,
            bincode_size,
            json_size,
            encoded_size,
            compression_ratio,
            space_saving,
        }
    }
}

impl fmt::Display for SerializerStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}+{}: {} bytes (bincode {}, json {}), ratio {:.3}, saving {:.1}%",
            self.encoder,
            self.compression,
            self.encoded_size,
            self.bincode_size,
            self.json_size,
            self.compression_ratio,
            self.space_saving
        )
    }
}

/// Результат [`Serializer::benchmark`](super::Serializer::benchmark).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub encoder: EncoderKind,
    pub compression: CompressionKind,
    pub iterations: usize,
    /// Среднее время одного `encode`.
    pub avg_encode: Duration,
    /// Среднее время одного `decode`.
    pub avg_decode: Duration,
    /// Размер последнего закодированного буфера.
    pub encoded_size: usize,
}

impl fmt::Display for BenchmarkResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}+{} x{}: encode {:?}/op, decode {:?}/op, {} bytes",
            self.encoder,
            self.compression,
            self.iterations,
            self.avg_encode,
            self.avg_decode,
            self.encoded_size
        )
    }
}
