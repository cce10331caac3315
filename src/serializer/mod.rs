//! Обобщённый сериализатор: кодировщик → сжатие → Base64.
//!
//! ## Конвейер
//!
//! Кодирование: `T → [bincode | JSON] → [Gzip | Zlib]? → [Base64]?`.
//! Base64 применяется только в строковых формах.
//!
//! Декодирование идёт в обратном порядке. Если настроенный кодировщик не
//! смог прочитать данные, пробуется второй из пары bincode/json (см.
//! [`SerializerConfig::strict_decode`]). Настройки сжатия и Base64 при этом
//! не подбираются.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use zipx::{codec::CompressionKind, serializer::{EncoderKind, Serializer}};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Event {
//!     id: u64,
//!     body: String,
//! }
//!
//! let serializer = Serializer::<Event>::new()
//!     .with_encoder(EncoderKind::Json)
//!     .with_compression(CompressionKind::Zlib);
//!
//! let event = Event { id: 1, body: "hello".into() };
//! let wire = serializer.encode_to_string(&event)?;
//! assert_eq!(serializer.decode_from_string(&wire)?, event);
//! # Ok::<(), zipx_error::CodecError>(())
//! ```

mod config;
mod format;
mod stats;

pub use config::{EncoderKind, SerializerConfig};
pub use stats::{BenchmarkResult, SerializerStats};

use std::{borrow::Cow, fmt, hint::black_box, sync::Arc, time::Instant};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};
use zipx_error::{ensure, CodecError, CodecResult, ResultExt, StatusCode, ZipxResult};

use crate::codec::CompressionKind;

/// Пользовательский кодировщик, полностью заменяющий конвейер.
pub type EncodeFn<T> = Arc<dyn Fn(&T) -> CodecResult<Vec<u8>> + Send + Sync>;

/// Пользовательский декодировщик, полностью заменяющий конвейер.
pub type DecodeFn<T> = Arc<dyn Fn(&[u8]) -> CodecResult<T> + Send + Sync>;

/// Сериализатор значений типа `T`.
///
/// Хранит только неизменяемую конфигурацию, поэтому один экземпляр можно
/// использовать из любого числа потоков.
pub struct Serializer<T> {
    config: SerializerConfig,
    custom_encoder: Option<EncodeFn<T>>,
    custom_decoder: Option<DecodeFn<T>>,
}

////////////////////////////////////////////////////////////////////////////////
// Построение
////////////////////////////////////////////////////////////////////////////////

impl<T> Serializer<T> {
    /// bincode, без сжатия, Base64 включён.
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self {
            config,
            custom_encoder: None,
            custom_decoder: None,
        }
    }

    pub fn with_encoder(
        mut self,
        encoder: EncoderKind,
    ) -> Self {
        self.config.encoder = encoder;
        self
    }

    pub fn with_compression(
        mut self,
        compression: CompressionKind,
    ) -> Self {
        self.config.compression = compression;
        self
    }

    pub fn with_base64(
        mut self,
        enabled: bool,
    ) -> Self {
        self.config.base64 = enabled;
        self
    }

    pub fn with_strict_decode(
        mut self,
        strict: bool,
    ) -> Self {
        self.config.strict_decode = strict;
        self
    }

    /// Заменяет весь конвейер кодирования. Сжатие и кодировщик не
    /// применяются.
    pub fn with_custom_encoder<F>(
        mut self,
        encoder: F,
    ) -> Self
    where
        F: Fn(&T) -> CodecResult<Vec<u8>> + Send + Sync + 'static,
    {
        self.custom_encoder = Some(Arc::new(encoder));
        self
    }

    /// Заменяет весь конвейер декодирования.
    pub fn with_custom_decoder<F>(
        mut self,
        decoder: F,
    ) -> Self
    where
        F: Fn(&[u8]) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.custom_decoder = Some(Arc::new(decoder));
        self
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }
}

////////////////////////////////////////////////////////////////////////////////
// Конвейер
////////////////////////////////////////////////////////////////////////////////

impl<T> Serializer<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Кодирует значение настроенным конвейером.
    pub fn encode(
        &self,
        value: &T,
    ) -> CodecResult<Vec<u8>> {
        if let Some(encoder) = &self.custom_encoder {
            return encoder(value);
        }

        let encoded = format::encode(self.config.encoder, value)?;
        let out = match self.config.compression {
            CompressionKind::None => encoded,
            kind => kind.compress(&encoded)?,
        };

        trace!(
            encoder = %self.config.encoder,
            compression = %self.config.compression,
            size = out.len(),
            "value encoded"
        );
        Ok(out)
    }

    /// `encode` и затем Base64 (если включён).
    ///
    /// Без Base64 байты должны быть корректным UTF-8, иначе возвращается
    /// [`CodecError::EncodeFailure`]. Для двоичных конвейеров (bincode или
    /// любое сжатие) без Base64 используйте [`Serializer::encode`].
    pub fn encode_to_string(
        &self,
        value: &T,
    ) -> CodecResult<String> {
        let bytes = self.encode(value)?;

        if self.config.base64 {
            Ok(STANDARD.encode(bytes))
        } else {
            String::from_utf8(bytes).map_err(|e| CodecError::encode_failure("utf-8", e))
        }
    }

    /// Декодирует байты, полученные от [`Serializer::encode`].
    pub fn decode(
        &self,
        data: &[u8],
    ) -> CodecResult<T> {
        if data.is_empty() {
            return Err(CodecError::EmptyInput { stage: "decode" });
        }

        if let Some(decoder) = &self.custom_decoder {
            return decoder(data);
        }

        let payload = match self.config.compression {
            CompressionKind::None => Cow::Borrowed(data),
            kind => Cow::Owned(kind.decompress(data)?),
        };

        format::decode_permissive(self.config.encoder, self.config.strict_decode, &payload)
    }

    /// Декодирует строку, полученную от [`Serializer::encode_to_string`].
    ///
    /// Если Base64 включён, но строка им не является, её байты используются
    /// как есть: так принимаются и старые незакодированные данные.
    pub fn decode_from_string(
        &self,
        data: &str,
    ) -> CodecResult<T> {
        if data.is_empty() {
            return Err(CodecError::EmptyInput {
                stage: "decode_from_string",
            });
        }

        let bytes = if self.config.base64 {
            match STANDARD.decode(data) {
                Ok(decoded) => Cow::Owned(decoded),
                Err(e) => {
                    debug!(error = %e, len = data.len(), "input is not base64, using raw bytes");
                    Cow::Borrowed(data.as_bytes())
                }
            }
        } else {
            Cow::Borrowed(data.as_bytes())
        };

        self.decode(&bytes)
    }

    /// Размеры bincode, JSON и полного конвейера для `value`.
    pub fn stats(
        &self,
        value: &T,
    ) -> SerializerStats {
        let size_of = |res: CodecResult<Vec<u8>>| res.map(|b| b.len()).unwrap_or(0);

        SerializerStats::new(
            self.config.encoder,
            self.config.compression,
            size_of(format::encode(EncoderKind::Bincode, value)),
            size_of(format::encode(EncoderKind::Json, value)),
            size_of(self.encode(value)),
        )
    }

    /// `iterations` вызовов `encode`, затем `iterations` вызовов `decode`.
    pub fn benchmark(
        &self,
        value: &T,
        iterations: usize,
    ) -> ZipxResult<BenchmarkResult> {
        ensure!(
            iterations > 0,
            StatusCode::InvalidArgs,
            "benchmark needs at least one iteration"
        );

        let start = Instant::now();
        let mut encoded = Vec::new();
        for i in 0..iterations {
            let bytes = self
                .encode(black_box(value))
                .with_context(|| format!("benchmark encode iteration {i}"))?;
            encoded = black_box(bytes);
        }
        let encode_total = start.elapsed();

        let start = Instant::now();
        for i in 0..iterations {
            let decoded = self
                .decode(black_box(&encoded))
                .with_context(|| format!("benchmark decode iteration {i}"))?;
            black_box(decoded);
        }
        let decode_total = start.elapsed();

        let per_op = |total: std::time::Duration| total.div_f64(iterations as f64);

        let result = BenchmarkResult {
            encoder: self.config.encoder,
            compression: self.config.compression,
            iterations,
            avg_encode: per_op(encode_total),
            avg_decode: per_op(decode_total),
            encoded_size: encoded.len(),
        };

        debug!(%result, "serializer benchmark finished");
        Ok(result)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<T> Default for Serializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Serializer<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            custom_encoder: self.custom_encoder.clone(),
            custom_decoder: self.custom_decoder.clone(),
        }
    }
}

impl<T> fmt::Debug for Serializer<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("config", &self.config)
            .field("custom_encoder", &self.custom_encoder.is_some())
            .field("custom_decoder", &self.custom_decoder.is_some())
            .finish()
    }
}
