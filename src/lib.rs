//! zipx: пулы кодеков сжатия (Gzip, Zlib) и обобщённый сериализатор
//! `кодировщик → сжатие → Base64`.

/// Кодеки сжатия и пулы их состояний.
pub mod codec;
/// Настройки кодеков (файл/окружение `ZIPX_*`).
pub mod config;
/// Логирование на базе `tracing`.
pub mod logging;
/// Ограниченный пул переиспользуемых объектов.
pub mod pool;
/// Сериализатор значений с настраиваемым конвейером.
pub mod serializer;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use codec::{pool_stats, Codec, CodecPoolStats, CompressionKind, Gzip, Zlib, ZLIB_PREFIX};
pub use config::{init, settings, CodecSettings};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use pool::{Pool, PoolStats, Pooled};
pub use serializer::{
    BenchmarkResult, EncoderKind, Serializer, SerializerConfig, SerializerStats,
};
pub use zipx_error::{CodecError, CodecResult, ErrorExt, StackError, StatusCode, ZipxResult};
