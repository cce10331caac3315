//! Слой сжатия: Gzip и Zlib поверх общих пулов.
//!
//! ## Архитектура
//!
//! Оба кодека реализуют трейт [`Codec`]. Обязательны только `compress` и
//! `decompress`; многораундовые и объектные формы (JSON → сжатие)
//! реализованы методами по умолчанию, общими для обоих кодеков.
//!
//! ```no_run
//! use zipx::codec::{Codec, Zlib};
//!
//! let packed = Zlib::compress(b"hello hello hello")?;
//! assert_eq!(Zlib::decompress(&packed)?, b"hello hello hello");
//!
//! let framed = Zlib::compress_with_prefix(b"x")?;
//! assert!(framed.starts_with(b"ZLIB:"));
//! # Ok::<(), zipx_error::CodecError>(())
//! ```
//!
//! ## Пулы
//!
//! - буферы записи и чтения (`Vec<u8>`), переиспользуются обоими кодеками;
//! - состояния deflate/inflate для Zlib (`flate2::Compress` и
//!   `flate2::Decompress` поддерживают `reset`);
//! - Gzip-писатель не умеет переключаться на новый приёмник, поэтому
//!   создаётся на каждый вызов поверх буфера из пула.
//!
//! Байты, которые возвращаются вызывающему коду, всегда копируются из
//! pooled-буфера до его возврата в пул.
//!
//! ## Модули
//!
//! - [`gzip`]: кодек Gzip (RFC 1952)
//! - [`zlib`]: кодек Zlib (RFC 1950) и префиксная обёртка `ZLIB:`
//! - [`kind`]: выбор кодека во время выполнения

pub mod gzip;
pub mod kind;
pub mod zlib;

pub use gzip::Gzip;
pub use kind::CompressionKind;
pub use zlib::{Zlib, ZLIB_PREFIX};

use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};
use zipx_error::{CodecError, CodecResult};

use crate::{
    config::{settings, CodecSettings},
    pool::{Pool, PoolStats},
};

/// Имя JSON-кодировщика объектных форм в ошибках.
const JSON: &str = "json";

pub(crate) static WRITE_BUFFERS: Lazy<Pool<Vec<u8>>> =
    Lazy::new(|| buffer_pool("write-buffers", settings()));

pub(crate) static READ_BUFFERS: Lazy<Pool<Vec<u8>>> =
    Lazy::new(|| buffer_pool("read-buffers", settings()));

/// Общий интерфейс кодеков сжатия целых буферов.
pub trait Codec {
    /// Имя кодека (используется в ошибках и логах).
    const NAME: &'static str;

    /// Сжимает буфер. Пустой вход даёт валидный пустой поток.
    fn compress(data: &[u8]) -> CodecResult<Vec<u8>>;

    /// Распаковывает буфер.
    ///
    /// Пустой, обрезанный или чужой поток даёт [`CodecError::BadFormat`].
    fn decompress(data: &[u8]) -> CodecResult<Vec<u8>>;

    /// Применяет `compress` ровно `rounds` раз. `rounds == 0` возвращает копию
    /// входа.
    fn compress_n(
        data: &[u8],
        rounds: usize,
    ) -> CodecResult<Vec<u8>> {
        let mut out = data.to_vec();
        for _ in 0..rounds {
            out = Self::compress(&out)?;
        }
        Ok(out)
    }

    /// Применяет `decompress` ровно `rounds` раз. Глубина должна совпадать с
    /// глубиной сжатия.
    fn decompress_n(
        data: &[u8],
        rounds: usize,
    ) -> CodecResult<Vec<u8>> {
        let mut out = data.to_vec();
        for _ in 0..rounds {
            out = Self::decompress(&out)?;
        }
        Ok(out)
    }

    /// `compress(JSON(value))`.
    fn compress_object<T>(value: &T) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        Self::compress_object_with_size(value).map(|(packed, _)| packed)
    }

    /// Как [`Codec::compress_object`], но дополнительно возвращает длину
    /// промежуточного JSON, чтобы посчитать степень сжатия без повторного
    /// кодирования.
    fn compress_object_with_size<T>(value: &T) -> CodecResult<(Vec<u8>, usize)>
    where
        T: Serialize + ?Sized,
    {
        let json = to_json(value)?;
        let packed = Self::compress(&json)?;
        trace!(
            codec = Self::NAME,
            json_len = json.len(),
            packed_len = packed.len(),
            "object compressed"
        );
        Ok((packed, json.len()))
    }

    /// Обратная операция к [`Codec::compress_object`].
    fn decompress_object<T>(data: &[u8]) -> CodecResult<T>
    where
        T: DeserializeOwned,
    {
        let json = Self::decompress(data)?;
        from_json(&json)
    }

    fn compress_object_n<T>(
        value: &T,
        rounds: usize,
    ) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        Self::compress_n(&to_json(value)?, rounds)
    }

    fn decompress_object_n<T>(
        data: &[u8],
        rounds: usize,
    ) -> CodecResult<T>
    where
        T: DeserializeOwned,
    {
        from_json(&Self::decompress_n(data, rounds)?)
    }
}

/// Счётчики всех пулов слоя сжатия.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodecPoolStats {
    pub write_buffers: PoolStats,
    pub read_buffers: PoolStats,
    pub zlib_deflaters: PoolStats,
    pub zlib_inflaters: PoolStats,
}

/// Снимок счётчиков пулов.
pub fn pool_stats() -> CodecPoolStats {
    CodecPoolStats {
        write_buffers: WRITE_BUFFERS.stats(),
        read_buffers: READ_BUFFERS.stats(),
        zlib_deflaters: zlib::DEFLATERS.stats(),
        zlib_inflaters: zlib::INFLATERS.stats(),
    }
}

fn buffer_pool(
    name: &'static str,
    settings: &CodecSettings,
) -> Pool<Vec<u8>> {
    let initial = settings.initial_buffer_capacity;
    let max = settings.max_buffer_capacity;

    Pool::new(name, settings.pool_max_idle, move || Vec::with_capacity(initial)).with_reset(
        move |buf| {
            if buf.capacity() > max {
                debug!(
                    pool = name,
                    capacity = buf.capacity(),
                    max,
                    "discarding oversized buffer"
                );
                return false;
            }
            buf.clear();
            true
        },
    )
}

/// Гарантирует, что в `buf` есть свободное место для следующего шага
/// deflate/inflate.
pub(crate) fn grow(buf: &mut Vec<u8>) {
    if buf.len() == buf.capacity() {
        let extra = buf.capacity().max(64);
        buf.reserve(extra);
    }
}

fn to_json<T>(value: &T) -> CodecResult<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(value).map_err(|e| CodecError::encode_failure(JSON, e))
}

fn from_json<T>(data: &[u8]) -> CodecResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(data).map_err(|e| CodecError::decode_failure(JSON, e))
}
