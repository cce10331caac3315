//! Кодек Zlib (RFC 1950) и префиксная обёртка `ZLIB:`.
//!
//! Состояния deflate и inflate берутся из пулов: `flate2::Compress` и
//! `flate2::Decompress` поддерживают `reset`, поэтому их можно безопасно
//! переиспользовать между вызовами.
//!
//! Обёртка `ZLIB:` является внутренним соглашением библиотеки: ровно пять ASCII-байт
//! `5A 4C 49 42 3A` перед обычным zlib-потоком, без версии и разделителей.

use flate2::{Compress, Decompress, FlushCompress, FlushDecompress, Status};
use once_cell::sync::Lazy;
use tracing::trace;
use zipx_error::{CodecError, CodecResult};

use super::{grow, Codec, READ_BUFFERS, WRITE_BUFFERS};
use crate::{config::settings, pool::Pool};

/// Тег префиксной формы.
pub const ZLIB_PREFIX: &[u8; 5] = b"ZLIB:";

pub(crate) static DEFLATERS: Lazy<Pool<Compress>> = Lazy::new(|| {
    let s = settings();
    let level = s.flate_level();
    Pool::new("zlib-deflaters", s.pool_max_idle, move || {
        Compress::new(level, true)
    })
    .with_reset(|engine| {
        engine.reset();
        true
    })
});

pub(crate) static INFLATERS: Lazy<Pool<Decompress>> = Lazy::new(|| {
    Pool::new("zlib-inflaters", settings().pool_max_idle, || {
        Decompress::new(true)
    })
    .with_reset(|engine| {
        engine.reset(true);
        true
    })
});

/// Кодек Zlib.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zlib;

impl Codec for Zlib {
    const NAME: &'static str = "zlib";

    fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
        let mut engine = DEFLATERS.acquire();
        let mut scratch = WRITE_BUFFERS.acquire();
        scratch.reserve(data.len() / 2 + 64);

        loop {
            let consumed = engine.total_in() as usize;
            grow(&mut scratch);

            let status = engine
                .compress_vec(&data[consumed..], &mut scratch, FlushCompress::Finish)
                .map_err(|e| CodecError::encode_failure(Self::NAME, e))?;

            if status == Status::StreamEnd {
                break;
            }
        }

        trace!(input = data.len(), output = scratch.len(), "zlib compressed");
        Ok(scratch.to_vec())
    }

    fn decompress(data: &[u8]) -> CodecResult<Vec<u8>> {
        if data.is_empty() {
            return Err(CodecError::bad_format(Self::NAME, "empty input"));
        }

        let mut engine = INFLATERS.acquire();
        let mut scratch = READ_BUFFERS.acquire();
        scratch.reserve(data.len().saturating_mul(2));

        loop {
            let consumed = engine.total_in() as usize;
            let produced = engine.total_out();
            grow(&mut scratch);

            let status = engine
                .decompress_vec(&data[consumed..], &mut scratch, FlushDecompress::None)
                .map_err(|e| CodecError::bad_format(Self::NAME, e))?;

            if status == Status::StreamEnd {
                break;
            }

            let progressed =
                engine.total_in() as usize != consumed || engine.total_out() != produced;
            if !progressed && scratch.len() < scratch.capacity() {
                return Err(CodecError::bad_format(Self::NAME, "truncated stream"));
            }
        }

        let consumed = engine.total_in() as usize;
        if consumed != data.len() {
            return Err(CodecError::bad_format(
                Self::NAME,
                format!(
                    "{} trailing bytes after end of stream",
                    data.len() - consumed
                ),
            ));
        }

        trace!(input = data.len(), output = scratch.len(), "zlib decompressed");
        Ok(scratch.to_vec())
    }
}

impl Zlib {
    /// `"ZLIB:" ‖ compress(data)`.
    pub fn compress_with_prefix(data: &[u8]) -> CodecResult<Vec<u8>> {
        let body = Self::compress(data)?;

        let mut out = Vec::with_capacity(ZLIB_PREFIX.len() + body.len());
        out.extend_from_slice(ZLIB_PREFIX);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Снимает тег и распаковывает остаток. Вход без тега считается уже
    /// распакованным и возвращается без изменений.
    pub fn decompress_with_prefix(data: &[u8]) -> CodecResult<Vec<u8>> {
        match Self::strip_prefix(data) {
            Some(body) => Self::decompress(body),
            None => Ok(data.to_vec()),
        }
    }

    /// Вход длиннее тега и начинается с него.
    pub fn is_prefixed(data: &[u8]) -> bool {
        data.len() > ZLIB_PREFIX.len() && data.starts_with(ZLIB_PREFIX)
    }

    /// Полезная нагрузка после тега, если вход начинается с тега.
    pub fn strip_prefix(data: &[u8]) -> Option<&[u8]> {
        data.strip_prefix(ZLIB_PREFIX.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет базовый round-trip.
    #[test]
    fn test_roundtrip() {
        let data = b"Hello, World! This is a test string for compression and decompression.";
        let packed = Zlib::compress(data).unwrap();
        assert_eq!(Zlib::decompress(&packed).unwrap(), data);
    }

    /// Тест проверяет, что выход является стандартным zlib-потоком (CMF = 0x78).
    #[test]
    fn test_output_is_standard_zlib() {
        let packed = Zlib::compress(b"abc").unwrap();
        assert_eq!(packed[0], 0x78);
        assert_eq!(((packed[0] as u16) << 8 | packed[1] as u16) % 31, 0);
    }

    /// Тест проверяет совместимость с потоковым декодером flate2.
    #[test]
    fn test_interop_with_flate2_reader() {
        use std::io::Read;

        let data = vec![42u8; 10_000];
        let packed = Zlib::compress(&data).unwrap();

        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(packed.as_slice())
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, data);
    }

    /// Тест проверяет вход, который требует нескольких расширений буфера.
    #[test]
    fn test_large_incompressible_input() {
        let data: Vec<u8> = (0..200_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let packed = Zlib::compress(&data).unwrap();
        assert_eq!(Zlib::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let packed = Zlib::compress(b"").unwrap();
        assert!(!packed.is_empty());
        assert!(Zlib::decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_decompress_invalid_input() {
        for bad in [&[][..], &[0x00, 0x01, 0x02][..], b"plain text"] {
            let err = Zlib::decompress(bad).unwrap_err();
            assert!(
                matches!(err, CodecError::BadFormat { codec: "zlib", .. }),
                "input={bad:?} err={err:?}"
            );
        }
    }

    /// Тест проверяет, что обрезанный поток не даёт частичного результата.
    #[test]
    fn test_decompress_truncated() {
        let packed = Zlib::compress(&vec![9u8; 5000]).unwrap();
        for cut in [1, 2, packed.len() / 2] {
            let truncated = &packed[..packed.len() - cut];
            assert!(
                matches!(Zlib::decompress(truncated), Err(CodecError::BadFormat { .. })),
                "cut={cut}"
            );
        }
    }

    #[test]
    fn test_decompress_trailing_bytes() {
        let mut packed = Zlib::compress(b"payload").unwrap();
        packed.extend_from_slice(b"junk");
        assert!(matches!(
            Zlib::decompress(&packed),
            Err(CodecError::BadFormat { .. })
        ));
    }

    /// Тест проверяет префиксную форму.
    #[test]
    fn test_prefix_roundtrip() {
        let framed = Zlib::compress_with_prefix(b"x").unwrap();
        assert_eq!(&framed[..5], &[0x5A, 0x4C, 0x49, 0x42, 0x3A]);
        assert!(Zlib::is_prefixed(&framed));
        assert_eq!(Zlib::decompress_with_prefix(&framed).unwrap(), b"x");
    }

    /// Тест проверяет, что вход без тега проходит без изменений.
    #[test]
    fn test_unprefixed_passthrough() {
        assert_eq!(Zlib::decompress_with_prefix(b"x").unwrap(), b"x");
        assert_eq!(Zlib::decompress_with_prefix(b"").unwrap(), b"");
        assert_eq!(Zlib::decompress_with_prefix(b"zlib:abc").unwrap(), b"zlib:abc");
    }

    #[test]
    fn test_is_prefixed() {
        assert!(Zlib::is_prefixed(b"ZLIB:payload"));
        assert!(!Zlib::is_prefixed(b"ZLIB"));
        assert!(!Zlib::is_prefixed(b"ZLIB:"));
        assert!(!Zlib::is_prefixed(b"zlib:payload"));
    }

    /// Тест проверяет, что тег без корректного потока даёт ошибку.
    #[test]
    fn test_prefix_with_bad_body() {
        assert!(Zlib::decompress_with_prefix(b"ZLIB:").is_err());
        assert!(Zlib::decompress_with_prefix(b"ZLIB:garbage").is_err());
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(Zlib::strip_prefix(b"ZLIB:abc"), Some(&b"abc"[..]));
        assert_eq!(Zlib::strip_prefix(b"ZLI"), None);
    }
}
