use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use zipx_error::{CodecError, CodecResult};

use super::{Codec, Gzip, Zlib};

/// Выбор кодека сжатия во время выполнения.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    /// Без сжатия.
    #[default]
    None,
    Gzip,
    Zlib,
    /// Зарезервировано: всегда [`CodecError::NotImplemented`].
    Zstd,
}

impl CompressionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => Gzip::NAME,
            Self::Zlib => Zlib::NAME,
            Self::Zstd => "zstd",
        }
    }

    /// Сжимает буфер выбранным кодеком. `None` возвращает копию входа.
    pub fn compress(
        self,
        data: &[u8],
    ) -> CodecResult<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Gzip => Gzip::compress(data),
            Self::Zlib => Zlib::compress(data),
            Self::Zstd => Err(CodecError::not_implemented("zstd compression")),
        }
    }

    /// Распаковывает буфер выбранным кодеком. `None` возвращает копию входа.
    pub fn decompress(
        self,
        data: &[u8],
    ) -> CodecResult<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Gzip => Gzip::decompress(data),
            Self::Zlib => Zlib::decompress(data),
            Self::Zstd => Err(CodecError::not_implemented("zstd compression")),
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "zlib" => Ok(Self::Zlib),
            "zstd" => Ok(Self::Zstd),
            _ => Err(CodecError::not_implemented("unknown compression")),
        }
    }
}
