use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use zipx_error::CodecError;

use crate::codec::CompressionKind;

/// Стадия кодирования значения в байты.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Компактный двоичный формат (`bincode`).
    #[default]
    Bincode,
    /// Стандартный JSON (`serde_json`).
    Json,
    /// Зарезервировано.
    Msgpack,
    /// Зарезервировано.
    Protobuf,
}

impl EncoderKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bincode => "bincode",
            Self::Json => "json",
            Self::Msgpack => "msgpack",
            Self::Protobuf => "protobuf",
        }
    }

    /// Кодировщик, который пробуется при неудаче основного декодирования.
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::Bincode => Some(Self::Json),
            Self::Json => Some(Self::Bincode),
            Self::Msgpack | Self::Protobuf => None,
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, Self::Bincode | Self::Json)
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncoderKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bincode" | "binary" => Ok(Self::Bincode),
            "json" => Ok(Self::Json),
            "msgpack" => Ok(Self::Msgpack),
            "protobuf" => Ok(Self::Protobuf),
            _ => Err(CodecError::not_implemented("unknown encoder")),
        }
    }
}

/// Конфигурация конвейера сериализатора.
///
/// Неизменяема после построения [`Serializer`](super::Serializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub encoder: EncoderKind,
    pub compression: CompressionKind,
    /// Base64 для строковых форм (`encode_to_string`/`decode_from_string`).
    pub base64: bool,
    /// Отключает попытку декодирования вторым кодировщиком.
    pub strict_decode: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderKind::Bincode,
            compression: CompressionKind::None,
            base64: true,
            strict_decode: false,
        }
    }
}
