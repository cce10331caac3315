use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Закрытая таксономия ошибок слоя сжатия и сериализатора.
///
/// Каждый вариант соответствует отдельному виду отказа, поэтому вызывающий
/// код может сопоставлять их через `match`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Декодирование вызвано с пустыми байтами или пустой строкой.
    #[error("{stage}: empty input")]
    EmptyInput { stage: &'static str },

    /// Кодек отверг вход: пустой, обрезанный или не тот формат.
    #[error("{codec}: bad format: {reason}")]
    BadFormat { codec: &'static str, reason: String },

    /// Кодировщик отверг значение.
    #[error("{format}: encode failed: {reason}")]
    EncodeFailure {
        format: &'static str,
        reason: String,
    },

    /// Все попытки декодирования завершились ошибкой.
    #[error("{format}: decode failed: {reason}")]
    DecodeFailure {
        format: &'static str,
        reason: String,
    },

    /// Выбран зарезервированный кодек или кодировщик.
    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },
}

impl CodecError {
    pub fn bad_format(
        codec: &'static str,
        reason: impl ToString,
    ) -> Self {
        Self::BadFormat {
            codec,
            reason: reason.to_string(),
        }
    }

    pub fn encode_failure(
        format: &'static str,
        reason: impl ToString,
    ) -> Self {
        Self::EncodeFailure {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn decode_failure(
        format: &'static str,
        reason: impl ToString,
    ) -> Self {
        Self::DecodeFailure {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn not_implemented(feature: &'static str) -> Self {
        Self::NotImplemented { feature }
    }

    /// Короткое имя вида ошибки (для логов).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput { .. } => "empty_input",
            Self::BadFormat { .. } => "bad_format",
            Self::EncodeFailure { .. } => "encode_failure",
            Self::DecodeFailure { .. } => "decode_failure",
            Self::NotImplemented { .. } => "not_implemented",
        }
    }
}

impl ErrorExt for CodecError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput { .. } => StatusCode::EmptyInput,
            Self::BadFormat { .. } => StatusCode::BadFormat,
            Self::EncodeFailure { .. } => StatusCode::EncodingError,
            Self::DecodeFailure { .. } => StatusCode::DecodingError,
            Self::NotImplemented { .. } => StatusCode::NotImplemented,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
