//! Стадия кодирования: bincode или JSON, плюс разрешающее декодирование.
//!
//! Декодирование сначала пробует настроенный кодировщик, затем второй из
//! пары bincode/json. Формат байтов не угадывается: обе попытки ограничены и
//! не имеют побочных эффектов.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use zipx_error::{CodecError, CodecResult};

use super::EncoderKind;

/// bincode с фиксированной шириной целых и запретом хвостовых байт.
///
/// Запрет хвоста не даёт bincode "успешно" прочитать префикс JSON-документа.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub(crate) fn encode<T>(
    kind: EncoderKind,
    value: &T,
) -> CodecResult<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    match kind {
        EncoderKind::Bincode => bincode_options()
            .serialize(value)
            .map_err(|e| CodecError::encode_failure(kind.name(), e)),
        EncoderKind::Json => {
            serde_json::to_vec(value).map_err(|e| CodecError::encode_failure(kind.name(), e))
        }
        EncoderKind::Msgpack => Err(CodecError::not_implemented("msgpack encoder")),
        EncoderKind::Protobuf => Err(CodecError::not_implemented("protobuf encoder")),
    }
}

pub(crate) fn decode<T>(
    kind: EncoderKind,
    data: &[u8],
) -> CodecResult<T>
where
    T: DeserializeOwned,
{
    match kind {
        EncoderKind::Bincode => bincode_options()
            .deserialize(data)
            .map_err(|e| CodecError::decode_failure(kind.name(), e)),
        EncoderKind::Json => {
            serde_json::from_slice(data).map_err(|e| CodecError::decode_failure(kind.name(), e))
        }
        EncoderKind::Msgpack => Err(CodecError::not_implemented("msgpack encoder")),
        EncoderKind::Protobuf => Err(CodecError::not_implemented("protobuf encoder")),
    }
}

/// Декодирует настроенным кодировщиком, при неудаче запасным.
pub(crate) fn decode_permissive<T>(
    kind: EncoderKind,
    strict: bool,
    data: &[u8],
) -> CodecResult<T>
where
    T: DeserializeOwned,
{
    let primary = match decode(kind, data) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let fallback = match kind.fallback() {
        Some(fallback) if !strict => fallback,
        _ => return Err(primary),
    };

    match decode(fallback, data) {
        Ok(value) => {
            debug!(
                configured = %kind,
                fallback = %fallback,
                primary_error = primary.kind(),
                len = data.len(),
                "payload decoded with fallback encoder"
            );
            Ok(value)
        }
        Err(secondary) => Err(CodecError::decode_failure(
            kind.name(),
            format!("{primary}; {secondary}"),
        )),
    }
}
