//! Кодек Gzip (RFC 1952) без дополнительной обёртки.
//!
//! При распаковке склеенные member'ы декодируются подряд, а любые байты
//! после последнего member'а, не образующие заголовок gzip, дают `BadFormat`.

use std::io::{Read, Write};

use flate2::{read::MultiGzDecoder, write::GzEncoder};
use tracing::trace;
use zipx_error::{CodecError, CodecResult};

use super::{Codec, READ_BUFFERS, WRITE_BUFFERS};
use crate::config::settings;

/// Кодек Gzip.
///
/// `GzEncoder` нельзя перепривязать к новому приёмнику, поэтому он создаётся
/// на каждый вызов, а из пула берётся только буфер записи.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

impl Codec for Gzip {
    const NAME: &'static str = "gzip";

    fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
        let mut scratch = WRITE_BUFFERS.acquire();

        let mut encoder = GzEncoder::new(std::mem::take(&mut *scratch), settings().flate_level());
        encoder
            .write_all(data)
            .map_err(|e| CodecError::encode_failure(Self::NAME, e))?;
        let written = encoder
            .finish()
            .map_err(|e| CodecError::encode_failure(Self::NAME, e))?;

        let out = written.clone();
        // Буфер возвращается в пул вместе с guard'ом.
        *scratch = written;

        trace!(input = data.len(), output = out.len(), "gzip compressed");
        Ok(out)
    }

    fn decompress(data: &[u8]) -> CodecResult<Vec<u8>> {
        if data.is_empty() {
            return Err(CodecError::bad_format(Self::NAME, "empty input"));
        }

        let mut scratch = READ_BUFFERS.acquire();
        MultiGzDecoder::new(data)
            .read_to_end(&mut scratch)
            .map_err(|e| CodecError::bad_format(Self::NAME, e))?;

        trace!(input = data.len(), output = scratch.len(), "gzip decompressed");
        Ok(scratch.to_vec())
    }
}
