#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::{Deserialize, Serialize};
use zipx::{CompressionKind, EncoderKind, Serializer};

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    id: String,
    content: String,
    timestamp: i64,
    user_id: String,
    #[serde(rename = "type")]
    kind: i32,
}

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    json: bool,
    compression: u8,
    base64: bool,
    strict: bool,
    wire: String,
}

fuzz_target!(|input: DecodeInput| {
    let encoder = if input.json {
        EncoderKind::Json
    } else {
        EncoderKind::Bincode
    };
    let compression = match input.compression % 3 {
        0 => CompressionKind::None,
        1 => CompressionKind::Gzip,
        _ => CompressionKind::Zlib,
    };

    let s = Serializer::<Message>::new()
        .with_encoder(encoder)
        .with_compression(compression)
        .with_base64(input.base64)
        .with_strict_decode(input.strict);

    // Ошибка допустима, паника - нет
    let _ = s.decode_from_string(&input.wire);
});
