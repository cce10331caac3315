#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zipx::{CodecError, CompressionKind};

#[derive(Debug, Arbitrary)]
enum FuzzCodec {
    Gzip,
    Zlib,
}

#[derive(Debug, Arbitrary)]
struct DecompressInput {
    codec: FuzzCodec,
    data: Vec<u8>,
}

fuzz_target!(|input: DecompressInput| {
    let kind = match input.codec {
        FuzzCodec::Gzip => CompressionKind::Gzip,
        FuzzCodec::Zlib => CompressionKind::Zlib,
    };

    // Произвольный вход: либо данные, либо BadFormat, но не паника
    match kind.decompress(&input.data) {
        Ok(plain) => {
            // Если поток принят, повторное сжатие должно восстанавливаться
            let again = kind.compress(&plain).expect("compress of accepted payload");
            assert_eq!(kind.decompress(&again).expect("round-trip"), plain);
        }
        Err(CodecError::BadFormat { .. }) => {}
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
