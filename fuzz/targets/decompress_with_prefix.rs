#![no_main]

use libfuzzer_sys::fuzz_target;
use zipx::Zlib;

fuzz_target!(|data: &[u8]| {
    match Zlib::strip_prefix(data) {
        Some(_) => {
            let _ = Zlib::decompress_with_prefix(data);
        }
        None => {
            // Вход без тега возвращается как есть
            let out = Zlib::decompress_with_prefix(data).expect("unframed input never fails");
            assert_eq!(out, data);
        }
    }
});
