//! Бенчмарк конвейеров сериализатора: каждая реализованная комбинация
//! кодировщика и сжатия на одном и том же списке записей.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use zipx::{CompressionKind, EncoderKind, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Message {
    id: String,
    content: String,
    timestamp: i64,
    user_id: String,
    #[serde(rename = "type")]
    kind: i32,
}

fn messages(n: usize) -> Vec<Message> {
    (0..n)
        .map(|i| Message {
            id: format!("msg_{i:06}"),
            content: "这是一条测试消息，包含中文内容！".to_string(),
            timestamp: 1_700_000_000 + i as i64,
            user_id: format!("user_{}", i % 17),
            kind: (i % 3) as i32,
        })
        .collect()
}

fn bench_pipelines(c: &mut Criterion) {
    let mut group = c.benchmark_group("serializer");
    let value = messages(100);

    for encoder in [EncoderKind::Bincode, EncoderKind::Json] {
        for compression in [
            CompressionKind::None,
            CompressionKind::Gzip,
            CompressionKind::Zlib,
        ] {
            let s = Serializer::<Vec<Message>>::new()
                .with_encoder(encoder)
                .with_compression(compression);
            let label = format!("{encoder}+{compression}");

            group.bench_with_input(BenchmarkId::new("encode_to_string", &label), &value, |b, v| {
                b.iter(|| s.encode_to_string(black_box(v)).unwrap());
            });

            let wire = s.encode_to_string(&value).unwrap();
            group.bench_with_input(
                BenchmarkId::new("decode_from_string", &label),
                &wire,
                |b, w| {
                    b.iter(|| s.decode_from_string(black_box(w)).unwrap());
                },
            );
        }
    }

    group.finish();
}

/// Стоимость разрешающего декодирования: JSON читается сериализатором,
/// настроенным на bincode.
fn bench_permissive_fallback(c: &mut Criterion) {
    let value = messages(10);
    let wire = Serializer::<Vec<Message>>::new()
        .with_encoder(EncoderKind::Json)
        .encode_to_string(&value)
        .unwrap();
    let reader = Serializer::<Vec<Message>>::new();

    c.bench_function("serializer/permissive_fallback", |b| {
        b.iter(|| reader.decode_from_string(black_box(&wire)).unwrap());
    });
}

criterion_group!(benches, bench_pipelines, bench_permissive_fallback);
criterion_main!(benches);
