//! Бенчмарк кодеков Gzip и Zlib
//!
//! Измеряет:
//! - Скорость сжатия/распаковки на сжимаемых и случайных данных
//! - Влияние многораундового сжатия
//! - Стоимость префиксной обёртки `ZLIB:`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use zipx::{Codec, CompressionKind, Zlib};

fn create_compressible_data(size: usize) -> Vec<u8> {
    let pattern = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn create_random_data(size: usize) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut data = vec![0u8; size];
    rng.fill(&mut data[..]);
    data
}

fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("codecs");

    for data_size in [1024, 10_240, 102_400] {
        group.throughput(Throughput::Bytes(data_size as u64));

        let compressible = create_compressible_data(data_size);
        let random = create_random_data(data_size);

        for (data_type, data) in [("compressible", &compressible), ("random", &random)] {
            for kind in [CompressionKind::Gzip, CompressionKind::Zlib] {
                group.bench_with_input(
                    BenchmarkId::new(format!("{kind}/{data_type}/compress"), data_size),
                    data,
                    |b, d| b.iter(|| kind.compress(black_box(d)).unwrap()),
                );

                let packed = kind.compress(data).unwrap();
                group.bench_with_input(
                    BenchmarkId::new(format!("{kind}/{data_type}/decompress"), data_size),
                    &packed,
                    |b, p| b.iter(|| kind.decompress(black_box(p)).unwrap()),
                );
            }
        }
    }

    group.finish();
}

fn bench_multi_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("zlib_rounds");
    let data = create_compressible_data(10_240);

    for rounds in [1usize, 2, 4, 8] {
        let packed = Zlib::compress_n(&data, rounds).unwrap();
        group.bench_with_input(BenchmarkId::new("round_trip", rounds), &rounds, |b, &n| {
            b.iter(|| {
                let out = Zlib::decompress_n(black_box(&packed), n).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

fn bench_prefix(c: &mut Criterion) {
    let data = create_compressible_data(4096);
    let framed = Zlib::compress_with_prefix(&data).unwrap();

    c.bench_function("zlib_prefix/decompress_framed", |b| {
        b.iter(|| Zlib::decompress_with_prefix(black_box(&framed)).unwrap());
    });
    c.bench_function("zlib_prefix/passthrough", |b| {
        b.iter(|| Zlib::decompress_with_prefix(black_box(&data)).unwrap());
    });
}

criterion_group!(benches, bench_codecs, bench_multi_round, bench_prefix);
criterion_main!(benches);
