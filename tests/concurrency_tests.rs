//! Конкурентные тесты: пулы не должны смешивать данные разных потоков.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
};

use rstest::rstest;
use zipx::{CompressionKind, EncoderKind, Serializer, SerializerConfig};

use generators::{sample_message, Message};

/// Стек потоков в тесте пулов: при 1024 потоках стандартный размер избыточен
const POOL_THREAD_STACK: usize = 1024 * 1024;

/// Кол-во потоков и итераций для стресс теста сериализатора
const STRESS_THREADS: usize = 100;
const STRESS_ITERATIONS: usize = 50;

/// Уникальный для потока буфер: разная длина и разное содержимое.
fn thread_payload(id: usize) -> Vec<u8> {
    let mut data = format!("thread-{id:04}|").into_bytes();
    data.extend((0..(id % 37) * 50).map(|i| (i * 31 + id) as u8));
    data
}

/// Тест проверяет, что каждый поток получает сжатие именно своих данных,
/// когда все потоки стартуют одновременно. Верхняя граница: 1024 потока.
#[rstest]
fn test_pool_safety_under_contention(
    #[values(CompressionKind::Gzip, CompressionKind::Zlib)] kind: CompressionKind,
    #[values(256, 1024)] threads: usize,
) {
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = Vec::with_capacity(threads);

    for id in 0..threads {
        let barrier = Arc::clone(&barrier);
        let spawned = thread::Builder::new()
            .name(format!("pool-{id}"))
            .stack_size(POOL_THREAD_STACK)
            .spawn(move || {
                let payload = thread_payload(id);
                barrier.wait();

                for _ in 0..4 {
                    let packed = kind.compress(&payload).unwrap();
                    let restored = kind.decompress(&packed).unwrap();
                    assert_eq!(restored, payload, "thread {id} got foreign data");
                }
                kind.compress(&payload).unwrap()
            });
        handles.push(spawned.unwrap());
    }

    // Проверяем результаты уже после того, как все потоки вернули буферы в пул
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (id, packed) in results.iter().enumerate() {
        assert_eq!(kind.decompress(packed).unwrap(), thread_payload(id));
    }
}

/// Стресс тест: 100 потоков по 50 итераций кодируют и декодируют список
/// сообщений через bincode + Zlib + Base64.
#[test]
fn test_serializer_stress() {
    let serializer = Arc::new(Serializer::<Vec<Message>>::with_config(SerializerConfig {
        encoder: EncoderKind::Bincode,
        compression: CompressionKind::Zlib,
        base64: true,
        strict_decode: false,
    }));
    let messages: Arc<Vec<Message>> = Arc::new((0..10).map(sample_message).collect());
    let errors = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(STRESS_THREADS));

    let handles: Vec<_> = (0..STRESS_THREADS)
        .map(|_| {
            let serializer = Arc::clone(&serializer);
            let messages = Arc::clone(&messages);
            let errors = Arc::clone(&errors);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for _ in 0..STRESS_ITERATIONS {
                    let decoded = serializer
                        .encode_to_string(&messages)
                        .and_then(|wire| serializer.decode_from_string(&wire));
                    match decoded {
                        Ok(decoded) if decoded == *messages => {}
                        _ => {
                            errors.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(errors.load(Ordering::Relaxed), 0);
}

/// Тест проверяет, что разные кодеки и конфигурации сериализатора могут
/// работать одновременно на общих пулах буферов.
#[test]
fn test_mixed_codecs_share_buffers() {
    let handles: Vec<_> = (0..32)
        .map(|id| {
            thread::spawn(move || {
                let kind = if id % 2 == 0 {
                    CompressionKind::Gzip
                } else {
                    CompressionKind::Zlib
                };
                let s = Serializer::<Message>::new()
                    .with_encoder(EncoderKind::Json)
                    .with_compression(kind);
                for i in 0..100 {
                    let msg = sample_message(id * 1000 + i);
                    let bytes = s.encode(&msg).unwrap();
                    assert_eq!(s.decode(&bytes).unwrap(), msg);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
