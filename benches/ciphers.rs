use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use purecrypt::encryption::aes::{InternalAesKey, cbc, ctr};
use purecrypt::encryption::chacha20::xor_with_keystream;
use purecrypt::encryption::secretstream::{self, Tag};
use purecrypt::rng::Csprng;
use rand::SeedableRng;
use std::hint::black_box;

const PAYLOAD: usize = 16 * 1024;

pub fn bench_aes(c: &mut Criterion) {
    let key = InternalAesKey::from_bytes(&[7u8; 32]).unwrap();
    let data = vec![0xabu8; PAYLOAD];
    let iv = [1u8; 16];

    let mut group = c.benchmark_group("aes-256");
    group.throughput(Throughput::Bytes(PAYLOAD as u64));

    group.bench_function("cbc encrypt 16KiB", |b| {
        let mut rng = Csprng::from_seed([0u8; 32]);
        b.iter(|| cbc::encrypt(black_box(&key), black_box(&data), &mut rng))
    });

    let sealed = cbc::encrypt(&key, &data, &mut Csprng::from_seed([0u8; 32])).unwrap();
    group.bench_function("cbc decrypt 16KiB", |b| {
        b.iter(|| cbc::decrypt(black_box(&key), black_box(&sealed.ciphertext), sealed.iv))
    });

    group.bench_function("ctr decrypt 16KiB", |b| {
        b.iter(|| ctr::decrypt(black_box(&key), black_box(&data), iv))
    });

    group.finish();
}

pub fn bench_xchacha20(c: &mut Criterion) {
    let key = [3u8; 32];
    let nonce = [5u8; 24];
    let data = vec![0x11u8; PAYLOAD];

    let mut group = c.benchmark_group("xchacha20");
    group.throughput(Throughput::Bytes(PAYLOAD as u64));
    group.bench_function("keystream 16KiB", |b| {
        b.iter(|| xor_with_keystream(black_box(&key), black_box(&nonce), black_box(&data), 0))
    });
    group.finish();
}

pub fn bench_secretstream(c: &mut Criterion) {
    let mut rng = Csprng::from_seed([9u8; 32]);
    let key = secretstream::keygen(&mut rng);
    let chunk = vec![0x22u8; 4096];

    let mut group = c.benchmark_group("secretstream");
    group.throughput(Throughput::Bytes(chunk.len() as u64));
    group.bench_function("push 4KiB", |b| {
        let (mut state, _) = secretstream::init_push(&key, &mut rng);
        b.iter(|| state.push(black_box(&chunk), b"", Tag::Message))
    });
    group.finish();
}

criterion_group!(benches, bench_aes, bench_xchacha20, bench_secretstream);
criterion_main!(benches);
