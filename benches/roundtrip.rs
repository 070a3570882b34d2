use aescrypt_stream::{decrypt, encrypt, Options, Password};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

const KB: usize = 1024;
const SIZES: &[usize] = &[4 * KB, 64 * KB, 1024 * KB];

fn bench_encrypt(c: &mut Criterion) {
    let password = Password::new("benchmark password");
    let options = Options::default();

    let mut group = c.benchmark_group("encrypt");
    for &size in SIZES {
        let plaintext = vec![0xa5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &plaintext, |b, data| {
            b.iter(|| {
                let mut container = Vec::with_capacity(size + 256);
                encrypt(
                    &password,
                    Cursor::new(black_box(data.as_slice())),
                    &mut container,
                    &options,
                )
                .unwrap();
                black_box(container)
            });
        });
    }
    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let password = Password::new("benchmark password");
    let options = Options::default();

    let mut group = c.benchmark_group("decrypt");
    for &size in SIZES {
        let plaintext = vec![0xa5u8; size];
        let mut container = Vec::new();
        encrypt(&password, Cursor::new(&plaintext), &mut container, &options).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &container, |b, data| {
            b.iter(|| {
                let mut out = Vec::with_capacity(size);
                decrypt(&password, Cursor::new(black_box(data.as_slice())), &mut out).unwrap();
                black_box(out)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encrypt, bench_decrypt);
criterion_main!(benches);
