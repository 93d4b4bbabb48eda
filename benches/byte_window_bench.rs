//! Criterion benchmark untuk Byte Window dan generic copy path
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use iris::{copy, ByteWindow, ByteWindowMut, ReadResource, WriteResource};

const SOURCE_SIZE: usize = 64 * 1024;
const CHUNK_SIZE: usize = 64;

fn bench_window(c: &mut Criterion) {
    let source = vec![0xabu8; SOURCE_SIZE];

    let mut group = c.benchmark_group("byte_window");
    group.throughput(Throughput::Bytes(SOURCE_SIZE as u64));

    // Drain window dengan chunk kecil - mengukur overhead per-read
    group.bench_function("read_64b_chunks", |b| {
        let mut buf = [0u8; CHUNK_SIZE];
        b.iter(|| {
            let mut window = ByteWindow::new(black_box(&source));
            while window.read(&mut buf).unwrap() > 0 {}
        });
    });

    group.bench_function("write_64b_chunks", |b| {
        let mut storage = vec![0u8; SOURCE_SIZE];
        let chunk = [0xcdu8; CHUNK_SIZE];
        b.iter(|| {
            let mut window = ByteWindowMut::new(black_box(&mut storage));
            while window.write(&chunk).unwrap() > 0 {}
        });
    });

    // Full streaming copy lewat buffer internal 64KB
    group.bench_function("copy_window_to_window", |b| {
        let mut storage = vec![0u8; SOURCE_SIZE];
        b.iter(|| {
            let mut src = ByteWindow::new(black_box(&source));
            let mut sink = ByteWindowMut::new(&mut storage);
            copy(&mut src, &mut sink).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_window);
criterion_main!(benches);
