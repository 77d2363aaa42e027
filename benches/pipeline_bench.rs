//! Benchmarks for segpipe.
//!
//! Run with:
//!     cargo bench

use std::io::Read;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use segpipe::{Aligned, Identity, PipeConfig, Processor, SliceReader, Utf8Decoder, source};

fn bench_pass_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("pass_through");

    for size in [64 * 1024, 1024 * 1024] {
        // Deterministic pseudo-random data
        let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

        group.throughput(Throughput::Bytes(size as u64));
        for block in [512, 8 * 1024] {
            group.bench_with_input(format!("{}kb_block_{}", size / 1024, block), &data, |b, data| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(data.len());
                    Processor::new(source::from_slice(&data[..]), PipeConfig::new(block).unwrap())
                        .unwrap()
                        .process_to(&mut out)
                        .unwrap();
                    black_box(out.len())
                });
            });
        }
    }

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");
    let size = 1024 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i * 31 + 7) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    // Odd block size so nearly every read leaves a carry.
    for unit in [16, 4096] {
        group.bench_with_input(format!("fixed_{}", unit), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len());
                Processor::new(source::from_slice(&data[..]), PipeConfig::new(1000).unwrap())
                    .unwrap()
                    .with_transformer(Aligned::fixed(Identity, unit).unwrap())
                    .process_to(&mut out)
                    .unwrap();
                black_box(out.len())
            });
        });

        group.bench_with_input(format!("multiple_{}", unit), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len());
                Processor::new(source::from_slice(&data[..]), PipeConfig::new(1000).unwrap())
                    .unwrap()
                    .with_transformer(Aligned::multiple(Identity, unit).unwrap())
                    .into_stream()
                    .read_to_end(&mut out)
                    .unwrap();
                black_box(out.len())
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let text = "ascii, ünïcödé and 日本語 ".repeat(4096);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("utf8", |b| {
        b.iter(|| {
            let src = source::decode(SliceReader::new(text.as_bytes()), Utf8Decoder::new());
            let mut out = String::with_capacity(text.len());
            Processor::new(src, PipeConfig::default())
                .unwrap()
                .process_to(&mut out)
                .unwrap();
            black_box(out.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pass_through, bench_alignment, bench_decode);
criterion_main!(benches);
