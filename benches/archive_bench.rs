//! Benchmarks for archive building.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use comfy_uploader::models::CollectedFile;
use comfy_uploader::utils::compress::{build_archive, compression_options};

fn sample_files(count: usize, size: usize, extension: &str) -> Vec<CollectedFile> {
    (0..count)
        .map(|i| {
            let data: Vec<u8> = (0..size).map(|j| ((i + j) % 251) as u8).collect();
            CollectedFile::new(format!("dir_{}/file_{}.{}", i % 8, i, extension), data)
        })
        .collect()
}

/// Benchmark archive creation with different file counts
fn bench_archive_file_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_file_counts");
    let file_size = 10 * 1024;

    for count in [10, 50, 100, 500] {
        let files = sample_files(count, file_size, "txt");

        group.throughput(Throughput::Bytes((count * file_size) as u64));
        group.bench_with_input(
            BenchmarkId::new("build_archive", format!("{}_files", count)),
            &files,
            |b, files| b.iter(|| build_archive(black_box(files)).unwrap()),
        );
    }

    group.finish();
}

/// Already-compressed images take the fast path
fn bench_compressed_vs_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("compressed_vs_plain");
    let file_size = 256 * 1024;

    for extension in ["png", "txt"] {
        let files = sample_files(20, file_size, extension);
        group.throughput(Throughput::Bytes((20 * file_size) as u64));
        group.bench_with_input(BenchmarkId::new("build_archive", extension), &files, |b, files| {
            b.iter(|| build_archive(black_box(files)).unwrap())
        });
    }

    group.finish();
}

fn bench_compression_options(c: &mut Criterion) {
    c.bench_function("compression_options", |b| {
        b.iter(|| compression_options(black_box("photos/sub/IMG_0001.JPG"), black_box(4 * 1024 * 1024)))
    });
}

criterion_group!(
    benches,
    bench_archive_file_counts,
    bench_compressed_vs_plain,
    bench_compression_options
);
criterion_main!(benches);
