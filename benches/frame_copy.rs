use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fb_viewer::device::{Geometry, PixelView};

/// Benchmark: per-frame snapshot of the live pixel memory into the upload buffer
fn bench_frame_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_snapshot");

    let geometries = [
        ("320x240@16", Geometry::new(320, 240, 16)),
        ("800x480@32", Geometry::new(800, 480, 32)),
        ("1920x1080@32", Geometry::new(1920, 1080, 32)),
    ];

    for (name, geometry) in geometries {
        let source: Vec<u8> = (0..geometry.mapping_len()).map(|i| i as u8).collect();
        let mut staging = vec![0u8; geometry.mapping_len()];

        group.throughput(Throughput::Bytes(geometry.mapping_len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            let view = PixelView::from_slice(source);
            b.iter(|| black_box(view.copy_into(black_box(&mut staging))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame_snapshot);
criterion_main!(benches);
