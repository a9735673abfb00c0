use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lockdiff::diff::diff_all;
use lockdiff::restore::restore_all;

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

fn mutate(base: &[u8], stride: usize) -> Vec<u8> {
    let mut out = base.to_vec();
    for i in (0..out.len()).step_by(stride.max(1)) {
        out[i] = out[i].wrapping_add(1);
    }
    out
}

fn make_changes(old: &[u8], new: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    diff_all(&mut out, old, new).unwrap();
    out
}

fn bench_diff_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("diff_speed_mb_s");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let old = gen_data(size, 1);
        let new = mutate(&old, 1024);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let changes = make_changes(black_box(&old), black_box(&new));
                black_box(changes);
            });
        });
    }
    g.finish();
}

fn bench_restore_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("restore_speed_vs_change_list");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let old = gen_data(size, 2);
        let new = mutate(&old, 2048);
        let changes = make_changes(&old, &new);
        g.throughput(Throughput::Bytes(changes.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let out = restore_all(black_box(&old), black_box(&changes)).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_change_density(c: &mut Criterion) {
    // Dense change lists dominate the text-format cost; sweep the stride.
    let mut g = c.benchmark_group("diff_vs_change_density");
    let old = gen_data(1024 * 1024, 3);
    for stride in [16usize, 256, 4096] {
        let new = mutate(&old, stride);
        g.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, _| {
            b.iter(|| {
                let changes = make_changes(&old, &new);
                black_box(changes.len());
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_diff_speed,
    bench_restore_speed,
    bench_change_density
);
criterion_main!(benches);
