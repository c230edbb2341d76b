use criterion::{criterion_group, criterion_main, Criterion};
use quadlife::Node;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const SEED: u64 = 42;

fn bench_set_and_read_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_and_read_cell");
    for size_log2 in [3u32, 16, 32] {
        let far = (1i64 << size_log2) - 1;
        let tree = Node::empty(1).grow_to_fit(far, far);
        group.bench_function(format!("side_2pow{size_log2}"), |b| {
            b.iter(|| {
                let tree = tree.set_cell(2, 2, true);
                black_box(tree.cell(2, 2))
            })
        });
    }
    group.finish();
}

fn bench_grow_to_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow_to_fit");
    for size_log2 in [3u32, 8, 16, 32] {
        let far = (1i64 << size_log2) - 1;
        group.bench_function(format!("side_2pow{size_log2}"), |b| {
            b.iter(|| black_box(Node::empty(1).grow_to_fit(far, far)))
        });
    }
    group.finish();
}

fn bench_next_gen(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut soup = Node::empty(6);
    for y in -32..32 {
        for x in -32..32 {
            if rng.random_bool(0.5) {
                soup = soup.set_cell(x, y, true);
            }
        }
    }

    let mut group = c.benchmark_group("next_gen");
    group.bench_function("soup_64", |b| b.iter(|| black_box(soup.next_gen())));
    let blinker = Node::empty(5)
        .set_cell(-1, 0, true)
        .set_cell(0, 0, true)
        .set_cell(1, 0, true);
    group.bench_function("blinker", |b| b.iter(|| black_box(blinker.next_gen())));
    group.finish();
}

criterion_group!(
    benches,
    bench_set_and_read_cell,
    bench_grow_to_fit,
    bench_next_gen
);
criterion_main!(benches);
