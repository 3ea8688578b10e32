use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use smt::{hash::Hashable, Field, MerkleMap, SparseMerkleTree};

const HEIGHT: usize = 32;

fn random_indices() -> Vec<u64> {
    let mut rng = ChaChaRng::from_seed([0; 32]);
    (0..1000).map(|_| rng.gen_range(0..1 << (HEIGHT - 1))).collect()
}

pub fn set_leaf_benchmark(c: &mut Criterion) {
    let indices = random_indices();

    c.bench_with_input(
        BenchmarkId::new("set_leaf", "1k random, height 32"),
        &indices.as_slice(),
        |bencher, indices| {
            bencher.iter(|| {
                let mut tree = SparseMerkleTree::new(HEIGHT).unwrap();
                for &i in *indices {
                    tree.set_leaf(i, Field::from(i).hash()).unwrap();
                }
                black_box(tree);
            });
        },
    );
}

pub fn witness_benchmark(c: &mut Criterion) {
    let indices = random_indices();
    let tree = SparseMerkleTree::from_leaves(
        HEIGHT,
        indices.iter().map(|&i| (i, Field::from(i).hash())),
    )
    .unwrap();

    c.bench_with_input(
        BenchmarkId::new("witness and recompute", "1k random, height 32"),
        &indices.as_slice(),
        |bencher, indices| {
            bencher.iter(|| {
                for &i in *indices {
                    let witness = tree.get_witness(i).unwrap();
                    black_box(witness.compute_root(Field::from(i).hash()));
                }
            });
        },
    );
}

pub fn map_benchmark(c: &mut Criterion) {
    let keys: Vec<Field> = random_indices()
        .into_iter()
        .map(|i| MerkleMap::key_for(&[Field::from(i)]))
        .collect();

    c.bench_with_input(
        BenchmarkId::new("map set", "1k derived keys"),
        &keys.as_slice(),
        |bencher, keys| {
            bencher.iter(|| {
                let mut map = MerkleMap::new();
                for &key in *keys {
                    map.set(key, Field::ONE);
                }
                black_box(map);
            });
        },
    );
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = set_leaf_benchmark, witness_benchmark, map_benchmark
}
criterion_main!(benches);
