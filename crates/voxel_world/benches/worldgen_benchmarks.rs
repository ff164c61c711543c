//! Criterion benchmarks for chunk generation and coordinate math.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxel_world::{
    world_to_chunk, world_to_local, BlockId, ChunkGenerator, ChunkKey, FlatGenerator,
    NoiseGenerator, CHUNK_VOLUME,
};

fn bench_generators(c: &mut Criterion) {
    let mut buffer = vec![BlockId::AIR; CHUNK_VOLUME];
    let key = ChunkKey::new(12, -7);

    let flat = FlatGenerator::new();
    c.bench_function("generate_flat_chunk", |b| {
        b.iter(|| flat.generate(black_box(key), &mut buffer))
    });

    let perlin = NoiseGenerator::new(42);
    c.bench_function("generate_noise_chunk", |b| {
        b.iter(|| perlin.generate(black_box(key), &mut buffer))
    });
}

fn bench_coords(c: &mut Criterion) {
    c.bench_function("world_to_chunk_and_local", |b| {
        b.iter(|| {
            let key = world_to_chunk(black_box(-12345), black_box(67890));
            let local = world_to_local(black_box(-12345), black_box(100), black_box(67890));
            (key, local)
        })
    });
}

criterion_group!(benches, bench_generators, bench_coords);
criterion_main!(benches);
