//! Criterion micro-benchmarks for aligned allocation and arena operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use imsdl_arena::{align_up, aligned_alloc, aligned_free, Arena, ArenaConfig};
use imsdl_bench::{cache_line_profile, fill, vertex_profile};

/// Benchmark: create + destroy a 10K-vertex arena (zeroed region).
fn bench_arena_create_10k(c: &mut Criterion) {
    c.bench_function("arena_create_10k", |b| {
        b.iter(|| {
            let arena = Arena::new(vertex_profile(10_000)).unwrap();
            black_box(arena.base());
            arena.destroy();
        });
    });
}

/// Benchmark: create an uninitialised 10K-vertex arena.
fn bench_arena_create_uninit_10k(c: &mut Criterion) {
    c.bench_function("arena_create_uninit_10k", |b| {
        b.iter(|| {
            let arena = Arena::new(vertex_profile(10_000).uninit()).unwrap();
            black_box(arena.base());
        });
    });
}

/// Benchmark: hand out every slot of a 10K-slot cache-line arena.
fn bench_arena_fill_10k(c: &mut Criterion) {
    c.bench_function("arena_fill_10k", |b| {
        b.iter(|| {
            let mut arena = Arena::new(cache_line_profile(10_000).uninit()).unwrap();
            black_box(fill(&mut arena));
        });
    });
}

/// Benchmark: a single bump allocation from a fresh arena per batch input.
fn bench_arena_allocate(c: &mut Criterion) {
    c.bench_function("arena_allocate", |b| {
        b.iter_batched_ref(
            || Arena::new(ArenaConfig::for_type::<u64>(1).uninit()).unwrap(),
            |arena| black_box(arena.allocate().unwrap()),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: allocate against an arena that is already full.
fn bench_arena_allocate_full(c: &mut Criterion) {
    let mut arena = Arena::new(ArenaConfig::for_type::<u64>(1)).unwrap();
    fill(&mut arena);
    c.bench_function("arena_allocate_full", |b| {
        b.iter(|| {
            black_box(arena.allocate().unwrap_err());
        });
    });
}

/// Benchmark: aligned_alloc + aligned_free of a 4KB page-aligned block.
fn bench_aligned_alloc_4k(c: &mut Criterion) {
    c.bench_function("aligned_alloc_4k", |b| {
        b.iter(|| {
            let block = aligned_alloc(black_box(4096), black_box(4096)).unwrap();
            aligned_free(Some(black_box(block)));
        });
    });
}

/// Benchmark: address rounding.
fn bench_align_up(c: &mut Criterion) {
    let mut addr = 0usize;
    c.bench_function("align_up", |b| {
        b.iter(|| {
            addr = addr.wrapping_add(7) & 0xFFFF_FFFF;
            black_box(align_up(black_box(addr), 64).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_arena_create_10k,
    bench_arena_create_uninit_10k,
    bench_arena_fill_10k,
    bench_arena_allocate,
    bench_arena_allocate_full,
    bench_aligned_alloc_4k,
    bench_align_up
);
criterion_main!(benches);
