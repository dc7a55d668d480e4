use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridlock::grid::Grid;
use gridlock::multiset::Multiset;

fn grid_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_scan");
    for size in [16_usize, 64_usize].iter() {
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let grid = Grid::new(size, size).unwrap();
            for row in 0..size {
                for column in 0..size {
                    grid.set_cell(row, column, format!("Test{row}{column}"))
                        .unwrap();
                }
            }
            b.iter(|| {
                // A miss admits every row in turn.
                assert!(grid.search_string("absent").is_none());
            });
        });
    }
    group.finish();
}

fn grid_contended_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_contended_reads");
    for threads in [2_usize, 4_usize].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                let grid = Grid::new(8, 8).unwrap();
                b.iter(|| {
                    std::thread::scope(|scope| {
                        for _ in 0..threads {
                            let grid = &grid;
                            scope.spawn(move || {
                                for row in 0..8 {
                                    for column in 0..8 {
                                        grid.get_cell(row, column).unwrap();
                                    }
                                }
                            });
                        }
                    });
                });
            },
        );
    }
    group.finish();
}

fn multiset_add_delete(c: &mut Criterion) {
    c.bench_function("multiset_add_delete", |b| {
        b.iter(|| {
            let multiset = Multiset::new();
            for i in 0..64_u32 {
                multiset.add(format!("word{}", i % 16));
            }
            for i in 0..64_u32 {
                multiset.delete(&format!("word{}", i % 16));
            }
            assert!(multiset.is_empty());
        });
    });
}

criterion_group!(benches, grid_scan, grid_contended_reads, multiset_add_delete);
criterion_main!(benches);
