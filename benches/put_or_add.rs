/* This benchmark suite runs the counting primitives along two dimensions:
 *   Key distribution: low bit heavy, top bit heavy, and random.
 *   Task: put_or_add into a fresh map, put_or_add on present keys, get, get of absent keys, iter
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use intcounter::{IntCounterMap, Murmur3Mix};

const SIZE: usize = 1000;

#[derive(Clone, Copy)]
struct RandomKeys {
    state: u32,
}

impl RandomKeys {
    fn new() -> Self {
        RandomKeys { state: 0 }
    }
}

impl Iterator for RandomKeys {
    type Item = u32;
    fn next(&mut self) -> Option<u32> {
        // Add 1 then multiply by some 32 bit prime.
        self.state = self.state.wrapping_add(1).wrapping_mul(3_787_392_781);
        Some(self.state)
    }
}

fn filled<I: Iterator<Item = u32>>(keys: I) -> IntCounterMap {
    let mut map = IntCounterMap::with_expected_size(SIZE, 0.75, Murmur3Mix).unwrap();
    keys.take(SIZE).for_each(|k| {
        map.put_or_add(k, 1, 1);
    });
    map
}

macro_rules! bench_suite {
    ($bench_macro:ident, $bench_fn_name:ident, $group_name:expr $(,)?) => {
        fn $bench_fn_name(c: &mut Criterion) {
            let mut group = c.benchmark_group($group_name);
            group.throughput(Throughput::Elements(SIZE as u64));

            $bench_macro!(group, 0u32.., "low");
            $bench_macro!(group, (0u32..).map(u32::swap_bytes), "high");
            $bench_macro!(group, RandomKeys::new(), "random");

            group.finish();
        }
    };
}

macro_rules! bench_insert {
    ($group:ident, $keydist:expr, $bench_id: expr) => {
        $group.bench_function(BenchmarkId::from_parameter($bench_id), |b| {
            let mut map: IntCounterMap = IntCounterMap::default();
            b.iter(|| {
                map.clear();
                ($keydist).take(SIZE).for_each(|k| {
                    map.put_or_add(k, 1, 1);
                });
                black_box(&map);
            });
        });
    };
}

bench_suite!(bench_insert, insert_put_or_add, "insert_put_or_add");

macro_rules! bench_increment {
    ($group:ident, $keydist:expr, $bench_id: expr) => {
        let mut map = filled($keydist);
        $group.bench_function(BenchmarkId::from_parameter($bench_id), |b| {
            b.iter(|| {
                ($keydist).take(SIZE).for_each(|k| {
                    black_box(map.put_or_add(k, 1, 1));
                });
            });
        });
    };
}

bench_suite!(bench_increment, increment_put_or_add, "increment_put_or_add");

macro_rules! bench_lookup {
    ($group:ident, $keydist:expr, $bench_id: expr) => {
        let map = filled($keydist);
        $group.bench_function(BenchmarkId::from_parameter($bench_id), |b| {
            b.iter(|| {
                ($keydist).take(SIZE).for_each(|k| {
                    black_box(map.get(k));
                });
            });
        });
    };
}

bench_suite!(bench_lookup, get_put_or_add, "get_put_or_add");

macro_rules! bench_lookup_fail {
    ($group:ident, $keydist:expr, $bench_id: expr) => {
        let mut iter = $keydist;
        let map = filled(&mut iter);
        $group.bench_function(BenchmarkId::from_parameter($bench_id), |b| {
            b.iter(|| {
                (&mut iter).take(SIZE).for_each(|k| {
                    black_box(map.get(k));
                });
            });
        });
    };
}

bench_suite!(bench_lookup_fail, get_absent_put_or_add, "get_absent_put_or_add");

macro_rules! bench_iter {
    ($group:ident, $keydist:expr, $bench_id: expr) => {
        let map = filled($keydist);
        $group.bench_function(BenchmarkId::from_parameter($bench_id), |b| {
            b.iter(|| {
                for entry in &map {
                    black_box(entry);
                }
            });
        });
    };
}

bench_suite!(bench_iter, iter_put_or_add, "iter_put_or_add");

criterion_group!(
    benches,
    insert_put_or_add,
    increment_put_or_add,
    get_put_or_add,
    get_absent_put_or_add,
    iter_put_or_add,
);
criterion_main!(benches);
