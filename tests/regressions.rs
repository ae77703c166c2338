use intcounter::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn random_put_or_add() {
    #[cfg(not(miri))]
    const ITERATIONS: usize = 100_000;
    #[cfg(miri)]
    const ITERATIONS: usize = 100;

    let mut rng = StdRng::seed_from_u64(90);
    let mut map = IntCounterMap::new(4, 0.75, Identity).unwrap();
    let mut counts = vec![0i32; 1000];
    for _ in 0..ITERATIONS {
        let el = rng.gen_range(0..1000u32);
        map.put_or_add(el, 1, 1);
        counts[el as usize] += 1;
    }
    for (el, &count) in counts.iter().enumerate() {
        let expected = if count == 0 { None } else { Some(count) };
        assert_eq!(map.get(el as u32), expected);
    }
}

#[test]
fn probe_wraps_past_last_slot() {
    // every key starts at the last slot of the 8-slot table
    let last = |_: u32| 7u32;
    let mut map = IntCounterMap::new(8, 0.75, last).unwrap();
    for k in 0..5 {
        map.put_or_add(k, 1, 1);
    }
    assert_eq!(map.capacity(), 8);
    for k in 0..5 {
        assert_eq!(map.put_or_add(k, 1, 1), 2);
    }
    assert_eq!(map.get(5), None);
    assert_eq!(map.probe_stats().max_probe_length, 5);
}

#[test]
fn lookup_miss_on_nearly_full_table() {
    // the threshold leaves exactly one slot free
    let mut map = IntCounterMap::new(8, 0.99, |k: u32| k).unwrap();
    for k in 0..6 {
        map.put(k, 0);
    }
    assert_eq!(map.capacity(), 8);
    assert_eq!(map.get(8), None);
    assert_eq!(map.get(u32::MAX), None);
    map.put(6, 0);
    assert_eq!(map.capacity(), 16);
}

#[test]
fn keys_equal_to_slot_count() {
    let mut map = IntCounterMap::new(4, 0.5, Identity).unwrap();
    for k in [0, 4, 8, 16, 32, 64] {
        map.put_or_add(k, 1, 1);
    }
    for k in [0, 4, 8, 16, 32, 64] {
        assert_eq!(map.get(k), Some(1));
    }
    assert_eq!(map.len(), 6);
}
