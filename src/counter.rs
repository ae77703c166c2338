use crate::error::Result;
use crate::hash::KeyHash;
use crate::map::IntCounterMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// The insert-or-increment capability a counting workload needs from a map.
///
/// Implemented by [`IntCounterMap`] and by `std`'s [`HashMap`] with any hasher, so the same
/// driver (for example [`BigramCounter::count_into`](crate::BigramCounter::count_into)) can run
/// against interchangeable map implementations.
pub trait CounterMap {
    /// Adds `add_if_present` to the counter of `key`, or stores `put_if_absent` if the key is new.
    /// Returns the counter after the operation.
    fn try_put_or_add(&mut self, key: u32, put_if_absent: i32, add_if_present: i32) -> Result<i32>;

    /// Returns the counter stored for `key`, if any.
    fn get(&self, key: u32) -> Option<i32>;

    /// Returns the number of distinct keys.
    fn len(&self) -> usize;

    /// Returns `true` if no key has been counted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> CounterMap for IntCounterMap<H>
where
    H: KeyHash,
{
    #[inline]
    fn try_put_or_add(&mut self, key: u32, put_if_absent: i32, add_if_present: i32) -> Result<i32> {
        IntCounterMap::try_put_or_add(self, key, put_if_absent, add_if_present)
    }

    #[inline]
    fn get(&self, key: u32) -> Option<i32> {
        IntCounterMap::get(self, key)
    }

    fn len(&self) -> usize {
        IntCounterMap::len(self)
    }
}

impl<S> CounterMap for HashMap<u32, i32, S>
where
    S: BuildHasher,
{
    #[inline]
    fn try_put_or_add(&mut self, key: u32, put_if_absent: i32, add_if_present: i32) -> Result<i32> {
        let value = self
            .entry(key)
            .and_modify(|v| *v = v.wrapping_add(add_if_present))
            .or_insert(put_if_absent);
        Ok(*value)
    }

    #[inline]
    fn get(&self, key: u32) -> Option<i32> {
        HashMap::get(self, &key).copied()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}
