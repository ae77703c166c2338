use crate::error::Result;
use crate::hash::{KeyHash, Murmur3Mix};
use crate::map::IntCounterMap;
use parking_lot::{Mutex, MutexGuard};

/// An [`IntCounterMap`] behind a lock, for counting from several threads.
///
/// Every operation takes the lock for its whole duration. Threads that count many keys should
/// fill a local map and [`try_merge`](SharedCounterMap::try_merge) it once, rather than
/// contending on every key.
///
/// ```
/// use intcounter::{IntCounterMap, Murmur3Mix, SharedCounterMap};
/// use std::sync::Arc;
///
/// let shared = Arc::new(SharedCounterMap::new(IntCounterMap::with_hasher(Murmur3Mix)));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = Arc::clone(&shared);
///         std::thread::spawn(move || {
///             for _ in 0..100 {
///                 shared.put_or_add(1, 1, 1);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(shared.get(1), Some(400));
/// ```
#[derive(Debug, Default)]
pub struct SharedCounterMap<H = Murmur3Mix> {
    inner: Mutex<IntCounterMap<H>>,
}

impl<H> SharedCounterMap<H> {
    /// Wraps `map`.
    pub fn new(map: IntCounterMap<H>) -> Self {
        Self {
            inner: Mutex::new(map),
        }
    }

    /// Locks the map for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, IntCounterMap<H>> {
        self.inner.lock()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Unwraps the map.
    pub fn into_inner(self) -> IntCounterMap<H> {
        self.inner.into_inner()
    }
}

impl<H> SharedCounterMap<H>
where
    H: KeyHash,
{
    /// See [`IntCounterMap::put_or_add`].
    pub fn put_or_add(&self, key: u32, put_if_absent: i32, add_if_present: i32) -> i32 {
        self.inner.lock().put_or_add(key, put_if_absent, add_if_present)
    }

    /// See [`IntCounterMap::try_put_or_add`].
    pub fn try_put_or_add(&self, key: u32, put_if_absent: i32, add_if_present: i32) -> Result<i32> {
        self.inner
            .lock()
            .try_put_or_add(key, put_if_absent, add_if_present)
    }

    /// See [`IntCounterMap::get`].
    pub fn get(&self, key: u32) -> Option<i32> {
        self.inner.lock().get(key)
    }

    /// Adds every counter of `local` under a single lock acquisition.
    ///
    /// See [`IntCounterMap::try_merge`]; on error the shared map is unchanged.
    pub fn try_merge<H2>(&self, local: &IntCounterMap<H2>) -> Result<()> {
        self.inner.lock().try_merge(local)
    }
}

impl<H> From<IntCounterMap<H>> for SharedCounterMap<H> {
    fn from(map: IntCounterMap<H>) -> Self {
        Self::new(map)
    }
}
