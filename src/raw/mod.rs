/// Where a linear probe for a key stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key lives in this slot.
    Occupied(usize),
    /// The key is absent; this is the first free slot on its probe path.
    Vacant(usize),
}

/// Backing storage of an [`IntCounterMap`](crate::IntCounterMap).
///
/// Three parallel arrays of the same power-of-two length. `keys[i]` and `values[i]` are only
/// meaningful while `used[i]` is set. The owning map keeps at least one slot free at all times,
/// which is what lets [`Table::find`] terminate without a bound.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    keys: Box<[u32]>,
    values: Box<[i32]>,
    used: Box<[bool]>,
    mask: usize,
}

impl Table {
    pub(crate) fn new(slots: usize) -> Self {
        debug_assert!(slots.is_power_of_two());
        Self {
            keys: vec![0; slots].into_boxed_slice(),
            values: vec![0; slots].into_boxed_slice(),
            used: vec![false; slots].into_boxed_slice(),
            mask: slots - 1,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn start(&self, hash: u32) -> usize {
        hash as usize & self.mask
    }

    /// Scans forward from `hash & mask` until it meets `key` or a free slot.
    #[inline]
    pub(crate) fn find(&self, key: u32, hash: u32) -> Probe {
        let mut pos = self.start(hash);
        while self.used[pos] {
            if self.keys[pos] == key {
                return Probe::Occupied(pos);
            }
            pos = (pos + 1) & self.mask;
        }
        Probe::Vacant(pos)
    }

    /// First free slot on the probe path of `hash`, for keys known to be absent.
    #[inline]
    pub(crate) fn find_vacant(&self, hash: u32) -> usize {
        let mut pos = self.start(hash);
        while self.used[pos] {
            pos = (pos + 1) & self.mask;
        }
        pos
    }

    #[inline]
    pub(crate) fn occupy(&mut self, slot: usize, key: u32, value: i32) {
        debug_assert!(!self.used[slot]);
        self.used[slot] = true;
        self.keys[slot] = key;
        self.values[slot] = value;
    }

    /// Frees a slot that was occupied by the most recent insert.
    ///
    /// Only sound for the last slot filled: freeing any other slot could cut the probe path of a
    /// key placed after it.
    pub(crate) fn vacate_last(&mut self, slot: usize) {
        debug_assert!(self.used[slot]);
        self.used[slot] = false;
    }

    #[inline]
    pub(crate) fn key(&self, slot: usize) -> u32 {
        self.keys[slot]
    }

    #[inline]
    pub(crate) fn value(&self, slot: usize) -> i32 {
        self.values[slot]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, slot: usize) -> &mut i32 {
        &mut self.values[slot]
    }

    #[inline]
    pub(crate) fn is_used(&self, slot: usize) -> bool {
        self.used[slot]
    }

    /// Distance from the home slot of `hash` to `slot`, wrapping at the table end.
    #[inline]
    pub(crate) fn displacement(&self, slot: usize, hash: u32) -> usize {
        slot.wrapping_sub(self.start(hash)) & self.mask
    }

    pub(crate) fn clear(&mut self) {
        self.used.fill(false);
    }
}
