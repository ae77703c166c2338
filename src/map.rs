use crate::config::{check_load_factor, MapConfig};
use crate::error::{Error, Result};
use crate::hash::{KeyHash, Murmur3Mix};
use crate::iter::{Iter, Keys, Values};
use crate::raw::{Probe, Table};
use std::fmt::{self, Debug, Formatter};
use std::iter::FromIterator;

/// The largest possible table length.
pub const MAXIMUM_CAPACITY: usize = 1 << 30;

/// The table length used when none is given. Must be a power of two.
pub const DEFAULT_CAPACITY: usize = 16;

/// The smallest table length a map is ever created with.
pub const MIN_CAPACITY: usize = 4;

/// The load factor used when none is given.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// An open-addressing map from `u32` keys to `i32` counters.
///
/// Collisions are resolved by linear probing. Keys are never removed individually, so probe paths
/// never contain holes and no tombstones are needed. The table length is always a power of two,
/// and the map grows (it never shrinks) as soon as the number of entries reaches
/// `max_fill = min(ceil(capacity * load_factor), capacity - 1)`, so at least one slot is always
/// free.
///
/// Where a key starts probing is decided by the [`KeyHash`] strategy `H`. The default,
/// [`Murmur3Mix`], copes with keys whose low bits carry little entropy, such as the bigram keys
/// produced by [`BigramCounter`](crate::BigramCounter).
///
/// The map is single-owner. To share one between threads, wrap it in a
/// [`SharedCounterMap`](crate::SharedCounterMap) or any other lock.
///
/// # Examples
///
/// ```
/// use intcounter::IntCounterMap;
///
/// let mut map: IntCounterMap = IntCounterMap::default();
/// assert_eq!(map.put_or_add(7, 1, 1), 1);
/// assert_eq!(map.put_or_add(7, 1, 1), 2);
/// assert_eq!(map.get(7), Some(2));
/// assert_eq!(map.get_or_default(8), 0);
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct IntCounterMap<H = Murmur3Mix> {
    table: Table,

    /// Number of occupied slots.
    len: usize,

    /// Occupancy at which the next insert grows the table. Always below the table length.
    max_fill: usize,

    load_factor: f64,

    default_value: i32,

    hasher: H,
}

/// Probe-length summary of a map, see [`IntCounterMap::probe_stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeStats {
    /// Number of entries measured.
    pub entries: usize,
    /// Average number of slots a successful lookup inspects.
    pub mean_probe_length: f64,
    /// Largest number of slots a successful lookup inspects.
    pub max_probe_length: usize,
}

/// Rounds a requested table length to a valid one.
fn table_size_for(requested: usize) -> Result<usize> {
    if requested > MAXIMUM_CAPACITY {
        return Err(Error::InvalidCapacity {
            requested,
            max: MAXIMUM_CAPACITY,
        });
    }
    Ok(requested.max(MIN_CAPACITY).next_power_of_two())
}

/// Smallest table length that keeps `expected` entries at or below `load_factor`.
pub(crate) fn array_size(expected: usize, load_factor: f64) -> Result<usize> {
    let required = (expected as f64 / load_factor).ceil();
    if required > MAXIMUM_CAPACITY as f64 {
        return Err(Error::CapacityOverflow {
            // float-to-int casts saturate
            required: (required as usize)
                .checked_next_power_of_two()
                .unwrap_or(usize::MAX),
            max: MAXIMUM_CAPACITY,
        });
    }
    Ok((required as usize).max(MIN_CAPACITY).next_power_of_two())
}

/// Growth threshold for a table of `slots` entries. Leaves at least one slot free.
pub(crate) fn max_fill(slots: usize, load_factor: f64) -> usize {
    let fill = (slots as f64 * load_factor).ceil() as usize;
    fill.clamp(1, slots - 1)
}

#[cold]
#[inline(never)]
fn capacity_overflow(e: Error) -> ! {
    panic!("{}", e)
}

impl<H> Default for IntCounterMap<H>
where
    H: Default,
{
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<H> IntCounterMap<H> {
    fn from_parts(slots: usize, load_factor: f64, default_value: i32, hasher: H) -> Self {
        Self {
            table: Table::new(slots),
            len: 0,
            max_fill: max_fill(slots, load_factor),
            load_factor,
            default_value,
            hasher,
        }
    }

    /// Creates an empty map with a table of `initial_capacity` slots (rounded up to a power of
    /// two, and to at least [`MIN_CAPACITY`]) that hashes keys with `hasher`.
    ///
    /// The table grows once `ceil(capacity * load_factor)` slots are taken, so a map created with
    /// `initial_capacity = 4` and `load_factor = 0.75` doubles on its third distinct key. Use
    /// [`IntCounterMap::with_expected_size`] to size the table by entry count instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] unless `0 < load_factor < 1`, and
    /// [`Error::InvalidCapacity`] if `initial_capacity` exceeds [`MAXIMUM_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use intcounter::{IntCounterMap, Identity};
    ///
    /// let map = IntCounterMap::new(100, 0.5, Identity).unwrap();
    /// assert_eq!(map.capacity(), 128);
    /// assert!(IntCounterMap::new(16, 1.0, Identity).is_err());
    /// ```
    pub fn new(initial_capacity: usize, load_factor: f64, hasher: H) -> Result<Self> {
        Self::with_config(
            MapConfig {
                initial_capacity,
                load_factor,
                default_value: 0,
            },
            hasher,
        )
    }

    /// Creates an empty map from a [`MapConfig`].
    ///
    /// # Errors
    ///
    /// Fails the same way as [`MapConfig::validate`].
    pub fn with_config(config: MapConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        let slots = table_size_for(config.initial_capacity)?;
        Ok(Self::from_parts(
            slots,
            config.load_factor,
            config.default_value,
            hasher,
        ))
    }

    /// Creates an empty map that holds `expected` distinct keys without rehashing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] unless `0 < load_factor < 1`, and
    /// [`Error::InvalidCapacity`] if no table of at most [`MAXIMUM_CAPACITY`] slots fits
    /// `expected` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcounter::{IntCounterMap, Murmur3Mix};
    ///
    /// let mut map = IntCounterMap::with_expected_size(1000, 0.75, Murmur3Mix).unwrap();
    /// let capacity = map.capacity();
    /// for k in 0..1000 {
    ///     map.put_or_add(k, 1, 1);
    /// }
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn with_expected_size(expected: usize, load_factor: f64, hasher: H) -> Result<Self> {
        check_load_factor(load_factor)?;
        let slots = array_size(expected.saturating_add(1), load_factor).map_err(|_| {
            Error::InvalidCapacity {
                requested: expected,
                max: MAXIMUM_CAPACITY,
            }
        })?;
        Ok(Self::from_parts(slots, load_factor, 0, hasher))
    }

    /// Creates an empty map with the default capacity and load factor that hashes keys with
    /// `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, 0, hasher)
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current table length. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Returns the load factor the map was created with.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the value [`IntCounterMap::get_or_default`] reports for absent keys.
    pub fn default_value(&self) -> i32 {
        self.default_value
    }

    /// Changes the value [`IntCounterMap::get_or_default`] reports for absent keys.
    pub fn set_default_value(&mut self, default_value: i32) {
        self.default_value = default_value;
    }

    /// Returns a reference to the map's [`KeyHash`] strategy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Removes every entry. The allocated table is kept.
    pub fn clear(&mut self) {
        self.table.clear();
        self.len = 0;
    }

    /// An iterator visiting all key-counter pairs in slot order.
    ///
    /// Slot order depends on the hash strategy and on the table length; any rehash reorders it.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.table, self.len)
    }

    /// An iterator visiting all keys in slot order.
    pub fn keys(&self) -> Keys<'_> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all counters in slot order.
    pub fn values(&self) -> Values<'_> {
        Values { iter: self.iter() }
    }
}

impl<H> IntCounterMap<H>
where
    H: KeyHash,
{
    #[inline]
    fn probe(&self, key: u32) -> Probe {
        self.table.find(key, self.hasher.hash(key))
    }

    /// Returns the counter stored for `key`, if any.
    #[inline]
    pub fn get(&self, key: u32) -> Option<i32> {
        match self.probe(key) {
            Probe::Occupied(slot) => Some(self.table.value(slot)),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns the counter stored for `key`, or the map's default value.
    ///
    /// ```
    /// use intcounter::{IntCounterMap, MapConfig, Murmur3Mix};
    ///
    /// let config = MapConfig::default().with_default_value(-1);
    /// let map = IntCounterMap::with_config(config, Murmur3Mix).unwrap();
    /// assert_eq!(map.get_or_default(3), -1);
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn get_or_default(&self, key: u32) -> i32 {
        self.get(key).unwrap_or(self.default_value)
    }

    /// Returns `true` if the map holds a counter for `key`.
    pub fn contains_key(&self, key: u32) -> bool {
        matches!(self.probe(key), Probe::Occupied(_))
    }

    /// Adds `add_if_present` to the counter of `key`, or stores `put_if_absent` if the key is new.
    /// Returns the counter after the operation.
    ///
    /// Counters wrap around on overflow.
    ///
    /// # Panics
    ///
    /// Panics if inserting a new key would grow the table past [`MAXIMUM_CAPACITY`]; see
    /// [`IntCounterMap::try_put_or_add`].
    ///
    /// # Examples
    ///
    /// ```
    /// use intcounter::IntCounterMap;
    ///
    /// let mut map: IntCounterMap = IntCounterMap::default();
    /// assert_eq!(map.put_or_add(1, 10, 3), 10);
    /// assert_eq!(map.put_or_add(1, 10, 3), 13);
    /// ```
    #[inline]
    pub fn put_or_add(&mut self, key: u32, put_if_absent: i32, add_if_present: i32) -> i32 {
        match self.try_put_or_add(key, put_if_absent, add_if_present) {
            Ok(value) => value,
            Err(e) => capacity_overflow(e),
        }
    }

    /// Fallible form of [`IntCounterMap::put_or_add`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if `key` is new and the map cannot grow any further.
    /// The map is unchanged in that case.
    #[inline]
    pub fn try_put_or_add(
        &mut self,
        key: u32,
        put_if_absent: i32,
        add_if_present: i32,
    ) -> Result<i32> {
        match self.probe(key) {
            Probe::Occupied(slot) => {
                let value = self.table.value_mut(slot);
                *value = value.wrapping_add(add_if_present);
                Ok(*value)
            }
            Probe::Vacant(slot) => {
                self.insert_at(slot, key, put_if_absent)?;
                Ok(put_if_absent)
            }
        }
    }

    /// Sets the counter of `key` to `value`, returning the previous counter if there was one.
    ///
    /// # Panics
    ///
    /// Panics if inserting a new key would grow the table past [`MAXIMUM_CAPACITY`].
    pub fn put(&mut self, key: u32, value: i32) -> Option<i32> {
        match self.try_put(key, value) {
            Ok(old) => old,
            Err(e) => capacity_overflow(e),
        }
    }

    /// Fallible form of [`IntCounterMap::put`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if `key` is new and the map cannot grow any further.
    /// The map is unchanged in that case.
    pub fn try_put(&mut self, key: u32, value: i32) -> Result<Option<i32>> {
        match self.probe(key) {
            Probe::Occupied(slot) => Ok(Some(std::mem::replace(
                self.table.value_mut(slot),
                value,
            ))),
            Probe::Vacant(slot) => {
                self.insert_at(slot, key, value)?;
                Ok(None)
            }
        }
    }

    fn insert_at(&mut self, slot: usize, key: u32, value: i32) -> Result<()> {
        self.table.occupy(slot, key, value);
        self.len += 1;
        if self.len >= self.max_fill {
            match array_size(self.len + 1, self.load_factor) {
                Ok(slots) => self.rehash(slots),
                Err(e) => {
                    self.table.vacate_last(slot);
                    self.len -= 1;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn rehash(&mut self, slots: usize) {
        log::debug!(
            "rehashing counter map with {} entries from {} to {} slots",
            self.len,
            self.table.len(),
            slots
        );
        let mut table = Table::new(slots);
        for slot in 0..self.table.len() {
            if self.table.is_used(slot) {
                let key = self.table.key(slot);
                let pos = table.find_vacant(self.hasher.hash(key));
                table.occupy(pos, key, self.table.value(slot));
            }
        }
        self.table = table;
        self.max_fill = max_fill(slots, self.load_factor);
    }

    /// Grows the table so that `additional` more distinct keys fit without a rehash.
    ///
    /// # Panics
    ///
    /// Panics if the required table exceeds [`MAXIMUM_CAPACITY`].
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            capacity_overflow(e);
        }
    }

    /// Fallible form of [`IntCounterMap::reserve`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the required table exceeds [`MAXIMUM_CAPACITY`].
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self.len.saturating_add(additional);
        if needed < self.max_fill {
            return Ok(());
        }
        let slots = array_size(needed.saturating_add(1), self.load_factor)?;
        if slots > self.table.len() {
            log::debug!("reserving room for {} more entries", additional);
            self.rehash(slots);
        }
        Ok(())
    }

    /// Adds every counter of `other` to this map, inserting keys this map does not have yet.
    ///
    /// # Panics
    ///
    /// Panics if the map cannot grow enough; see [`IntCounterMap::try_merge`].
    pub fn merge<H2>(&mut self, other: &IntCounterMap<H2>) {
        if let Err(e) = self.try_merge(other) {
            capacity_overflow(e);
        }
    }

    /// Fallible form of [`IntCounterMap::merge`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the map cannot grow enough. The map is unchanged in
    /// that case.
    pub fn try_merge<H2>(&mut self, other: &IntCounterMap<H2>) -> Result<()> {
        // room for every new key up front, so no insert below can fail midway
        let new_keys = other.keys().filter(|&k| !self.contains_key(k)).count();
        self.try_reserve(new_keys)?;
        for (key, count) in other {
            self.try_put_or_add(key, count, count)?;
        }
        Ok(())
    }

    /// Measures how far entries sit from the slot their hash points at.
    ///
    /// A probe length of 1 means the key is in its home slot. Comparing strategies on a sample of
    /// real keys is the way to pick one:
    ///
    /// ```
    /// use intcounter::{IntCounterMap, Identity, Murmur3Mix};
    ///
    /// // keys that only differ in their high half all share a home slot under `Identity`
    /// let keys: Vec<u32> = (0..200).map(|a| a << 16 | 97).collect();
    ///
    /// let mut plain = IntCounterMap::with_hasher(Identity);
    /// let mut mixed = IntCounterMap::with_hasher(Murmur3Mix);
    /// for &k in &keys {
    ///     plain.put_or_add(k, 1, 1);
    ///     mixed.put_or_add(k, 1, 1);
    /// }
    /// assert!(mixed.probe_stats().mean_probe_length < plain.probe_stats().mean_probe_length);
    /// ```
    pub fn probe_stats(&self) -> ProbeStats {
        let mut total = 0usize;
        let mut max = 0usize;
        for slot in 0..self.table.len() {
            if self.table.is_used(slot) {
                let hash = self.hasher.hash(self.table.key(slot));
                let probes = self.table.displacement(slot, hash) + 1;
                total += probes;
                max = max.max(probes);
            }
        }
        ProbeStats {
            entries: self.len,
            mean_probe_length: if self.len == 0 {
                0.0
            } else {
                total as f64 / self.len as f64
            },
            max_probe_length: max,
        }
    }
}

impl<H> Debug for IntCounterMap<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<H, H2> PartialEq<IntCounterMap<H2>> for IntCounterMap<H>
where
    H2: KeyHash,
{
    fn eq(&self, other: &IntCounterMap<H2>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<H> Eq for IntCounterMap<H> where H: KeyHash {}

impl<'a, H> IntoIterator for &'a IntCounterMap<H> {
    type Item = (u32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H> Extend<(u32, i32)> for IntCounterMap<H>
where
    H: KeyHash,
{
    /// Stores each pair with [`IntCounterMap::put`]; later pairs overwrite earlier ones.
    fn extend<T: IntoIterator<Item = (u32, i32)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };
        self.reserve(reserve);
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<H> FromIterator<(u32, i32)> for IntCounterMap<H>
where
    H: KeyHash + Default,
{
    fn from_iter<T: IntoIterator<Item = (u32, i32)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Identity;

    #[test]
    fn sizing() {
        assert_eq!(table_size_for(0).unwrap(), MIN_CAPACITY);
        assert_eq!(table_size_for(5).unwrap(), 8);
        assert_eq!(table_size_for(MAXIMUM_CAPACITY).unwrap(), MAXIMUM_CAPACITY);
        assert!(table_size_for(MAXIMUM_CAPACITY + 1).is_err());

        assert_eq!(array_size(12, 0.75).unwrap(), 16);
        assert_eq!(array_size(13, 0.75).unwrap(), 32);
        assert_eq!(array_size(1, 0.5).unwrap(), MIN_CAPACITY);
        assert!(matches!(
            array_size(MAXIMUM_CAPACITY, 0.5),
            Err(Error::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn fill_threshold() {
        assert_eq!(max_fill(16, 0.75), 12);
        assert_eq!(max_fill(4, 0.75), 3);
        // never the whole table
        assert_eq!(max_fill(4, 0.99), 3);
        // never zero
        assert_eq!(max_fill(4, 0.01), 1);
    }

    #[test]
    fn threshold_stays_below_capacity() {
        let mut map = IntCounterMap::new(4, 0.9, Identity).unwrap();
        for k in 0..10_000 {
            map.put_or_add(k, 1, 1);
            assert!(map.len() < map.max_fill);
            assert!(map.max_fill < map.capacity());
            assert!(map.capacity().is_power_of_two());
        }
    }

    #[test]
    fn growth_always_enlarges() {
        for &lf in &[0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let mut map = IntCounterMap::new(4, lf, Murmur3Mix).unwrap();
            for k in 0..2_000 {
                let (capacity, fill) = (map.capacity(), map.max_fill);
                map.put(k, 0);
                if map.len() >= fill {
                    assert!(map.capacity() > capacity, "load factor {}", lf);
                } else {
                    assert_eq!(map.capacity(), capacity);
                }
                assert!(map.len() < map.max_fill);
            }
        }
    }

    #[test]
    fn failed_growth_leaves_map_untouched() {
        let mut map = IntCounterMap::new(4, 1e-9, Identity).unwrap();
        assert_eq!(map.max_fill, 1);

        let err = map.try_put_or_add(1, 1, 1).unwrap_err();
        assert!(matches!(err, Error::CapacityOverflow { .. }));
        assert!(map.is_empty());
        assert_eq!(map.get(1), None);
        assert_eq!(map.capacity(), 4);

        assert!(map.try_put(1, 5).is_err());
        assert!(map.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn put_or_add_panics_on_overflow() {
        let mut map = IntCounterMap::new(4, 1e-9, Identity).unwrap();
        map.put_or_add(1, 1, 1);
    }

    #[test]
    fn reserve_prevents_rehash() {
        let mut map = IntCounterMap::with_hasher(Murmur3Mix);
        map.put_or_add(u32::MAX, 1, 1);
        map.reserve(500);
        let capacity = map.capacity();
        for k in 0..500 {
            map.put_or_add(k, 1, 1);
        }
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.len(), 501);
    }

    #[test]
    fn failed_merge_leaves_map_untouched() {
        let mut map = IntCounterMap::new(4, 1e-9, Identity).unwrap();
        let mut other = IntCounterMap::with_hasher(Identity);
        other.put_or_add(1, 1, 1);
        other.put_or_add(2, 1, 1);
        assert!(matches!(
            map.try_merge(&other),
            Err(Error::CapacityOverflow { .. })
        ));
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 4);
    }

    #[test]
    fn merge_of_known_keys_does_not_grow() {
        let mut map = IntCounterMap::with_hasher(Murmur3Mix);
        for k in 0..11 {
            map.put(k, 1);
        }
        let copy = map.clone();
        // 11 of 12 fill slots taken; only genuinely new keys need room
        map.try_merge(&copy).unwrap();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.len(), 11);
        for k in 0..11 {
            assert_eq!(map.get(k), Some(2));
        }
    }

    #[test]
    fn try_reserve_overflow() {
        let mut map: IntCounterMap = IntCounterMap::default();
        assert!(map.try_reserve(usize::MAX).is_err());
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn expected_size_too_large() {
        let err = IntCounterMap::with_expected_size(MAXIMUM_CAPACITY, 0.75, Identity).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn probe_stats_empty() {
        let map: IntCounterMap = IntCounterMap::default();
        let stats = map.probe_stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.max_probe_length, 0);
        assert_eq!(stats.mean_probe_length, 0.0);
    }

    #[test]
    fn probe_stats_identity_collisions() {
        // everything hashes to slot 0 of a 16-slot table
        let mut map = IntCounterMap::with_hasher(|_: u32| 0u32);
        for k in 0..5 {
            map.put(k, 1);
        }
        let stats = map.probe_stats();
        assert_eq!(stats.entries, 5);
        assert_eq!(stats.max_probe_length, 5);
        assert_eq!(stats.mean_probe_length, 3.0);
    }
}
