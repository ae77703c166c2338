//! Key mixing strategies for [`IntCounterMap`](crate::IntCounterMap).
//!
//! The map only ever looks at the low bits of `hash(key)` (the table length is a power of two), so
//! the strategy decides how well keys spread across slots. Bigram keys carry the first code unit in
//! the high half and the second in the low half; with [`Identity`] every bigram that ends in the
//! same character starts probing at the same slot. The finalizers below avalanche all 32 input bits
//! into the low ones.

use std::hash::{BuildHasher, Hasher};

/// A function from a 32-bit key to a 32-bit hash.
///
/// Implemented by the unit strategies in this module, by [`BuildHasherKeyHash`] for any
/// [`BuildHasher`], and by every `Fn(u32) -> u32`:
///
/// ```
/// use intcounter::IntCounterMap;
///
/// let mut map = IntCounterMap::with_hasher(|k: u32| k.rotate_left(7));
/// map.put_or_add(3, 1, 1);
/// assert_eq!(map.get(3), Some(1));
/// ```
pub trait KeyHash {
    /// Hashes `key`. Equal keys must produce equal hashes.
    fn hash(&self, key: u32) -> u32;
}

impl<F> KeyHash for F
where
    F: Fn(u32) -> u32,
{
    #[inline]
    fn hash(&self, key: u32) -> u32 {
        self(key)
    }
}

/// Uses the key itself as its hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl KeyHash for Identity {
    #[inline]
    fn hash(&self, key: u32) -> u32 {
        key
    }
}

/// The MurmurHash3 32-bit finalizer (`fmix32`).
///
/// A bijection on `u32`, so distinct keys never share a hash; only the masking to the table
/// length can make them collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Murmur3Mix;

impl KeyHash for Murmur3Mix {
    #[inline]
    fn hash(&self, key: u32) -> u32 {
        let mut h = key;
        h ^= h >> 16;
        h = h.wrapping_mul(0x85eb_ca6b);
        h ^= h >> 13;
        h = h.wrapping_mul(0xc2b2_ae35);
        h ^ (h >> 16)
    }
}

/// Multiplication by the 32-bit golden ratio followed by a single xor-shift.
///
/// Cheaper than [`Murmur3Mix`] with a weaker avalanche.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhiMix;

const PHI: u32 = 0x9e37_79b9;

impl KeyHash for PhiMix {
    #[inline]
    fn hash(&self, key: u32) -> u32 {
        let h = key.wrapping_mul(PHI);
        h ^ (h >> 16)
    }
}

/// Adapts a [`BuildHasher`] into a [`KeyHash`].
///
/// The 64-bit digest is folded to 32 bits by xoring its halves.
#[derive(Debug, Clone, Default)]
pub struct BuildHasherKeyHash<S> {
    build_hasher: S,
}

impl<S> BuildHasherKeyHash<S> {
    /// Wraps `build_hasher`.
    pub fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// Returns a reference to the wrapped hash builder.
    pub fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<S> KeyHash for BuildHasherKeyHash<S>
where
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: u32) -> u32 {
        let mut h = self.build_hasher.build_hasher();
        h.write_u32(key);
        let digest = h.finish();
        (digest ^ (digest >> 32)) as u32
    }
}

/// Randomly seeded `ahash` strategy.
pub type RandomKeyHash = BuildHasherKeyHash<ahash::RandomState>;
