//! A counting map for 32-bit integer keys, and a bigram counter built on top of it.
//!
//! The centerpiece is [`IntCounterMap`], an open-addressing hash table from `u32` keys to `i32`
//! counters. It is specialised for one access pattern: insert a key with an initial value if it
//! is absent, or add an increment to its counter if it is present. That is
//! [`IntCounterMap::put_or_add`]. It also supports plain [`get`](IntCounterMap::get) and
//! [`put`](IntCounterMap::put), but it deliberately offers no way of removing a single key.
//!
//! [`BigramCounter`] is the workload the map was built for. It folds every pair of adjacent
//! UTF-16 code units `a, b` into the key `(a << 16) | b` (see [`bigram`]) and counts it.
//!
//! ```
//! use intcounter::{bigram, BigramCounter};
//!
//! let counts = BigramCounter::default().count_str("aab").unwrap();
//! assert_eq!(counts.len(), 2);
//! assert_eq!(counts.get(bigram(97, 97)), Some(1));
//! assert_eq!(counts.get(bigram(97, 98)), Some(1));
//! ```
//!
//! # Hash strategies
//!
//! The table length is a power of two, and a key starts probing at `hash(key) & (capacity - 1)`,
//! so only the low bits of the hash matter. Bigram keys keep the second code unit in their low
//! half. Natural-language text uses few distinct characters, so hashing bigrams with
//! [`Identity`] piles them onto a few home slots, and linear probing degrades towards a scan. The
//! default strategy is therefore [`Murmur3Mix`], a finalizer that spreads every key bit into
//! the low bits. [`PhiMix`], any [`BuildHasher`](std::hash::BuildHasher) (through
//! [`BuildHasherKeyHash`]), and any `Fn(u32) -> u32` can be plugged in instead.
//! [`IntCounterMap::probe_stats`] tells how well a strategy does on a given key set.
//!
//! # Resizing behavior
//!
//! The map grows when an insert brings the number of entries up to
//! `ceil(capacity * load_factor)`. The new table is the smallest power of two that keeps the
//! entries below the load factor, and every entry is re-probed into it. This happens inside the
//! insert that crossed the threshold. Hot loops that know their key count up front should
//! create the map with [`IntCounterMap::with_expected_size`] or call
//! [`IntCounterMap::reserve`]. Tables never shrink, and never exceed [`MAXIMUM_CAPACITY`]
//! slots. Running into that limit is reported by the `try_` methods as
//! [`Error::CapacityOverflow`], and makes the other mutators panic.
//!
//! # Sharing
//!
//! A map has a single owner and no internal locking. [`SharedCounterMap`] puts one behind a
//! mutex. With the `rayon` feature, `BigramCounter::par_count` counts chunks of the input in
//! parallel and merges them.
//!
//! # Features
//!
//! - `rayon`: parallel counting, and `ParallelExtend`/`FromParallelIterator` for
//!   [`IntCounterMap`].
//! - `serde`: `Serialize`/`Deserialize` for [`IntCounterMap`] (as a map of key to counter) and
//!   [`MapConfig`].
#![deny(
    missing_docs,
    missing_debug_implementations,
    unreachable_pub,
    rustdoc::broken_intra_doc_links
)]
#![warn(rust_2018_idioms)]

mod bigram;
mod config;
mod counter;
mod error;
mod hash;
mod map;
mod raw;
mod sync;

pub mod iter;

#[cfg(feature = "rayon")]
mod rayon_impls;

#[cfg(feature = "serde")]
mod serde_impls;

pub use bigram::{bigram, split_bigram, BigramCounter};
pub use config::MapConfig;
pub use counter::CounterMap;
pub use error::{Error, Result};
pub use hash::{BuildHasherKeyHash, Identity, KeyHash, Murmur3Mix, PhiMix, RandomKeyHash};
pub use map::{
    IntCounterMap, ProbeStats, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY,
    MIN_CAPACITY,
};
pub use sync::SharedCounterMap;
