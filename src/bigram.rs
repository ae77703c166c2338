use crate::config::MapConfig;
use crate::counter::CounterMap;
use crate::error::Result;
use crate::hash::{KeyHash, Murmur3Mix};
use crate::map::IntCounterMap;

/// Folds two adjacent UTF-16 code units into one key: `a` in the high half, `b` in the low half.
///
/// ```
/// assert_eq!(intcounter::bigram(0x61, 0x62), 0x0061_0062);
/// ```
#[inline]
pub fn bigram(a: u16, b: u16) -> u32 {
    (a as u32) << 16 | b as u32
}

/// Inverse of [`bigram`].
#[inline]
pub fn split_bigram(key: u32) -> (u16, u16) {
    ((key >> 16) as u16, key as u16)
}

/// Counts the bigrams of a code-unit sequence into an [`IntCounterMap`].
///
/// Every map the counter produces is built from the same [`MapConfig`] and a clone of the same
/// hash strategy.
///
/// # Examples
///
/// ```
/// use intcounter::{bigram, BigramCounter};
///
/// let counts = BigramCounter::default().count_str("aaaa").unwrap();
/// assert_eq!(counts.len(), 1);
/// assert_eq!(counts.get(bigram(97, 97)), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct BigramCounter<H = Murmur3Mix> {
    config: MapConfig,
    hasher: H,
}

impl Default for BigramCounter<Murmur3Mix> {
    fn default() -> Self {
        Self {
            config: MapConfig::default(),
            hasher: Murmur3Mix,
        }
    }
}

impl<H> BigramCounter<H>
where
    H: KeyHash + Clone,
{
    /// Creates a counter whose maps use `config` and `hasher`.
    ///
    /// # Errors
    ///
    /// Returns the configuration error [`MapConfig::validate`] reports, so that no count is
    /// started with parameters every map construction would reject.
    pub fn new(config: MapConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, hasher })
    }

    /// The configuration new maps are created with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub(crate) fn empty_map(&self) -> Result<IntCounterMap<H>> {
        IntCounterMap::with_config(self.config, self.hasher.clone())
    }

    /// Counts every adjacent pair of `chars`.
    ///
    /// The result holds one entry per distinct bigram; sequences shorter than two code units give
    /// an empty map.
    ///
    /// # Errors
    ///
    /// Propagates map construction failures and [`Error::CapacityOverflow`](crate::Error).
    pub fn count(&self, chars: &[u16]) -> Result<IntCounterMap<H>> {
        let mut map = self.empty_map()?;
        count_into(chars, &mut map)?;
        Ok(map)
    }

    /// Counts the bigrams of the UTF-16 encoding of `text`.
    ///
    /// Characters outside the Basic Multilingual Plane contribute their surrogate pair as a
    /// bigram of its own.
    pub fn count_str(&self, text: &str) -> Result<IntCounterMap<H>> {
        let chars: Vec<u16> = text.encode_utf16().collect();
        self.count(&chars)
    }

    /// Counts the bigrams of `chars` into an arbitrary [`CounterMap`].
    pub fn count_into<M>(&self, chars: &[u16], map: &mut M) -> Result<()>
    where
        M: CounterMap,
    {
        count_into(chars, map)
    }
}

pub(crate) fn count_into<M>(chars: &[u16], map: &mut M) -> Result<()>
where
    M: CounterMap + ?Sized,
{
    for pair in chars.windows(2) {
        map.try_put_or_add(bigram(pair[0], pair[1]), 1, 1)?;
    }
    Ok(())
}
