use crate::error::{Error, Result};
use crate::map::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY};

/// Construction parameters for an [`IntCounterMap`](crate::IntCounterMap).
///
/// ```
/// use intcounter::{IntCounterMap, MapConfig, Murmur3Mix};
///
/// let config = MapConfig::default()
///     .with_initial_capacity(1024)
///     .with_load_factor(0.5);
/// let map = IntCounterMap::with_config(config, Murmur3Mix).unwrap();
/// assert_eq!(map.capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Requested table length; rounded up to a power of two.
    pub initial_capacity: usize,
    /// Occupancy ratio that triggers growth. Must lie in `(0, 1)`.
    pub load_factor: f64,
    /// Returned by [`IntCounterMap::get_or_default`](crate::IntCounterMap::get_or_default)
    /// for absent keys.
    pub default_value: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            default_value: 0,
        }
    }
}

impl MapConfig {
    /// Sets the requested table length.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Sets the value reported for absent keys.
    pub fn with_default_value(mut self, default_value: i32) -> Self {
        self.default_value = default_value;
        self
    }

    /// Checks the parameters without allocating.
    pub fn validate(&self) -> Result<()> {
        check_load_factor(self.load_factor)?;
        if self.initial_capacity > MAXIMUM_CAPACITY {
            return Err(Error::InvalidCapacity {
                requested: self.initial_capacity,
                max: MAXIMUM_CAPACITY,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_load_factor(load_factor: f64) -> Result<()> {
    // NaN fails both comparisons
    if load_factor > 0.0 && load_factor < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidLoadFactor(load_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(MapConfig::default().validate().is_ok());
    }

    #[test]
    fn load_factor_bounds() {
        for bad in [0.0, 1.0, -0.25, 1.5, f64::NAN, f64::INFINITY] {
            let err = MapConfig::default()
                .with_load_factor(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidLoadFactor(_)));
        }
        for good in [f64::MIN_POSITIVE, 0.5, 0.75, 0.999] {
            assert!(MapConfig::default().with_load_factor(good).validate().is_ok());
        }
    }

    #[test]
    fn capacity_bound() {
        let err = MapConfig::default()
            .with_initial_capacity(MAXIMUM_CAPACITY + 1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCapacity {
                requested: MAXIMUM_CAPACITY + 1,
                max: MAXIMUM_CAPACITY
            }
        );
    }
}
