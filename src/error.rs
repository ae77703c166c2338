//! Errors reported by [`IntCounterMap`](crate::IntCounterMap) and the code built on it.

use thiserror::Error;

/// The error type for map construction and growth.
///
/// Configuration errors are only ever returned by constructors (or by
/// [`MapConfig::validate`](crate::MapConfig::validate)); no partially built map is handed out.
/// [`Error::CapacityOverflow`] is returned by the `try_` mutators when a rehash would need a
/// table larger than [`MAXIMUM_CAPACITY`](crate::MAXIMUM_CAPACITY), in which case the map is left
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The load factor lies outside the open interval `(0, 1)`.
    #[error("load factor must lie in (0, 1), got {0}")]
    InvalidLoadFactor(f64),

    /// The requested initial capacity cannot be represented.
    #[error("initial capacity {requested} exceeds the maximum of {max} slots")]
    InvalidCapacity {
        /// The capacity the caller asked for.
        requested: usize,
        /// The largest supported table length.
        max: usize,
    },

    /// Growing the table would exceed the addressable slot range.
    #[error("capacity overflow: {required} slots needed, at most {max} supported")]
    CapacityOverflow {
        /// The table length growth would have needed.
        required: usize,
        /// The largest supported table length.
        max: usize,
    },
}

impl Error {
    /// Returns `true` for errors caused by invalid construction parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidLoadFactor(_) | Error::InvalidCapacity { .. }
        )
    }
}

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
