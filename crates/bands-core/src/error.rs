//! Error taxonomy for engine mutators.

use thiserror::Error;

/// Usage-order errors from ownship/traffic mutation.
///
/// The offending call is rejected as a no-op and the engine stays in
/// its prior state; nothing here unwinds past the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    #[error("ownship must be set before traffic is added")]
    OwnshipNotSet,

    #[error("inconsistent use of geodetic and Euclidean data")]
    FrameMismatch,

    #[error("intruder at {distance_m:.0} m exceeds the projection's valid range of {max_range_m:.0} m")]
    BeyondProjectionRange { distance_m: f64, max_range_m: f64 },
}
