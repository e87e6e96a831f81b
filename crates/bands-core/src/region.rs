//! Severity classification for conflict bands.

use serde::{Deserialize, Serialize};

/// Severity of a band, totally ordered `None < Mid < Near`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// No predicted conflict within either horizon
    #[default]
    None,
    /// Conflict predicted within the mid-term horizon
    Mid,
    /// Conflict predicted within the near-term horizon
    Near,
}
