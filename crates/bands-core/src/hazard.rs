//! Seam to the single-horizon hazard-detection collaborators.

use crate::geom::{Vect3, Velocity};
use crate::interval::IntervalSet;

/// One lookahead horizon's hazard classification, per axis.
///
/// An implementation owns the geometry that decides which interval of
/// each axis is unsafe within its horizon; this crate only consumes the
/// resulting sets. The band accessors take `&mut self` so that an
/// implementation may compute lazily and cache; the engine serializes
/// all access, so no further synchronization is required.
pub trait HazardProvider {
    /// Lookahead time in seconds.
    fn set_time(&mut self, t: f64);
    fn get_time(&self) -> f64;

    /// Restrict the horizon to `[start, end]` instead of `[0, t]`.
    fn set_time_range(&mut self, start: f64, end: f64);
    fn get_start_time(&self) -> f64;

    /// Hazard-disk diameter in meters.
    fn set_diameter(&mut self, d: f64);
    fn get_diameter(&self) -> f64;

    /// Hazard-disk height in meters.
    fn set_height(&mut self, h: f64);
    fn get_height(&self) -> f64;

    fn set_max_ground_speed(&mut self, gs: f64);
    fn get_max_ground_speed(&self) -> f64;

    fn set_max_vertical_speed(&mut self, vs: f64);
    fn get_max_vertical_speed(&self) -> f64;

    fn set_track_tolerance(&mut self, trk: f64);
    fn get_track_tolerance(&self) -> f64;

    fn set_ground_speed_tolerance(&mut self, gs: f64);
    fn get_ground_speed_tolerance(&self) -> f64;

    fn set_vertical_speed_tolerance(&mut self, vs: f64);
    fn get_vertical_speed_tolerance(&self) -> f64;

    /// Add one intruder: relative position (ownship minus intruder) and
    /// both velocities, already in the native frame.
    fn add_traffic(&mut self, rel: Vect3, vo: Velocity, vi: Velocity);

    /// Drop accumulated traffic and any cached bands.
    fn clear(&mut self);

    /// Drop per-computation scratch state, keeping traffic.
    fn clear_breaks(&mut self);

    fn track_bands(&mut self) -> &IntervalSet;
    fn ground_speed_bands(&mut self) -> &IntervalSet;
    fn vertical_speed_bands(&mut self) -> &IntervalSet;
}
