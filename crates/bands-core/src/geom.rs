//! Geometry value types shared by the engine, adapter and projection.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Three-component Euclidean vector: meters for positions,
/// meters-per-second for velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vect3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vect3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(&self, other: &Vect3) -> Vect3 {
        Vect3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Geodetic position: latitude/longitude in decimal degrees, altitude
/// in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonAlt {
    pub lat: f64,
    pub lon: f64,
    pub alt_m: f64,
}

impl LatLonAlt {
    pub fn new(lat: f64, lon: f64, alt_m: f64) -> Self {
        Self { lat, lon, alt_m }
    }
}

/// Position in one of the two supported coordinate conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Geodetic(LatLonAlt),
    Euclidean(Vect3),
}

impl Position {
    pub fn is_geodetic(&self) -> bool {
        matches!(self, Position::Geodetic(_))
    }
}

/// Velocity stored as Euclidean components. Track angle is measured
/// from north, clockwise: `vx` is the east component and `vy` north.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl Velocity {
    pub fn mk_vxyz(vx: f64, vy: f64, vz: f64) -> Self {
        Self { vx, vy, vz }
    }

    /// Build from track angle (radians, from north clockwise), ground
    /// speed and vertical speed.
    pub fn mk_trk_gs_vs(trk: f64, gs: f64, vs: f64) -> Self {
        Self {
            vx: gs * trk.sin(),
            vy: gs * trk.cos(),
            vz: vs,
        }
    }

    /// Track angle in (-π, π]. Zero for a velocity with no horizontal
    /// component.
    pub fn trk(&self) -> f64 {
        self.vx.atan2(self.vy)
    }

    /// Track angle mapped to [0, 2π).
    pub fn compass_angle(&self) -> f64 {
        to_2pi(self.trk())
    }

    pub fn gs(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn vs(&self) -> f64 {
        self.vz
    }
}

/// Map an angle to [0, 2π).
pub fn to_2pi(rad: f64) -> f64 {
    let r = rad.rem_euclid(2.0 * PI);
    if r == 2.0 * PI {
        0.0
    } else {
        r
    }
}

/// Map an angle to (-π, π].
pub fn to_pi(rad: f64) -> f64 {
    let r = to_2pi(rad);
    if r > PI {
        r - 2.0 * PI
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_gs_vs_round_trip() {
        let v = Velocity::mk_trk_gs_vs(1.2, 100.0, -3.0);
        assert!((v.trk() - 1.2).abs() < 1e-12);
        assert!((v.gs() - 100.0).abs() < 1e-9);
        assert_eq!(v.vs(), -3.0);
    }

    #[test]
    fn compass_angle_wraps_westerly_tracks() {
        // due west is -π/2 signed, 3π/2 on the compass
        let v = Velocity::mk_vxyz(-10.0, 0.0, 0.0);
        assert!((v.trk() + PI / 2.0).abs() < 1e-12);
        assert!((v.compass_angle() - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn to_2pi_maps_into_range() {
        assert!((to_2pi(-0.1) - (2.0 * PI - 0.1)).abs() < 1e-12);
        assert_eq!(to_2pi(0.0), 0.0);
        assert!((to_2pi(7.0) - (7.0 - 2.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn to_pi_maps_into_signed_range() {
        assert!((to_pi(6.0) - (6.0 - 2.0 * PI)).abs() < 1e-12);
        assert!((to_pi(3.0) - 3.0).abs() < 1e-12);
        assert_eq!(to_pi(PI), PI);
    }
}
