//! Local tangent-plane projection between the geodetic frame and the
//! Euclidean frame the hazard providers operate in.

use crate::geom::{LatLonAlt, Position, Vect3, Velocity};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Radius inside which the tangent-plane projection stays accurate
/// enough for band computation. Intruders farther out are rejected.
pub const PROJECTION_MAX_RANGE_M: f64 = 600_000.0;

/// ENU tangent-plane projection anchored at a geodetic reference point.
///
/// Horizontal velocities are rotated by the meridian-convergence angle
/// at their position, so a velocity at the anchor itself projects to
/// exactly itself.
#[derive(Debug, Clone, Copy)]
pub struct EuclideanProjection {
    ref_lat: f64,
    ref_lon: f64,
    ref_alt_m: f64,
}

impl EuclideanProjection {
    pub fn new(anchor: LatLonAlt) -> Self {
        Self {
            ref_lat: anchor.lat,
            ref_lon: anchor.lon,
            ref_alt_m: anchor.alt_m,
        }
    }

    /// Project a geodetic position into local ENU meters.
    pub fn project_lla(&self, p: LatLonAlt) -> Vect3 {
        Vect3::new(
            lon_to_meters(p.lon - self.ref_lon, self.ref_lat),
            lat_to_meters(p.lat - self.ref_lat, self.ref_lat),
            p.alt_m - self.ref_alt_m,
        )
    }

    /// Project either position convention; Euclidean positions are
    /// already native.
    pub fn project(&self, p: Position) -> Vect3 {
        match p {
            Position::Geodetic(lla) => self.project_lla(lla),
            Position::Euclidean(v) => v,
        }
    }

    /// Inverse of [`Self::project_lla`].
    pub fn inverse(&self, v: Vect3) -> LatLonAlt {
        LatLonAlt::new(
            self.ref_lat + meters_to_lat(v.y, self.ref_lat),
            self.ref_lon + meters_to_lon(v.x, self.ref_lat),
            v.z + self.ref_alt_m,
        )
    }

    /// Express a geodetic-frame velocity at `at` in the projected frame.
    pub fn project_velocity(&self, at: LatLonAlt, v: Velocity) -> Velocity {
        rotate_horizontal(v, self.convergence(at))
    }

    /// Recover the geodetic-frame velocity from a projected one at the
    /// projected position `at`.
    pub fn inverse_velocity(&self, at: Vect3, v: Velocity) -> Velocity {
        rotate_horizontal(v, -self.convergence(self.inverse(at)))
    }

    /// Meridian-convergence angle in radians at a geodetic position:
    /// how much a north-referenced track rotates when expressed on the
    /// tangent plane. Zero at the anchor meridian.
    fn convergence(&self, at: LatLonAlt) -> f64 {
        (at.lon - self.ref_lon).to_radians() * at.lat.to_radians().sin()
    }
}

fn rotate_horizontal(v: Velocity, angle: f64) -> Velocity {
    if angle == 0.0 {
        return v;
    }
    Velocity::mk_trk_gs_vs(v.trk() + angle, v.gs(), v.vs())
}

/// Great-circle distance between two geodetic points in meters
/// (haversine, inputs in decimal degrees).
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

fn lat_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lat(ref_lat_deg)
}

fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}

fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lat(ref_lat_deg).max(1e-9)
}

fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lon(ref_lat_deg).max(1e-9)
}
