//! Frame translation between the caller's geodetic/compass view and the
//! projected Euclidean frame the hazard providers operate in.
//!
//! Queries against a geodetic ownship embed the queried component in a
//! full velocity vector (the other two own components held fixed),
//! run it through the tangent-plane projection anchored at ownship, and
//! inverse-project results on the way back out. Euclidean ownship needs
//! no translation.

use crate::geom::{to_pi, Position, Velocity};
use crate::interval::Interval;
use crate::projection::EuclideanProjection;
use std::f64::consts::PI;

/// Translate a native-frame track interval back into compass angles.
pub fn track_interval_to_compass(
    own_pos: &Position,
    own_vel: &Velocity,
    native: Interval,
) -> Interval {
    let Position::Geodetic(lla) = own_pos else {
        return native;
    };
    let sp = EuclideanProjection::new(*lla);
    let own3 = sp.project_lla(*lla);
    let lo = Velocity::mk_trk_gs_vs(native.low, own_vel.gs(), own_vel.vs());
    let hi = Velocity::mk_trk_gs_vs(native.up, own_vel.gs(), own_vel.vs());
    let loval = sp.inverse_velocity(own3, lo).compass_angle();
    let upval = sp.inverse_velocity(own3, hi).compass_angle();
    apply_track_boundary_rules(native, loval, upval)
}

/// Boundary handling for inverse-projected track bounds.
///
/// A native bound sitting exactly on 0 or 2π keeps its native value so
/// the wrap point never drifts. If the inverse projection pushes one
/// bound of a non-wrapping interval across the wrap point, both bounds
/// are remapped into (-π, π]; this is the only case where a returned
/// bound leaves [0, 2π).
pub(crate) fn apply_track_boundary_rules(
    native: Interval,
    mut loval: f64,
    mut upval: f64,
) -> Interval {
    if native.low == 0.0 || native.low == 2.0 * PI {
        loval = native.low;
    }
    if native.up == 0.0 || native.up == 2.0 * PI {
        upval = native.up;
    }
    if native.low < native.up && upval < loval {
        loval = to_pi(loval);
        upval = to_pi(upval);
    }
    Interval::new(loval, upval)
}

/// Translate a native ground-speed interval back to the geodetic frame.
pub fn gs_interval_from_native(
    own_pos: &Position,
    own_vel: &Velocity,
    native: Interval,
) -> Interval {
    let Position::Geodetic(lla) = own_pos else {
        return native;
    };
    let sp = EuclideanProjection::new(*lla);
    let own3 = sp.project_lla(*lla);
    let lo = Velocity::mk_trk_gs_vs(own_vel.trk(), native.low, own_vel.vs());
    let hi = Velocity::mk_trk_gs_vs(own_vel.trk(), native.up, own_vel.vs());
    Interval::new(
        sp.inverse_velocity(own3, lo).gs(),
        sp.inverse_velocity(own3, hi).gs(),
    )
}

/// Convert a compass track angle into the native frame.
pub fn track_to_native(own_pos: &Position, own_vel: &Velocity, trk: f64) -> f64 {
    let Position::Geodetic(lla) = own_pos else {
        return trk;
    };
    let sp = EuclideanProjection::new(*lla);
    let v = Velocity::mk_trk_gs_vs(trk, own_vel.gs(), own_vel.vs());
    sp.project_velocity(*lla, v).compass_angle()
}

/// Convert a geodetic-frame ground speed into the native frame.
pub fn gs_to_native(own_pos: &Position, own_vel: &Velocity, gs: f64) -> f64 {
    let Position::Geodetic(lla) = own_pos else {
        return gs;
    };
    let sp = EuclideanProjection::new(*lla);
    let v = Velocity::mk_trk_gs_vs(own_vel.trk(), gs, own_vel.vs());
    sp.project_velocity(*lla, v).gs()
}
