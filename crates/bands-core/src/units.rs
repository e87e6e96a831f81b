//! Unit-symbol conversion applied at the query boundary.
//!
//! Internal units are SI: meters, seconds, radians and their
//! combinations. Conversion is a pure linear scale factor and is not
//! part of the band algebra. Symbols not in the table pass through with
//! factor 1.0, i.e. the value is taken as already internal.

use std::f64::consts::PI;

/// Scale factor from `unit` to internal units.
pub fn factor(unit: &str) -> f64 {
    match unit {
        "rad" => 1.0,
        "deg" => PI / 180.0,
        "m" => 1.0,
        "ft" => 0.3048,
        "km" => 1000.0,
        "nmi" | "NM" => 1852.0,
        "m/s" | "mps" => 1.0,
        "kn" | "knot" | "kts" => 1852.0 / 3600.0,
        "fpm" | "ft/min" => 0.3048 / 60.0,
        "fps" | "ft/s" => 0.3048,
        "km/h" | "kph" => 1000.0 / 3600.0,
        "s" | "sec" => 1.0,
        "min" => 60.0,
        "h" | "hr" => 3600.0,
        _ => 1.0,
    }
}

/// Convert a value expressed in `unit` into internal units.
pub fn from(unit: &str, value: f64) -> f64 {
    value * factor(unit)
}

/// Convert an internal-units value into `unit`.
pub fn to(unit: &str, value: f64) -> f64 {
    value / factor(unit)
}
