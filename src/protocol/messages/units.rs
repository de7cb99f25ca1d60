//! Unit conversions between NMEA 2000 (SI) and NMEA 0183 (degrees, knots, Celsius).
use core::f64::consts::PI;

pub const RAD_TO_DEG: f64 = 180.0 / PI;
pub const DEG_TO_RAD: f64 = PI / 180.0;
/// Metres in one nautical mile.
pub const NAUTICAL_MILE: f64 = 1852.0;
pub const MS_TO_KNOTS: f64 = 3600.0 / NAUTICAL_MILE;
pub const KNOTS_TO_KMH: f64 = NAUTICAL_MILE / 1000.0;
pub const MS_TO_KMH: f64 = 3.6;
pub const METERS_TO_FEET: f64 = 1.0 / 0.3048;
pub const METERS_TO_FATHOMS: f64 = 1.0 / 1.8288;
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn degrees(radians: f64) -> f64 {
    radians * RAD_TO_DEG
}

pub fn radians(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

pub fn knots(ms: f64) -> f64 {
    ms * MS_TO_KNOTS
}

pub fn from_knots(knots: f64) -> f64 {
    knots / MS_TO_KNOTS
}

pub fn celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Angle in `[0, 2π)`. Constant time whatever the magnitude.
pub fn wrap_radians(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let turn = 2.0 * PI;
    let reduced = angle % turn;
    let wrapped = if reduced < 0.0 { reduced + turn } else { reduced };
    // A tiny negative remainder rounds up to a full turn.
    if wrapped >= turn {
        0.0
    } else {
        wrapped
    }
}

/// Angle in degrees, `[0, 360)`.
pub fn heading_degrees(radians: f64) -> f64 {
    degrees(wrap_radians(radians))
}

pub fn abs(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Square root by Newton iteration, for targets without `std`.
pub fn sqrt(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return if value == 0.0 { 0.0 } else { f64::NAN };
    }
    let mut x = if value > 1.0 { value } else { 1.0 };
    for _ in 0..64 {
        let next = 0.5 * (x + value / x);
        if next == x {
            break;
        }
        x = next;
    }
    x
}
