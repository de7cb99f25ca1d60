//! Day counts and times of day as carried by PGN `Date`/`Time` fields,
//! converted to calendar values.
use chrono::{Datelike, Days, NaiveDate};

use super::engine::round_half_away;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

fn epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)
}

/// Calendar date of a day count since 1970-01-01.
pub fn date_from_days(days: u64) -> Option<NaiveDate> {
    epoch()?.checked_add_days(Days::new(days))
}

/// Day count since 1970-01-01. Dates before the epoch have no representation.
pub fn days_from_date(date: NaiveDate) -> Option<u64> {
    let days = date.signed_duration_since(epoch()?).num_days();
    u64::try_from(days).ok()
}

/// Builds a date from NMEA 0183 day, month and year fields. Two-digit years
/// below 70 belong to the 2000s.
pub fn date_from_parts(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    let year = match year {
        0..=69 => 2000 + year,
        70..=99 => 1900 + year,
        _ => year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `(day, month, year)` of a date.
pub fn date_parts(date: NaiveDate) -> (u32, u32, i32) {
    (date.day(), date.month(), date.year())
}

/// Splits seconds since midnight into hours, minutes and hundredths of a
/// second, rounded to the nearest hundredth and wrapped on 24 h.
pub fn time_parts(seconds: f64) -> Option<(u32, u32, u32)> {
    let centis = round_half_away(seconds * 100.0)?;
    let centis = centis.rem_euclid(8_640_000) as u32;
    Some((centis / 360_000, (centis / 6_000) % 60, centis % 6_000))
}

/// Seconds since midnight from hours, minutes and seconds.
pub fn seconds_of_day(hours: u32, minutes: u32, seconds: f64) -> Option<f64> {
    if hours > 23 || minutes > 59 || !(0.0..61.0).contains(&seconds) {
        return None;
    }
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}
