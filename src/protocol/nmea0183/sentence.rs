//! Outbound sentence builder.
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use chrono::NaiveDate;

use super::checksum;
use crate::infra::codec::calendar::{date_parts, time_parts};
use crate::infra::codec::engine::round_half_away;

/// One sentence under construction: `$TTFFF,f1,f2,…*HH`.
///
/// Fields are appended in order; absent values become empty fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    delimiter: char,
    address: String,
    fields: Vec<String>,
}

impl Sentence {
    /// Parametric sentence (`$`).
    pub fn new(talker: &str, formatter: &str) -> Self {
        Self {
            delimiter: '$',
            address: format!("{talker}{formatter}"),
            fields: Vec::new(),
        }
    }

    /// Encapsulated sentence (`!`), used by AIS.
    pub fn encapsulated(talker: &str, formatter: &str) -> Self {
        Self {
            delimiter: '!',
            ..Self::new(talker, formatter)
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Append a raw field.
    pub fn text(mut self, value: &str) -> Self {
        self.fields.push(String::from(value));
        self
    }

    /// Append an empty field.
    pub fn empty(self) -> Self {
        self.text("")
    }

    /// Append a field, empty when absent.
    pub fn opt_text(self, value: Option<&str>) -> Self {
        self.text(value.unwrap_or(""))
    }

    pub fn int<T: fmt::Display>(mut self, value: Option<T>) -> Self {
        self.fields.push(value.map(|v| v.to_string()).unwrap_or_default());
        self
    }

    /// Append an integer left-padded with zeros.
    pub fn padded(mut self, value: Option<u32>, width: usize) -> Self {
        self.fields.push(
            value
                .map(|v| format!("{:0width$}", v, width = width))
                .unwrap_or_default(),
        );
        self
    }

    /// Append a decimal with a fixed number of decimals.
    pub fn float(mut self, value: Option<f64>, decimals: usize) -> Self {
        let field = match value {
            Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
            _ => String::new(),
        };
        self.fields.push(field);
        self
    }

    /// Append a single character, typically a unit or status flag.
    pub fn flag(mut self, value: char) -> Self {
        self.fields.push(value.to_string());
        self
    }

    /// Append `ddmm.mmmm,N|S` (two fields).
    pub fn latitude(self, degrees: Option<f64>) -> Self {
        self.angle(degrees, 2, ('N', 'S'))
    }

    /// Append `dddmm.mmmm,E|W` (two fields).
    pub fn longitude(self, degrees: Option<f64>) -> Self {
        self.angle(degrees, 3, ('E', 'W'))
    }

    fn angle(mut self, degrees: Option<f64>, width: usize, hemispheres: (char, char)) -> Self {
        // Ten-thousandths of a minute, rounded once so minutes never reach 60.
        let raw = degrees.and_then(|d| round_half_away(d * 600_000.0));
        match raw {
            Some(raw) => {
                let hemisphere = if raw < 0 { hemispheres.1 } else { hemispheres.0 };
                let raw = raw.unsigned_abs();
                let whole = raw / 600_000;
                let minutes = raw % 600_000;
                self.fields.push(format!(
                    "{:0width$}{:02}.{:04}",
                    whole,
                    minutes / 10_000,
                    minutes % 10_000,
                    width = width
                ));
                self.fields.push(hemisphere.to_string());
            }
            None => {
                self.fields.push(String::new());
                self.fields.push(String::new());
            }
        }
        self
    }

    /// Append UTC time `hhmmss.ss` from seconds since midnight.
    pub fn time(mut self, seconds: Option<f64>) -> Self {
        let field = seconds
            .and_then(time_parts)
            .map(|(h, m, centis)| format!("{:02}{:02}{:02}.{:02}", h, m, centis / 100, centis % 100))
            .unwrap_or_default();
        self.fields.push(field);
        self
    }

    /// Append a date as `ddmmyy`.
    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        let field = date
            .map(date_parts)
            .map(|(d, m, y)| format!("{:02}{:02}{:02}", d, m, y.rem_euclid(100)))
            .unwrap_or_default();
        self.fields.push(field);
        self
    }

    /// Text between the delimiter and the `*`.
    pub fn body(&self) -> String {
        let mut body = self.address.clone();
        for field in &self.fields {
            body.push(',');
            body.push_str(field);
        }
        body
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body();
        write!(f, "{}{}*{:02X}", self.delimiter, body, checksum(&body))
    }
}
