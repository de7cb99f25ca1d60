//! Inbound sentence parser.
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::checksum;
use crate::error::SentenceError;
use crate::infra::codec::calendar::{date_from_parts, seconds_of_day};

/// Borrowed view over a validated sentence.
///
/// Field indices start at 0 for the first field after the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSentence<'a> {
    /// `$` or `!`.
    pub delimiter: char,
    /// Two-character talker id (`GP`, `AI`, …).
    pub talker: &'a str,
    /// Sentence formatter (`RMC`, `VDM`, …).
    pub formatter: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> ParsedSentence<'a> {
    /// Validate delimiter, address and checksum (when present).
    ///
    /// Trailing CR/LF and surrounding whitespace are ignored.
    pub fn parse(line: &'a str) -> Result<Self, SentenceError> {
        let line = line.trim();
        let delimiter = match line.chars().next() {
            Some(c @ ('$' | '!')) => c,
            _ => return Err(SentenceError::MissingDelimiter),
        };
        let rest = &line[1..];

        let body = match rest.rfind('*') {
            Some(star) => {
                let (body, tail) = (&rest[..star], &rest[star + 1..]);
                if tail.len() != 2 {
                    return Err(SentenceError::MalformedChecksum);
                }
                let found = u8::from_str_radix(tail, 16).map_err(|_| SentenceError::MalformedChecksum)?;
                let expected = checksum(body);
                if expected != found {
                    return Err(SentenceError::ChecksumMismatch { expected, found });
                }
                body
            }
            None => rest,
        };

        let mut parts = body.split(',');
        let address = parts.next().unwrap_or_default();
        if address.len() < 5 || !address.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(SentenceError::InvalidAddress);
        }

        Ok(Self {
            delimiter,
            talker: &address[..2],
            formatter: &address[2..],
            fields: parts.collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw field, `None` when missing or empty.
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied().filter(|f| !f.is_empty())
    }

    pub fn char(&self, index: usize) -> Option<char> {
        self.field(index).and_then(|f| f.chars().next())
    }

    pub fn f64(&self, index: usize) -> Option<f64> {
        self.field(index)?.parse().ok()
    }

    pub fn u32(&self, index: usize) -> Option<u32> {
        self.field(index)?.parse().ok()
    }

    /// Latitude in degrees from `ddmm.mmmm` at `index` and `N|S` at `index + 1`.
    pub fn latitude(&self, index: usize) -> Option<f64> {
        self.angle(index, 90.0, ('N', 'S'))
    }

    /// Longitude in degrees from `dddmm.mmmm` at `index` and `E|W` at `index + 1`.
    pub fn longitude(&self, index: usize) -> Option<f64> {
        self.angle(index, 180.0, ('E', 'W'))
    }

    fn angle(&self, index: usize, limit: f64, hemispheres: (char, char)) -> Option<f64> {
        let value = self.f64(index)?;
        if value < 0.0 {
            return None;
        }
        let whole = (value / 100.0) as u32 as f64;
        let degrees = whole + (value - whole * 100.0) / 60.0;
        if degrees > limit {
            return None;
        }
        match self.char(index + 1)? {
            c if c == hemispheres.0 => Some(degrees),
            c if c == hemispheres.1 => Some(-degrees),
            _ => None,
        }
    }

    /// UTC time `hhmmss[.ss]` as seconds since midnight.
    pub fn time(&self, index: usize) -> Option<f64> {
        let field = self.field(index)?;
        if field.len() < 6 || !field.is_ascii() {
            return None;
        }
        let hours = field[..2].parse().ok()?;
        let minutes = field[2..4].parse().ok()?;
        let seconds = field[4..].parse().ok()?;
        seconds_of_day(hours, minutes, seconds)
    }

    /// Date `ddmmyy` at `index`.
    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        let field = self.field(index)?;
        if field.len() != 6 || !field.is_ascii() {
            return None;
        }
        date_from_parts(
            field[..2].parse().ok()?,
            field[2..4].parse().ok()?,
            field[4..].parse().ok()?,
        )
    }
}
