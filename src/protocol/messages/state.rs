//! Values remembered across PGNs and sentences.
//!
//! Some sentences combine data that NMEA 2000 spreads over several PGNs (RMC
//! needs position, COG/SOG, date and variation). The latest value of each is
//! kept here and joined when such a sentence is produced.
use chrono::NaiveDate;

/// Persisted navigation state. Angles in radians, speeds in m/s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeState {
    /// Course over ground, true.
    pub cog: Option<f64>,
    /// Speed over ground.
    pub sog: Option<f64>,
    /// Magnetic variation, east positive.
    pub variation: Option<f64>,
    pub heading_true: Option<f64>,
    pub heading_magnetic: Option<f64>,
    /// Last UTC date seen.
    pub date: Option<NaiveDate>,
    /// Rolling sequential message id of outbound multi-sentence AIS, 0 to 9.
    pub(crate) ais_sequence: u8,
}

impl BridgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a heading, deriving the other reference when the variation is known.
    pub fn record_heading(&mut self, heading: f64, magnetic: bool) {
        let variation = self.variation;
        if magnetic {
            self.heading_magnetic = Some(heading);
            self.heading_true = variation.map(|v| super::units::wrap_radians(heading + v));
        } else {
            self.heading_true = Some(heading);
            self.heading_magnetic = variation.map(|v| super::units::wrap_radians(heading - v));
        }
    }

    /// Next id for a multi-sentence AIS message.
    pub(crate) fn next_ais_sequence(&mut self) -> u8 {
        let id = self.ais_sequence;
        self.ais_sequence = (self.ais_sequence + 1) % 10;
        id
    }
}
