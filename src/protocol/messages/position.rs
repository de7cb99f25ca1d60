//! Position and motion: GLL, VTG, GGA, RMC.
use alloc::vec;
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::heading::{east_west, signed_east_west, REFERENCE_MAGNETIC, REFERENCE_TRUE};
use super::registry::{DecodeContext, EncodeContext, Translate};
use super::units::{from_knots, heading_degrees, knots, radians, wrap_radians, KNOTS_TO_KMH};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::protocol::nmea0183::ParsedSentence;

/// GNSS type lookup: GPS.
pub const GNSS_TYPE_GPS: u8 = 0;
/// GNSS method lookup: no fix.
pub const GNSS_METHOD_NO_FIX: u8 = 0;

//==================================================================================129025
static PGN_129025_FIELDS: [F; 2] = [
    F::signed("Latitude", 32).scaled(1e-07),
    F::signed("Longitude", 32).scaled(1e-07),
];

pub static PGN_129025_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129025,
    name: "Position, Rapid Update",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_129025_FIELDS,
};

pgn_record!(
    Pgn129025 => &PGN_129025_DESCRIPTOR,
    {
        /// Degrees, north positive.
        latitude: f64 => "Latitude",
        /// Degrees, east positive.
        longitude: f64 => "Longitude",
    }
);

impl Translate for Pgn129025 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return;
        };
        let gll = ctx
            .sentence("GLL")
            .latitude(Some(latitude))
            .longitude(Some(longitude))
            .empty()
            .flag('A')
            .flag('A');
        ctx.emit(gll);
    }
}

/// `$--GLL,lat,N,lon,E,time,status,mode`
pub(crate) fn encode_gll(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let latitude = sentence.latitude(0).ok_or(EncodeError::MissingField { index: 0 })?;
    let longitude = sentence.longitude(2).ok_or(EncodeError::MissingField { index: 2 })?;
    Ok(vec![position_rapid(latitude, longitude)?])
}

fn position_rapid(latitude: f64, longitude: f64) -> Result<PgnMessage, EncodeError> {
    Ok(PgnMessage::from_record(&Pgn129025 {
        latitude: Some(latitude),
        longitude: Some(longitude),
    })?)
}

//==================================================================================129026
static PGN_129026_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::lookup("CogReference", 2),
    F::reserved(6),
    F::unsigned("Cog", 16).scaled(0.0001),
    F::unsigned("Sog", 16).scaled(0.01),
    F::reserved(16),
];

pub static PGN_129026_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129026,
    name: "COG & SOG, Rapid Update",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_129026_FIELDS,
};

pgn_record!(
    Pgn129026 => &PGN_129026_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        cog_reference: u8 => "CogReference",
        /// Radians.
        cog: f64 => "Cog",
        /// m/s.
        sog: f64 => "Sog",
    }
);

impl Translate for Pgn129026 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.cog.is_none() && self.sog.is_none() {
            return;
        }
        let variation = ctx.state.variation;
        let (cog_true, cog_magnetic) = match (self.cog, self.cog_reference) {
            (Some(cog), Some(REFERENCE_MAGNETIC)) => {
                (variation.map(|v| wrap_radians(cog + v)), Some(cog))
            }
            (Some(cog), _) => (Some(cog), variation.map(|v| wrap_radians(cog - v))),
            (None, _) => (None, None),
        };
        if cog_true.is_some() {
            ctx.state.cog = cog_true;
        }
        if self.sog.is_some() {
            ctx.state.sog = self.sog;
        }

        let sog_knots = self.sog.map(knots);
        let vtg = ctx
            .sentence("VTG")
            .float(cog_true.map(heading_degrees), 1)
            .flag('T')
            .float(cog_magnetic.map(heading_degrees), 1)
            .flag('M')
            .float(sog_knots, 2)
            .flag('N')
            .float(sog_knots.map(|kn| kn * KNOTS_TO_KMH), 2)
            .flag('K')
            .flag('A');
        ctx.emit(vtg);
    }
}

/// `$--VTG,cogT,T,cogM,M,knots,N,kmh,K,mode`
pub(crate) fn encode_vtg(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let (cog, reference) = match (sentence.f64(0), sentence.f64(2)) {
        (Some(cog), _) => (Some(wrap_radians(radians(cog))), REFERENCE_TRUE),
        (None, Some(cog)) => (Some(wrap_radians(radians(cog))), REFERENCE_MAGNETIC),
        (None, None) => (None, REFERENCE_TRUE),
    };
    let sog = match sentence.f64(4) {
        Some(speed_knots) => Some(from_knots(speed_knots)),
        None => sentence.f64(6).map(|kmh| from_knots(kmh / KNOTS_TO_KMH)),
    };
    if cog.is_none() && sog.is_none() {
        return Err(EncodeError::MissingField { index: 0 });
    }

    if reference == REFERENCE_TRUE && cog.is_some() {
        ctx.state.cog = cog;
    }
    if sog.is_some() {
        ctx.state.sog = sog;
    }
    Ok(vec![cog_sog_rapid(cog, reference, sog)?])
}

fn cog_sog_rapid(cog: Option<f64>, reference: u8, sog: Option<f64>) -> Result<PgnMessage, EncodeError> {
    Ok(PgnMessage::from_record(&Pgn129026 {
        cog_reference: Some(reference),
        cog,
        sog,
        ..Default::default()
    })?)
}

/// `$--RMC,time,status,lat,N,lon,E,sog,cog,date,var,E|W,mode`
///
/// Produces a position and a COG/SOG update and refreshes the persisted date
/// and variation.
pub(crate) fn encode_rmc(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let latitude = sentence.latitude(2).ok_or(EncodeError::MissingField { index: 2 })?;
    let longitude = sentence.longitude(4).ok_or(EncodeError::MissingField { index: 4 })?;
    let sog = sentence.f64(6).map(from_knots);
    let cog = sentence.f64(7).map(|c| wrap_radians(radians(c)));

    if let Some(date) = sentence.date(8) {
        ctx.state.date = Some(date);
    }
    if let Some(variation) = signed_east_west(sentence, 9) {
        ctx.state.variation = Some(variation);
    }
    if cog.is_some() {
        ctx.state.cog = cog;
    }
    if sog.is_some() {
        ctx.state.sog = sog;
    }

    Ok(vec![
        position_rapid(latitude, longitude)?,
        cog_sog_rapid(cog, REFERENCE_TRUE, sog)?,
    ])
}

//==================================================================================129029
static PGN_129029_FIELDS: [F; 15] = [
    F::unsigned("Sid", 8),
    F::date("Date"),
    F::time("Time"),
    F::signed("Latitude", 64).scaled(1e-16),
    F::signed("Longitude", 64).scaled(1e-16),
    F::signed("Altitude", 64).scaled(1e-06),
    F::lookup("GnssType", 4),
    F::lookup("Method", 4),
    F::lookup("Integrity", 2),
    F::reserved(6),
    F::unsigned("NumberOfSvs", 8),
    F::signed("Hdop", 16).scaled(0.01),
    F::signed("Pdop", 16).scaled(0.01),
    F::signed("GeoidalSeparation", 32).scaled(0.01),
    F::unsigned("ReferenceStations", 8),
];

pub static PGN_129029_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129029,
    name: "GNSS Position Data",
    priority: 3,
    fastpacket: true,
    length: Some(43),
    fields: &PGN_129029_FIELDS,
};

pgn_record!(
    /// GNSS fix. Reference station entries beyond the count are not carried.
    Pgn129029 => &PGN_129029_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        date: NaiveDate => "Date",
        /// Seconds since midnight UTC.
        time: f64 => "Time",
        latitude: f64 => "Latitude",
        longitude: f64 => "Longitude",
        /// Metres above the WGS84 ellipsoid.
        altitude: f64 => "Altitude",
        gnss_type: u8 => "GnssType",
        /// Fix method, same numbering as the GGA quality indicator.
        method: u8 => "Method",
        integrity: u8 => "Integrity",
        number_of_svs: u8 => "NumberOfSvs",
        hdop: f64 => "Hdop",
        pdop: f64 => "Pdop",
        /// Metres.
        geoidal_separation: f64 => "GeoidalSeparation",
        reference_stations: u8 => "ReferenceStations",
    }
);

impl Translate for Pgn129029 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.date.is_some() {
            ctx.state.date = self.date;
        }
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return;
        };

        let gga = ctx
            .sentence("GGA")
            .time(self.time)
            .latitude(Some(latitude))
            .longitude(Some(longitude))
            .int(self.method)
            .padded(self.number_of_svs.map(u32::from), 2)
            .float(self.hdop, 2)
            .float(self.altitude, 2)
            .flag('M')
            .float(self.geoidal_separation, 2)
            .flag('M')
            .empty()
            .empty();
        ctx.emit(gga);

        let fixed = self.method.is_some_and(|m| m != GNSS_METHOD_NO_FIX);
        let (variation, variation_dir) = east_west(ctx.state.variation);
        let variation_dir = variation.map(|_| variation_dir);
        let rmc = ctx
            .sentence("RMC")
            .time(self.time)
            .flag(if fixed { 'A' } else { 'V' })
            .latitude(Some(latitude))
            .longitude(Some(longitude))
            .float(ctx.state.sog.map(knots), 2)
            .float(ctx.state.cog.map(heading_degrees), 1)
            .date(self.date.or(ctx.state.date))
            .float(variation, 1)
            .int(variation_dir)
            .flag(if fixed { 'A' } else { 'N' });
        ctx.emit(rmc);
    }
}

/// `$--GGA,time,lat,N,lon,E,quality,svs,hdop,alt,M,geoid,M,age,station`
///
/// The date of the fix comes from the last date seen.
pub(crate) fn encode_gga(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let time = sentence.time(0).ok_or(EncodeError::MissingField { index: 0 })?;
    let latitude = sentence.latitude(1).ok_or(EncodeError::MissingField { index: 1 })?;
    let longitude = sentence.longitude(3).ok_or(EncodeError::MissingField { index: 3 })?;
    let quality = sentence.u32(5).ok_or(EncodeError::MissingField { index: 5 })?;

    let record = Pgn129029 {
        date: ctx.state.date,
        time: Some(time),
        latitude: Some(latitude),
        longitude: Some(longitude),
        altitude: sentence.f64(8),
        gnss_type: Some(GNSS_TYPE_GPS),
        method: u8::try_from(quality).ok(),
        integrity: Some(0),
        number_of_svs: sentence.u32(6).and_then(|n| u8::try_from(n).ok()),
        hdop: sentence.f64(7),
        geoidal_separation: sentence.f64(10),
        reference_stations: Some(0),
        ..Default::default()
    };
    Ok(vec![PgnMessage::from_record(&record)?])
}
