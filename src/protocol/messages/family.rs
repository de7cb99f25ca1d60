//! Groups of PGNs that can be switched on or off as a whole.

/// Functional family of a PGN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PgnFamily {
    /// ISO requests, address claims, heartbeats, product information.
    Network = 0,
    Time = 1,
    /// Heading, rate of turn, rudder, magnetic variation.
    Heading = 2,
    Speed = 3,
    Depth = 4,
    /// Position, COG/SOG, GNSS fixes.
    Position = 5,
    Navigation = 6,
    /// Wind and temperatures.
    Environment = 7,
    Ais = 8,
}

impl PgnFamily {
    pub const ALL: [PgnFamily; 9] = [
        PgnFamily::Network,
        PgnFamily::Time,
        PgnFamily::Heading,
        PgnFamily::Speed,
        PgnFamily::Depth,
        PgnFamily::Position,
        PgnFamily::Navigation,
        PgnFamily::Environment,
        PgnFamily::Ais,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of enabled families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FamilyMask(u16);

impl FamilyMask {
    pub const NONE: FamilyMask = FamilyMask(0);
    pub const ALL: FamilyMask = FamilyMask(0x01FF);

    pub const fn from_bits(bits: u16) -> Self {
        FamilyMask(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, family: PgnFamily) -> bool {
        self.0 & family.bit() != 0
    }

    pub const fn with(self, family: PgnFamily) -> Self {
        FamilyMask(self.0 | family.bit())
    }

    pub const fn without(self, family: PgnFamily) -> Self {
        FamilyMask(self.0 & !family.bit())
    }
}

impl Default for FamilyMask {
    fn default() -> Self {
        FamilyMask::ALL
    }
}

impl FromIterator<PgnFamily> for FamilyMask {
    fn from_iter<I: IntoIterator<Item = PgnFamily>>(iter: I) -> Self {
        iter.into_iter().fold(FamilyMask::NONE, FamilyMask::with)
    }
}
