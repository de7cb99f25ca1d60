//! Build-time PGN catalog: names, default priorities and the fast-packet table.
//!
//! The tables are generated by `build.rs` from `build_core/var/pgn_manifest.json`
//! and kept sorted by PGN so lookups are binary searches.

/// Static facts about a PGN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PgnInfo {
    pub pgn: u32,
    pub name: &'static str,
    /// Default transmit priority.
    pub priority: u8,
    /// Carried as a fast packet (multi-frame) message.
    pub fast_packet: bool,
}

include!(concat!(env!("OUT_DIR"), "/pgn_catalog.rs"));

/// Catalog entry for `pgn`, if known.
pub fn pgn_info(pgn: u32) -> Option<&'static PgnInfo> {
    PGN_CATALOG
        .binary_search_by_key(&pgn, |info| info.pgn)
        .ok()
        .map(|index| &PGN_CATALOG[index])
}

/// Membership test in the fast-packet table.
pub fn is_fast_message(pgn: u32) -> bool {
    FAST_PACKET_PGNS.binary_search(&pgn).is_ok()
}

/// Default priority for `pgn`; 6 for PGNs outside the catalog.
pub fn default_priority(pgn: u32) -> u8 {
    pgn_info(pgn).map_or(6, |info| info.priority)
}
