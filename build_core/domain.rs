use crate::build_core::conf::DEFAULT_PRIORITY;
use serde::Deserialize;

//==================================================================================MANIFEST
// Structures to deserialize `pgn_manifest.json`.
#[derive(Debug, Deserialize)]
/// Manifest describing the PGN catalog.
pub(crate) struct Manifest {
    pub(crate) pgns: Vec<Pgn>,
}

#[derive(Debug, Deserialize)]
/// Entry of the catalog.
pub(crate) struct Pgn {
    pub(crate) id: u32,
    pub(crate) name: String,
    #[serde(default = "default_priority")]
    pub(crate) priority: u8,
    #[serde(default)]
    pub(crate) fast_packet: bool,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}
