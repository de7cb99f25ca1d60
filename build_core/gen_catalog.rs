//! Renders the PGN catalog into Rust source.
use std::fmt::Write;

use crate::build_core::{
    conf::MAX_PGN,
    domain::{Manifest, Pgn},
    errors::BuildError,
};

//==================================================================================GENERATOR
/// Validates the manifest and produces the content of `pgn_catalog.rs`.
pub(crate) fn run_catalog_gen(manifest: Manifest) -> Result<String, BuildError> {
    let mut pgns = manifest.pgns;
    pgns.sort_by_key(|p| p.id);
    validate(&pgns)?;

    let mut buffer = String::new();
    writeln!(buffer, "// Generated by build.rs from the PGN manifest. Do not edit.")?;
    writeln!(buffer)?;

    writeln!(buffer, "/// Every catalogued PGN, sorted by number.")?;
    writeln!(buffer, "pub static PGN_CATALOG: &[PgnInfo] = &[")?;
    for pgn in &pgns {
        writeln!(
            buffer,
            "    PgnInfo {{ pgn: {}, name: {:?}, priority: {}, fast_packet: {} }},",
            pgn.id, pgn.name, pgn.priority, pgn.fast_packet
        )?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;

    writeln!(buffer, "/// PGNs carried as fast packets, sorted for binary search.")?;
    writeln!(buffer, "pub static FAST_PACKET_PGNS: &[u32] = &[")?;
    for pgn in pgns.iter().filter(|p| p.fast_packet) {
        writeln!(buffer, "    {},", pgn.id)?;
    }
    writeln!(buffer, "];")?;

    Ok(buffer)
}

fn validate(sorted: &[Pgn]) -> Result<(), BuildError> {
    for pgn in sorted {
        if pgn.id > MAX_PGN {
            return Err(BuildError::PgnOutOfRange { pgn: pgn.id });
        }
        if pgn.priority > 7 {
            return Err(BuildError::PriorityOutOfRange {
                pgn: pgn.id,
                priority: pgn.priority,
            });
        }
    }
    for pair in sorted.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(BuildError::DuplicatePgn { pgn: pair[0].id });
        }
    }
    Ok(())
}
