//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest listing every PGN known to the catalog.
pub(crate) const PGN_MANIFEST_PATH: &str = "build_core/var/pgn_manifest.json";
/// Environment variable overriding the manifest location.
pub(crate) const MANIFEST_ENV_VAR: &str = "KORRI_BRIDGE_MANIFEST_PATH";
/// Generated catalog file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_CATALOG_FILE_NAME: &str = "pgn_catalog.rs";
/// Largest PGN representable in a 29-bit identifier.
pub(crate) const MAX_PGN: u32 = 0x1_FFFF;
/// Priority used when the manifest does not provide one.
pub(crate) const DEFAULT_PRIORITY: u8 = 6;
