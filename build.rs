//! Cargo build script: generates the PGN catalog (names, priorities, fast-packet table).

mod build_core;
use crate::build_core::{conf::*, domain::Manifest, errors::BuildError, gen_catalog::run_catalog_gen};

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// The catalog is a declarative JSON list of PGNs. The runtime needs three facts about
// each of them: a display name, the default priority used when transmitting, and
// whether the PGN travels as a fast packet. The script validates the manifest and
// emits sorted static tables that `src/protocol/catalog.rs` pulls in with `include!`.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={PGN_MANIFEST_PATH}");
    println!("cargo:rerun-if-env-changed={MANIFEST_ENV_VAR}");

    // 1. Resolve the manifest.
    // Priority order:
    //   1. KORRI_BRIDGE_MANIFEST_PATH environment variable
    //   2. Default manifest shipped with the crate
    let default_manifest_path =
        PathBuf::from_str(PGN_MANIFEST_PATH).map_err(|_| BuildError::ReadPath {
            path: PGN_MANIFEST_PATH,
        })?;

    let manifest_path = match std::env::var(MANIFEST_ENV_VAR).ok().map(PathBuf::from) {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom pgn_manifest.json from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom manifest path specified but file not found: {:?}",
                path
            );
            default_manifest_path
        }
        None => default_manifest_path,
    };

    let manifest_string = fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
        path: manifest_path.clone(),
        source: e,
    })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;

    // 2. Validate and render.
    let catalog_code = run_catalog_gen(manifest)?;

    // 3. Write into OUT_DIR.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let catalog_path = PathBuf::from(out_dir_str).join(OUT_DIR_CATALOG_FILE_NAME);

    fs::write(&catalog_path, catalog_code).map_err(|e| BuildError::WriteFile {
        path: catalog_path,
        source: e,
    })?;

    Ok(())
}
