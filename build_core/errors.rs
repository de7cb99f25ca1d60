//! Errors raised while generating the catalog during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script.
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Manifest is not valid JSON or does not match the expected shape.
    #[error("[MESSAGE]:Invalid JSON format [ERROR]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid.
    #[error("[MESSAGE]:Failed to read path. [PATH]:{path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while rendering generated code.
    #[error("[MESSAGE]:Failed to render generated code [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// PGN does not fit in 17 bits.
    #[error("[MESSAGE]:PGN out of range [PGN]:{pgn}")]
    PgnOutOfRange { pgn: u32 },

    /// Priority does not fit in 3 bits.
    #[error("[MESSAGE]:Priority out of range [PGN]:{pgn} [PRIORITY]:{priority}")]
    PriorityOutOfRange { pgn: u32, priority: u8 },

    /// Same PGN listed twice.
    #[error("[MESSAGE]:Duplicate PGN in manifest [PGN]:{pgn}")]
    DuplicatePgn { pgn: u32 },
}
