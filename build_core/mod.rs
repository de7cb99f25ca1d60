//! Workspace for the build script: manifest model and catalog generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_catalog;
