//! Binary codec building blocks: bit-level access, "not available" sentinels,
//! calendar conversions, the descriptor-driven engine and the traits
//! implemented by typed PGNs.
pub mod bits;
pub mod calendar;
pub mod engine;
pub mod sentinel;
pub mod traits;
