//! Infrastructure shared by every protocol layer.
pub mod codec;
