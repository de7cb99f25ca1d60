//! `korri-bridge` library: the translation core of an NMEA 2000 ⇄ NMEA 0183
//! gateway in a `no_std` + `alloc` environment. The crate exposes the
//! infrastructure modules (bit packing, sentinel handling, descriptor-driven
//! codec), the transport layer (CAN identifiers, fast packets), the PGN and AIS
//! translators, and the bridge pipeline tying them together.
#![no_std]

extern crate alloc;

//==================================================================================
/// Descriptor and value types shared by the codec engine and the PGN tables.
pub mod core;
/// Error definitions for header construction, bit access, codecs, sentences,
/// AIS and the bridge service.
pub mod error;
/// Low-level infrastructure: bit readers/writers and the descriptor engine.
pub mod infra;
/// Protocol implementation: CAN transport, fast packets, PGN messages,
/// NMEA 0183 sentences, AIS and the bridge pipeline.
pub mod protocol;
//==================================================================================
