//! High-level components of the gateway: CAN/Fast Packet transport, PGN
//! records, NMEA 0183 sentences, AIS transcoding and the bridge pipeline.
pub mod ais;
pub mod bridge;
pub mod catalog;
pub mod messages;
pub mod nmea0183;
pub mod transport;
