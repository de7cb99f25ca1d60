//! Abstraction traits used by the transport layer (CAN bus, timer, frame sender).
pub mod bridge_timer;
pub mod can_bus;
pub mod frame_sender;
