//! Time source of the bridge: pacing between frames and the clock used to age
//! fast packet slots.
use embassy_time::Instant;

/// Injected clock. Keeping it behind a trait lets tests drive time explicitly.
pub trait BridgeTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;

    /// Current instant.
    fn now(&self) -> Instant;
}
