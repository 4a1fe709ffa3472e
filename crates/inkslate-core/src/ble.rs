//! Bluetooth transport boundary.
//!
//! The session only coordinates the scan lifecycle and pairing UI; the
//! radio stack itself lives behind this trait, on the firmware side or
//! scripted in tests.

use alloc::string::String;

/// A peer seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub address: String,
    pub name: String,
}

pub trait BleTransport {
    /// Per-tick service call. May do blocking-like work inside the
    /// stack; callers tolerate the latency rather than interrupt it.
    fn service(&mut self);

    /// Start scanning. Callers guard this with `is_scanning` on screen
    /// entry; implementations need not make it idempotent themselves.
    fn start_scan(&mut self);
    fn stop_scan(&mut self);
    fn is_scanning(&self) -> bool;

    /// Abort an in-flight connection attempt, if any.
    fn cancel_pending_connection(&mut self);

    /// Peers discovered by the current or most recent scan.
    fn devices(&self) -> &[DeviceInfo];
    fn connect(&mut self, address: &str);
    fn is_connected(&self) -> bool;

    /// Six-digit pairing passkey awaiting user comparison, if pending.
    /// Time-sensitive: its appearance bypasses the render rate limit.
    fn pending_passkey(&self) -> Option<u32>;

    fn set_auto_reconnect(&mut self, enabled: bool);
    fn auto_reconnect(&self) -> bool;
}
