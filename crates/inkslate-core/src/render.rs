//! Renderer boundary.
//!
//! The core never draws pixels; it hands the renderer a borrowed
//! snapshot of everything visible and lets the display side decide how
//! to lay it out.

use crate::ble::DeviceInfo;
use crate::note_store::NoteEntry;
use crate::session::{Orientation, Screen};

/// Why the device is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepReason {
    PowerLongPress,
    IdleTimeout,
}

/// Read-only snapshot of session state for one draw call.
#[derive(Debug)]
pub struct ScreenView<'a> {
    pub screen: Screen,
    pub menu_selection: usize,
    pub notes: &'a [NoteEntry],
    pub note_selection: usize,
    pub editor_title: &'a str,
    pub editor_content: &'a str,
    pub editor_dirty: bool,
    pub rename_buffer: &'a str,
    pub settings_selection: usize,
    pub orientation: Orientation,
    pub auto_reconnect: bool,
    pub devices: &'a [DeviceInfo],
    pub device_selection: usize,
    pub passkey: Option<u32>,
    pub ble_connected: bool,
    pub storage_available: bool,
}

pub trait Renderer {
    fn draw(&mut self, view: &ScreenView<'_>);
    /// Drawn as the last frame before the firmware powers the panel down.
    fn draw_sleep_notice(&mut self, reason: SleepReason);
}
