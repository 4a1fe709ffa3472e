//! Host-side scenario test harness for scripted device flows.
//!
//! Couples the `App`, a mock filesystem, scripted input and BLE
//! transports, and a recording renderer under a manual clock, so
//! integration tests can drive whole button-press flows tick by tick
//! without hardware.

use inkslate_core::ble::{BleTransport, DeviceInfo};
use inkslate_core::input::{AnalogChannel, Button, InputSource};
use inkslate_core::render::{Renderer, ScreenView, SleepReason};
use inkslate_core::session::Screen;
use inkslate_core::{App, MockFileSystem, SleepRequest};

/// Loop period used on the device.
pub const TICK_MS: u64 = 20;

/// Scriptable input source: per-button digital levels plus raw analog
/// ladder readings, set by the test and held until changed.
#[derive(Debug)]
pub struct ScriptedInput {
    levels: Vec<(Button, bool)>,
    primary_mv: u16,
    secondary_mv: u16,
    power: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            primary_mv: 4095,
            secondary_mv: 4095,
            power: false,
        }
    }

    pub fn set_level(&mut self, button: Button, pressed: bool) {
        if let Some(slot) = self.levels.iter_mut().find(|(b, _)| *b == button) {
            slot.1 = pressed;
        } else {
            self.levels.push((button, pressed));
        }
    }

    pub fn set_analog(&mut self, channel: AnalogChannel, millivolts: u16) {
        match channel {
            AnalogChannel::Primary => self.primary_mv = millivolts,
            AnalogChannel::Secondary => self.secondary_mv = millivolts,
        }
    }

    pub fn set_power(&mut self, pressed: bool) {
        self.power = pressed;
    }

    /// Drive both sampling paths at once so a press lands no matter
    /// which strategy the current screen selects.
    pub fn hold(&mut self, button: Button) {
        self.set_level(button, true);
        let (channel, mv) = analog_band(button);
        self.set_analog(channel, mv);
    }

    pub fn release_all(&mut self) {
        self.levels.clear();
        self.primary_mv = 4095;
        self.secondary_mv = 4095;
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

/// A millivolt reading inside the band that decodes to `button`.
fn analog_band(button: Button) -> (AnalogChannel, u16) {
    match button {
        Button::Back => (AnalogChannel::Primary, 3000),
        Button::Confirm => (AnalogChannel::Primary, 2000),
        Button::Left => (AnalogChannel::Primary, 1000),
        Button::Right => (AnalogChannel::Primary, 100),
        Button::Up => (AnalogChannel::Secondary, 1000),
        Button::Down => (AnalogChannel::Secondary, 100),
        Button::Power => (AnalogChannel::Primary, 4095),
    }
}

impl InputSource for ScriptedInput {
    fn button_level(&mut self, button: Button) -> bool {
        self.levels
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, level)| *level)
            .unwrap_or(false)
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Primary => self.primary_mv,
            AnalogChannel::Secondary => self.secondary_mv,
        }
    }

    fn power_pressed(&mut self) -> bool {
        self.power
    }
}

/// Scriptable BLE transport that counts lifecycle calls for ordering
/// and idempotence assertions.
#[derive(Debug, Default)]
pub struct ScriptedBle {
    pub devices: Vec<DeviceInfo>,
    pub scanning: bool,
    pub scan_starts: usize,
    pub scan_stops: usize,
    pub cancels: usize,
    pub service_calls: usize,
    pub connected_to: Option<String>,
    pub passkey: Option<u32>,
    pub auto_reconnect: bool,
}

impl ScriptedBle {
    pub fn new() -> Self {
        Self {
            auto_reconnect: true,
            ..Self::default()
        }
    }

    pub fn add_device(&mut self, address: &str, name: &str) {
        self.devices.push(DeviceInfo {
            address: address.to_string(),
            name: name.to_string(),
        });
    }
}

impl BleTransport for ScriptedBle {
    fn service(&mut self) {
        self.service_calls += 1;
    }

    fn start_scan(&mut self) {
        self.scan_starts += 1;
        self.scanning = true;
    }

    fn stop_scan(&mut self) {
        self.scan_stops += 1;
        self.scanning = false;
    }

    fn is_scanning(&self) -> bool {
        self.scanning
    }

    fn cancel_pending_connection(&mut self) {
        self.cancels += 1;
    }

    fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    fn connect(&mut self, address: &str) {
        self.connected_to = Some(address.to_string());
    }

    fn is_connected(&self) -> bool {
        self.connected_to.is_some()
    }

    fn pending_passkey(&self) -> Option<u32> {
        self.passkey
    }

    fn set_auto_reconnect(&mut self, enabled: bool) {
        self.auto_reconnect = enabled;
    }

    fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }
}

/// What one draw call showed, captured for assertions.
#[derive(Debug, Clone)]
pub struct Frame {
    pub screen: Screen,
    pub passkey: Option<u32>,
    pub note_titles: Vec<String>,
    pub note_selection: usize,
    pub menu_selection: usize,
    pub editor_title: String,
}

/// Renderer that records every frame instead of drawing pixels.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
    pub sleep_notices: Vec<SleepReason>,
}

impl RecordingRenderer {
    pub fn draw_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("no frame drawn yet")
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, view: &ScreenView<'_>) {
        self.frames.push(Frame {
            screen: view.screen,
            passkey: view.passkey,
            note_titles: view.notes.iter().map(|n| n.title.clone()).collect(),
            note_selection: view.note_selection,
            menu_selection: view.menu_selection,
            editor_title: view.editor_title.to_string(),
        });
    }

    fn draw_sleep_notice(&mut self, reason: SleepReason) {
        self.sleep_notices.push(reason);
    }
}

/// Full scripted device under a manual clock.
pub struct DeviceHarness {
    pub fs: MockFileSystem,
    pub input: ScriptedInput,
    pub ble: ScriptedBle,
    pub renderer: RecordingRenderer,
    app: App,
    now_ms: u64,
}

impl DeviceHarness {
    pub fn new() -> Self {
        Self::with_notes(&[])
    }

    /// Boot with the given note files already on the card.
    pub fn with_notes(notes: &[(&str, &str)]) -> Self {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        for (name, content) in notes {
            fs.add_file(&format!("/notes/{}", name), content);
        }
        let app = App::new(&mut fs, 0);
        Self {
            fs,
            input: ScriptedInput::new(),
            ble: ScriptedBle::new(),
            renderer: RecordingRenderer::default(),
            app,
            now_ms: 0,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn screen(&self) -> Screen {
        self.app.session().screen()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advance one loop period and run one tick.
    pub fn tick(&mut self) -> Option<SleepRequest> {
        self.now_ms += TICK_MS;
        self.app.tick(
            self.now_ms,
            &mut self.fs,
            &mut self.input,
            &mut self.ble,
            &mut self.renderer,
        )
    }

    /// Tick until at least `ms` of clock time has passed. Panics if the
    /// device goes to sleep along the way; use `tick` directly for
    /// sleep-path tests.
    pub fn run_for_ms(&mut self, ms: u64) {
        let deadline = self.now_ms + ms;
        while self.now_ms < deadline {
            if let Some(request) = self.tick() {
                panic!("unexpected sleep at {} ms: {:?}", self.now_ms, request);
            }
        }
    }

    /// Press and release one button, ticking through both edges.
    pub fn press(&mut self, button: Button) {
        self.input.hold(button);
        assert!(self.tick().is_none());
        self.input.release_all();
        assert!(self.tick().is_none());
    }

    /// Hold the power button for `ms`, then release. Returns the sleep
    /// request if the hold crossed the long-press threshold.
    pub fn hold_power_for_ms(&mut self, ms: u64) -> Option<SleepRequest> {
        self.input.set_power(true);
        let deadline = self.now_ms + ms;
        while self.now_ms < deadline {
            if let Some(request) = self.tick() {
                self.input.set_power(false);
                return Some(request);
            }
        }
        self.input.set_power(false);
        self.tick()
    }
}

impl Default for DeviceHarness {
    fn default() -> Self {
        Self::new()
    }
}
