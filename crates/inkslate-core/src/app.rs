//! Top-level application loop.
//!
//! One cooperative tick drives everything in a fixed order: sample
//! input, apply screen-change side effects from the previous tick's
//! transitions, service the radio, process key events, track activity,
//! render behind the rate limit, then check the idle timeout. The order
//! is load-bearing: edges derive from samples taken the same tick, and
//! activity tracking runs after key processing so it never consumes the
//! press it is measuring.

use crate::ble::BleTransport;
use crate::editor::EditorBuffer;
use crate::filesystem::FileSystem;
use crate::input::{ButtonReader, InputSource, PowerAction, SamplingStrategy};
use crate::note_store::NoteStore;
use crate::render::{Renderer, ScreenView, SleepReason};
use crate::session::{key_for, Screen, Session};

/// No input for this long puts the device to sleep
pub const IDLE_TIMEOUT_MS: u64 = 600_000;
/// Floor between full redraws; uncapped refresh starves the input loop
const MIN_REFRESH_INTERVAL_MS: u64 = 250;
/// Scan results are redrawn this often while the Bluetooth screen scans
const SCAN_REFRESH_PERIOD_MS: u64 = 3000;

/// Handed to the firmware when the core decides to go down. The
/// firmware powers off the panel and suspends the processor; the core
/// has already saved and drawn the sleep notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRequest {
    pub reason: SleepReason,
}

pub struct App {
    session: Session,
    editor: EditorBuffer,
    store: NoteStore,
    reader: ButtonReader,
    last_screen: Screen,
    last_render_ms: Option<u64>,
    last_scan_refresh_ms: u64,
    last_passkey: Option<u32>,
}

impl App {
    pub fn new<FS: FileSystem>(fs: &mut FS, now_ms: u64) -> Self {
        let mut store = NoteStore::new();
        store.mount(fs);
        let session = Session::new(now_ms);
        let last_screen = session.screen();
        Self {
            session,
            editor: EditorBuffer::new(),
            store,
            reader: ButtonReader::new(),
            last_screen,
            last_render_ms: None,
            last_scan_refresh_ms: now_ms,
            last_passkey: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn editor(&self) -> &EditorBuffer {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorBuffer {
        &mut self.editor
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Run one tick. Returns a sleep request when the device should go
    /// down; the caller must not call `tick` again after that.
    pub fn tick<FS, I, B, R>(
        &mut self,
        now_ms: u64,
        fs: &mut FS,
        input: &mut I,
        ble: &mut B,
        renderer: &mut R,
    ) -> Option<SleepRequest>
    where
        FS: FileSystem,
        I: InputSource,
        B: BleTransport,
        R: Renderer,
    {
        let strategy = if self.session.screen() == Screen::BluetoothSettings {
            SamplingStrategy::AveragedAnalog
        } else {
            SamplingStrategy::Digital
        };
        let events = self.reader.poll(input, strategy, now_ms);

        // Apply entry/exit effects for transitions made last tick.
        let screen = self.session.screen();
        if screen != self.last_screen {
            self.on_screen_change(self.last_screen, screen, ble);
            self.last_screen = screen;
        }

        ble.service();

        if self.session.screen() == Screen::BluetoothSettings
            && ble.is_scanning()
            && now_ms.saturating_sub(self.last_scan_refresh_ms) >= SCAN_REFRESH_PERIOD_MS
        {
            self.session.mark_dirty();
            self.last_scan_refresh_ms = now_ms;
        }

        match events.power {
            PowerAction::Sleep => {
                // Long press suppresses everything else this tick.
                return Some(self.enter_sleep(SleepReason::PowerLongPress, fs, renderer));
            }
            PowerAction::ShortPress => {
                self.session
                    .return_to_main_menu(fs, &mut self.store, &mut self.editor);
            }
            PowerAction::None => {}
        }

        for button in &events.presses {
            let screen = self.session.screen();
            if let Some(key) = key_for(screen, *button, self.store.note_count()) {
                self.session
                    .handle_key(key, fs, &mut self.store, &mut self.editor, ble, now_ms);
            }
        }

        if events.any_activity() {
            self.session.note_activity(now_ms);
        }

        self.render_if_due(now_ms, ble, renderer);

        if now_ms.saturating_sub(self.session.last_activity_ms()) >= IDLE_TIMEOUT_MS {
            return Some(self.enter_sleep(SleepReason::IdleTimeout, fs, renderer));
        }

        None
    }

    fn on_screen_change<B: BleTransport>(&mut self, from: Screen, to: Screen, ble: &mut B) {
        log::info!("Screen: {:?} -> {:?}", from, to);
        if to == Screen::BluetoothSettings {
            ble.cancel_pending_connection();
            // Entry-edge only; re-entering while already scanning must
            // not restart the scan.
            if !ble.is_scanning() {
                ble.start_scan();
            }
            // Reconnection attempts fight manual pairing for the radio.
            ble.set_auto_reconnect(false);
        } else if from == Screen::BluetoothSettings {
            if ble.is_scanning() {
                ble.stop_scan();
            }
            ble.set_auto_reconnect(self.session.auto_reconnect());
        }
    }

    fn render_if_due<B: BleTransport, R: Renderer>(
        &mut self,
        now_ms: u64,
        ble: &mut B,
        renderer: &mut R,
    ) {
        let passkey = ble.pending_passkey();
        // A passkey waiting for comparison must never sit behind the
        // rate limiter.
        let passkey_pending = self.session.screen() == Screen::BluetoothSettings
            && passkey.is_some()
            && passkey != self.last_passkey;
        if passkey_pending {
            self.session.mark_dirty();
        }

        let elapsed_ok = match self.last_render_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= MIN_REFRESH_INTERVAL_MS,
        };
        if !self.session.is_dirty() || (!elapsed_ok && !passkey_pending) {
            return;
        }

        let view = ScreenView {
            screen: self.session.screen(),
            menu_selection: self.session.menu_selection(),
            notes: self.store.notes(),
            note_selection: self.session.note_selection(),
            editor_title: self.editor.title(),
            editor_content: self.editor.content(),
            editor_dirty: self.editor.is_dirty(),
            rename_buffer: self.session.rename_buffer(),
            settings_selection: self.session.settings_selection(),
            orientation: self.session.orientation(),
            auto_reconnect: self.session.auto_reconnect(),
            devices: ble.devices(),
            device_selection: self.session.device_selection(),
            passkey,
            ble_connected: ble.is_connected(),
            storage_available: self.store.is_available(),
        };
        renderer.draw(&view);

        self.session.clear_dirty();
        self.last_render_ms = Some(now_ms);
        self.last_passkey = passkey;
    }

    /// One-way: save open work, draw the notice, hand control to the
    /// firmware for power-down.
    fn enter_sleep<FS: FileSystem, R: Renderer>(
        &mut self,
        reason: SleepReason,
        fs: &mut FS,
        renderer: &mut R,
    ) -> SleepRequest {
        log::info!("Entering deep sleep: {:?}", reason);
        if self.editor.is_dirty() {
            if let Err(err) = self.store.save(fs, &mut self.editor) {
                log::warn!("Save before sleep failed: {}", err);
            }
        }
        renderer.draw_sleep_notice(reason);
        SleepRequest { reason }
    }
}
