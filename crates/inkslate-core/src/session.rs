//! Session state machine.
//!
//! Owns the current screen and every per-screen cursor, and turns
//! debounced key events into transitions and store operations. All
//! mutation happens from the tick loop; nothing here is shared.

use alloc::string::{String, ToString};

use crate::ble::BleTransport;
use crate::editor::EditorBuffer;
use crate::filesystem::FileSystem;
use crate::input::{Button, Key};
use crate::note_store::{NoteStore, RenameOutcome, UNTITLED};

/// UI screens. The device boots into the main menu; deep sleep is a
/// process suspension, not a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    FileBrowser,
    TextEditor,
    RenameFile,
    NewFile,
    Settings,
    BluetoothSettings,
}

pub const MAIN_MENU_ITEMS: [&str; 4] = ["New Note", "Browse Notes", "Settings", "Bluetooth"];
pub const SETTINGS_ITEMS: [&str; 2] = ["Orientation", "BLE auto-reconnect"];

/// Display orientation, stepped through from the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    LandscapeFlipped,
    PortraitFlipped,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Landscape,
        Orientation::Portrait,
        Orientation::LandscapeFlipped,
        Orientation::PortraitFlipped,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
            Orientation::LandscapeFlipped => "Landscape (flipped)",
            Orientation::PortraitFlipped => "Portrait (flipped)",
        }
    }

    fn index(&self) -> usize {
        match self {
            Orientation::Landscape => 0,
            Orientation::Portrait => 1,
            Orientation::LandscapeFlipped => 2,
            Orientation::PortraitFlipped => 3,
        }
    }

    pub fn next(&self) -> Orientation {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Orientation {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which physical buttons are live differs by screen. Returns the
/// logical key a press maps to, or `None` when the button is dead on
/// this screen. `note_count` gates list actions in the file browser.
pub fn key_for(screen: Screen, button: Button, note_count: usize) -> Option<Key> {
    let key = button.key()?;
    match screen {
        Screen::MainMenu => matches!(key, Key::Up | Key::Down | Key::Confirm).then_some(key),
        Screen::FileBrowser => match key {
            Key::Back => Some(key),
            _ if note_count == 0 => None,
            _ => Some(key),
        },
        // The editing model owns every other button; Back is a screen
        // transition, not an editing key.
        Screen::TextEditor => (key == Key::Back).then_some(key),
        Screen::RenameFile | Screen::NewFile => {
            matches!(key, Key::Confirm | Key::Back).then_some(key)
        }
        Screen::Settings => {
            matches!(key, Key::Up | Key::Down | Key::Left | Key::Right | Key::Back).then_some(key)
        }
        Screen::BluetoothSettings => {
            matches!(key, Key::Up | Key::Down | Key::Confirm | Key::Back).then_some(key)
        }
    }
}

/// Mutable session context. Owned by `App`, mutated only from the tick
/// loop.
pub struct Session {
    screen: Screen,
    menu_selection: usize,
    note_selection: usize,
    settings_selection: usize,
    device_selection: usize,
    rename_buffer: String,
    rename_target: String,
    orientation: Orientation,
    auto_reconnect: bool,
    dirty: bool,
    last_activity_ms: u64,
}

impl Session {
    pub fn new(now_ms: u64) -> Self {
        Self {
            screen: Screen::MainMenu,
            menu_selection: 0,
            note_selection: 0,
            settings_selection: 0,
            device_selection: 0,
            rename_buffer: String::new(),
            rename_target: String::new(),
            orientation: Orientation::Portrait,
            auto_reconnect: true,
            dirty: true,
            last_activity_ms: now_ms,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn menu_selection(&self) -> usize {
        self.menu_selection
    }

    pub fn note_selection(&self) -> usize {
        self.note_selection
    }

    pub fn settings_selection(&self) -> usize {
        self.settings_selection
    }

    pub fn device_selection(&self) -> usize {
        self.device_selection
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    pub fn rename_buffer(&self) -> &str {
        &self.rename_buffer
    }

    /// Title text typed on the rename/new-file screens arrives from the
    /// keyboard peer, outside the button path.
    pub fn set_rename_buffer(&mut self, text: &str) {
        self.rename_buffer.clear();
        self.rename_buffer.push_str(text);
        self.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn note_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }

    /// Force a return to the main menu, saving open work first. Used by
    /// the power short press from any screen.
    pub fn return_to_main_menu<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        store: &mut NoteStore,
        editor: &mut EditorBuffer,
    ) {
        if editor.is_dirty() {
            if let Err(err) = store.save(fs, editor) {
                log::warn!("Save on menu return failed: {}", err);
            }
        }
        // Already home; a redundant full refresh is visible on e-ink.
        if self.screen == Screen::MainMenu {
            return;
        }
        self.screen = Screen::MainMenu;
        self.mark_dirty();
    }

    /// Dispatch one logical key. The caller has already run `key_for`,
    /// so every key arriving here is live for the current screen.
    pub fn handle_key<FS, B>(
        &mut self,
        key: Key,
        fs: &mut FS,
        store: &mut NoteStore,
        editor: &mut EditorBuffer,
        ble: &mut B,
        now_ms: u64,
    ) where
        FS: FileSystem,
        B: BleTransport,
    {
        match self.screen {
            Screen::MainMenu => self.handle_main_menu(key, fs, store, editor, now_ms),
            Screen::FileBrowser => self.handle_file_browser(key, fs, store, editor),
            Screen::TextEditor => {
                if key == Key::Back {
                    if editor.is_dirty() {
                        if let Err(err) = store.save(fs, editor) {
                            log::warn!("Save on editor exit failed: {}", err);
                        }
                    }
                    self.screen = Screen::FileBrowser;
                }
            }
            Screen::RenameFile => self.handle_rename(key, fs, store, editor),
            Screen::NewFile => self.handle_new_file(key, editor),
            Screen::Settings => self.handle_settings(key),
            Screen::BluetoothSettings => self.handle_bluetooth(key, ble),
        }
        self.mark_dirty();
    }

    fn handle_main_menu<FS: FileSystem>(
        &mut self,
        key: Key,
        fs: &mut FS,
        store: &mut NoteStore,
        editor: &mut EditorBuffer,
        now_ms: u64,
    ) {
        match key {
            Key::Up => self.menu_selection = self.menu_selection.saturating_sub(1),
            Key::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MAIN_MENU_ITEMS.len() - 1)
            }
            Key::Confirm => match self.menu_selection {
                0 => {
                    store.create(fs, editor, now_ms);
                    self.rename_buffer.clear();
                    self.screen = Screen::NewFile;
                }
                1 => {
                    if let Err(err) = store.refresh(fs) {
                        log::warn!("Note listing failed: {}", err);
                    }
                    self.note_selection = self
                        .note_selection
                        .min(store.note_count().saturating_sub(1));
                    self.screen = Screen::FileBrowser;
                }
                2 => self.screen = Screen::Settings,
                _ => self.screen = Screen::BluetoothSettings,
            },
            _ => {}
        }
    }

    fn handle_file_browser<FS: FileSystem>(
        &mut self,
        key: Key,
        fs: &mut FS,
        store: &mut NoteStore,
        editor: &mut EditorBuffer,
    ) {
        match key {
            Key::Up => self.note_selection = self.note_selection.saturating_sub(1),
            Key::Down => {
                self.note_selection =
                    (self.note_selection + 1).min(store.note_count().saturating_sub(1))
            }
            Key::Confirm => {
                let filename = match store.notes().get(self.note_selection) {
                    Some(entry) => entry.filename.clone(),
                    None => return,
                };
                match store.load(fs, &filename, editor) {
                    Ok(()) => self.screen = Screen::TextEditor,
                    Err(err) => log::warn!("Open failed for {}: {}", filename, err),
                }
            }
            Key::Left => {
                if let Some(entry) = store.notes().get(self.note_selection) {
                    self.rename_target = entry.filename.clone();
                    self.rename_buffer = entry.title.clone();
                    self.screen = Screen::RenameFile;
                }
            }
            Key::Right => {
                let filename = match store.notes().get(self.note_selection) {
                    Some(entry) => entry.filename.clone(),
                    None => return,
                };
                if let Err(err) = store.delete(fs, &filename) {
                    log::warn!("Delete failed for {}: {}", filename, err);
                }
                self.note_selection = self
                    .note_selection
                    .min(store.note_count().saturating_sub(1));
            }
            Key::Back => self.screen = Screen::MainMenu,
        }
    }

    fn handle_rename<FS: FileSystem>(
        &mut self,
        key: Key,
        fs: &mut FS,
        store: &mut NoteStore,
        editor: &mut EditorBuffer,
    ) {
        match key {
            Key::Confirm => {
                let target = self.rename_target.clone();
                match store.rename(fs, &target, &self.rename_buffer, editor) {
                    Ok(RenameOutcome::Renamed(filename)) => {
                        log::info!("Renamed {} -> {}", target, filename)
                    }
                    Ok(RenameOutcome::TitleOnly) => {
                        log::info!("Title updated, filename kept for {}", target)
                    }
                    Err(err) => log::warn!("Rename failed for {}: {}", target, err),
                }
                self.screen = Screen::FileBrowser;
            }
            Key::Back => self.screen = Screen::FileBrowser,
            _ => {}
        }
    }

    fn handle_new_file(&mut self, key: Key, editor: &mut EditorBuffer) {
        match key {
            Key::Confirm => {
                if self.rename_buffer.is_empty() {
                    editor.set_title(UNTITLED);
                } else {
                    let title = self.rename_buffer.clone();
                    editor.set_title(&title);
                }
                editor.set_dirty(true);
                self.screen = Screen::TextEditor;
            }
            Key::Back => {
                // Abandon the unsaved note.
                editor.clear();
                self.screen = Screen::MainMenu;
            }
            _ => {}
        }
    }

    fn handle_settings(&mut self, key: Key) {
        match key {
            Key::Up => self.settings_selection = self.settings_selection.saturating_sub(1),
            Key::Down => {
                self.settings_selection =
                    (self.settings_selection + 1).min(SETTINGS_ITEMS.len() - 1)
            }
            Key::Left | Key::Right => match self.settings_selection {
                0 => {
                    self.orientation = if key == Key::Right {
                        self.orientation.next()
                    } else {
                        self.orientation.prev()
                    };
                }
                _ => self.auto_reconnect = !self.auto_reconnect,
            },
            Key::Back => self.screen = Screen::MainMenu,
            _ => {}
        }
    }

    fn handle_bluetooth<B: BleTransport>(&mut self, key: Key, ble: &mut B) {
        match key {
            Key::Up => self.device_selection = self.device_selection.saturating_sub(1),
            Key::Down => {
                self.device_selection = (self.device_selection + 1)
                    .min(ble.devices().len().saturating_sub(1))
            }
            Key::Confirm => {
                let address = ble
                    .devices()
                    .get(self.device_selection)
                    .map(|device| device.address.to_string());
                if let Some(address) = address {
                    log::info!("Connecting to {}", address);
                    ble.connect(&address);
                }
            }
            Key::Back => self.screen = Screen::MainMenu,
            _ => {}
        }
    }
}
