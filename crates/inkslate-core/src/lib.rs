//! Session coordinator for the Inkslate note-taking appliance.
//! Runs on ESP32 firmware and on the host for scenario tests.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod app;
pub mod ble;
pub mod editor;
pub mod filesystem;
pub mod input;
pub mod note_store;
pub mod render;
pub mod session;

#[cfg(feature = "std")]
pub mod mock_filesystem;

pub use app::{App, SleepRequest, IDLE_TIMEOUT_MS};
pub use ble::{BleTransport, DeviceInfo};
pub use editor::{EditorBuffer, TEXT_BUFFER_CAP};
pub use filesystem::{FileInfo, FileSystem, FileSystemError};
pub use input::{
    AnalogChannel, Button, ButtonReader, EdgeDetector, InputEvents, InputSource, Key,
    PowerAction, PowerButtonTracker, SamplingStrategy,
};
pub use note_store::{
    title_to_slug, NoteEntry, NoteStore, RenameOutcome, MAX_NOTES, MAX_TITLE_LEN, NOTES_DIR,
    NOTE_EXTENSION, UNTITLED,
};
pub use render::{Renderer, ScreenView, SleepReason};
pub use session::{Orientation, Screen, Session, MAIN_MENU_ITEMS};

#[cfg(feature = "std")]
pub use mock_filesystem::MockFileSystem;
