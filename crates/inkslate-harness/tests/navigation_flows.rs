//! Screen transitions driven entirely through scripted button presses.

use inkslate_core::input::Button;
use inkslate_core::session::{Orientation, Screen};
use inkslate_core::note_store::UNTITLED;
use inkslate_harness::DeviceHarness;

#[test]
fn first_press_after_boot_is_registered() {
    // A button already down on the very first sample is a real press.
    let mut harness = DeviceHarness::new();
    harness.press(Button::Down);
    assert_eq!(harness.app().session().menu_selection(), 1);
}

#[test]
fn new_note_flow_end_to_end() {
    let mut harness = DeviceHarness::new();
    assert_eq!(harness.screen(), Screen::MainMenu);

    harness.press(Button::Confirm); // "New Note"
    assert_eq!(harness.screen(), Screen::NewFile);
    assert_eq!(harness.app().editor().title(), UNTITLED);

    // The title text comes from the keyboard peer, not the buttons.
    harness.app_mut().session_mut().set_rename_buffer("Field log");
    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::TextEditor);
    assert_eq!(harness.app().editor().title(), "Field log");

    harness.app_mut().editor_mut().set_content("day one");
    harness.app_mut().editor_mut().set_dirty(true);
    harness.press(Button::Back);
    assert_eq!(harness.screen(), Screen::FileBrowser);

    assert_eq!(harness.app().store().note_count(), 1);
    let entry = &harness.app().store().notes()[0];
    assert!(entry.filename.starts_with("note_1_"));
    assert_eq!(entry.title, "Field log");
    assert_eq!(
        harness
            .fs
            .file_content(&format!("/notes/{}", entry.filename)),
        Some("Field log\n\nday one")
    );
}

#[test]
fn abandoned_new_note_writes_nothing() {
    let mut harness = DeviceHarness::new();
    harness.press(Button::Confirm);
    harness.press(Button::Back);
    assert_eq!(harness.screen(), Screen::MainMenu);
    assert_eq!(harness.app().store().note_count(), 0);
    assert!(!harness.app().editor().is_open());
}

#[test]
fn empty_browser_ignores_list_buttons() {
    let mut harness = DeviceHarness::new();
    harness.press(Button::Down);
    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::FileBrowser);

    harness.press(Button::Confirm);
    harness.press(Button::Up);
    harness.press(Button::Down);
    assert_eq!(harness.screen(), Screen::FileBrowser);

    harness.press(Button::Back);
    assert_eq!(harness.screen(), Screen::MainMenu);
}

#[test]
fn settings_round_trip() {
    let mut harness = DeviceHarness::new();
    harness.press(Button::Down);
    harness.press(Button::Down);
    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::Settings);

    assert_eq!(
        harness.app().session().orientation(),
        Orientation::Portrait
    );
    harness.press(Button::Right);
    assert_eq!(
        harness.app().session().orientation(),
        Orientation::LandscapeFlipped
    );

    harness.press(Button::Down);
    harness.press(Button::Right);
    assert!(!harness.app().session().auto_reconnect());

    harness.press(Button::Back);
    assert_eq!(harness.screen(), Screen::MainMenu);
    // Orientation survives leaving the screen.
    assert_eq!(
        harness.app().session().orientation(),
        Orientation::LandscapeFlipped
    );
}
