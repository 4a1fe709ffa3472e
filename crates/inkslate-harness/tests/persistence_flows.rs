//! Note store behavior exercised through the full device loop.

use inkslate_core::filesystem::FileSystem;
use inkslate_core::input::Button;
use inkslate_core::note_store::UNTITLED;
use inkslate_core::session::Screen;
use inkslate_harness::DeviceHarness;

#[test]
fn groceries_scenario() {
    let mut harness =
        DeviceHarness::with_notes(&[("note_1_1000.txt", "Groceries\n\nMilk\nEggs")]);

    harness.press(Button::Down);
    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::FileBrowser);

    // Flush a frame and check the listed title.
    harness.run_for_ms(300);
    let frame = harness.renderer.last_frame();
    assert_eq!(frame.screen, Screen::FileBrowser);
    assert_eq!(frame.note_titles, ["Groceries"]);

    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::TextEditor);
    assert_eq!(harness.app().editor().title(), "Groceries");
    assert_eq!(harness.app().editor().content(), "Milk\nEggs");
}

#[test]
fn legacy_file_scenario() {
    let mut harness = DeviceHarness::with_notes(&[("old.txt", "just some text")]);
    harness.press(Button::Down);
    harness.press(Button::Confirm);
    harness.press(Button::Confirm);
    assert_eq!(harness.app().editor().title(), UNTITLED);
    assert_eq!(harness.app().editor().content(), "just some text");
}

#[test]
fn rename_through_the_browser_resolves_collisions() {
    // BTreeMap listing order puts note_1_1.txt before todo.txt.
    let mut harness = DeviceHarness::with_notes(&[
        ("note_1_1.txt", "Untitled\n\nmine"),
        ("todo.txt", "Todo\n\nother"),
    ]);
    harness.press(Button::Down);
    harness.press(Button::Confirm);

    harness.press(Button::Left);
    assert_eq!(harness.screen(), Screen::RenameFile);
    assert_eq!(harness.app().session().rename_buffer(), "Untitled");

    harness.app_mut().session_mut().set_rename_buffer("Todo");
    harness.press(Button::Confirm);
    assert_eq!(harness.screen(), Screen::FileBrowser);

    // The slug collided with todo.txt, so the suffixed name was used.
    assert!(harness.fs.exists("/notes/todo_2.txt"));
    assert_eq!(
        harness.fs.file_content("/notes/todo_2.txt"),
        Some("Todo\n\nmine")
    );
    assert!(!harness.fs.exists("/notes/note_1_1.txt"));
}

#[test]
fn delete_through_the_browser() {
    let mut harness = DeviceHarness::with_notes(&[
        ("a.txt", "A\n\n1"),
        ("b.txt", "B\n\n2"),
    ]);
    harness.press(Button::Down);
    harness.press(Button::Confirm);

    harness.press(Button::Down); // select b.txt
    harness.press(Button::Right);
    assert!(!harness.fs.exists("/notes/b.txt"));
    assert_eq!(harness.app().store().note_count(), 1);
    assert_eq!(harness.app().session().note_selection(), 0);
}

#[test]
fn counter_survives_across_created_notes() {
    let mut harness = DeviceHarness::new();
    for _ in 0..3 {
        harness.press(Button::Confirm); // "New Note"
        harness.press(Button::Back); // abandon it
    }
    assert_eq!(harness.fs.file_content("/notes/.counter"), Some("3"));
}
