//! Idle timeout and render rate limiting.

use inkslate_core::input::Button;
use inkslate_core::render::SleepReason;
use inkslate_core::{SleepRequest, IDLE_TIMEOUT_MS};
use inkslate_harness::DeviceHarness;

fn run_until_sleep(harness: &mut DeviceHarness, deadline_ms: u64) -> SleepRequest {
    loop {
        if let Some(request) = harness.tick() {
            return request;
        }
        assert!(
            harness.now_ms() < deadline_ms,
            "no sleep by {} ms",
            harness.now_ms()
        );
    }
}

#[test]
fn render_is_rate_limited() {
    let mut harness = DeviceHarness::new();
    assert!(harness.tick().is_none());
    assert_eq!(harness.renderer.draw_count(), 1); // boot frame

    // A press right after the boot frame marks the screen dirty, but
    // the frame must wait out the refresh floor.
    harness.press(Button::Down);
    assert_eq!(harness.renderer.draw_count(), 1);

    harness.run_for_ms(300);
    assert_eq!(harness.renderer.draw_count(), 2);
}

#[test]
fn idle_timeout_sleeps_from_any_screen() {
    let mut harness = DeviceHarness::new();
    let request = run_until_sleep(&mut harness, IDLE_TIMEOUT_MS + 1000);
    assert_eq!(request.reason, SleepReason::IdleTimeout);
    assert!(harness.now_ms() >= IDLE_TIMEOUT_MS);
    assert_eq!(harness.renderer.sleep_notices, [SleepReason::IdleTimeout]);
}

#[test]
fn input_resets_the_idle_clock() {
    let mut harness = DeviceHarness::new();
    harness.run_for_ms(IDLE_TIMEOUT_MS - 1000);
    // Activity is stamped on the press edge, not the release.
    harness.input.hold(Button::Down);
    assert!(harness.tick().is_none());
    let pressed_at = harness.now_ms();
    harness.input.release_all();
    assert!(harness.tick().is_none());

    let request = run_until_sleep(&mut harness, pressed_at + IDLE_TIMEOUT_MS + 1000);
    assert_eq!(request.reason, SleepReason::IdleTimeout);
    assert!(harness.now_ms() >= pressed_at + IDLE_TIMEOUT_MS);
}

#[test]
fn idle_sleep_saves_open_work_first() {
    let mut harness = DeviceHarness::with_notes(&[("a.txt", "Alpha\n\nold")]);
    harness.press(Button::Down);
    harness.press(Button::Confirm);
    harness.press(Button::Confirm); // open the note
    harness.app_mut().editor_mut().set_content("parked");
    harness.app_mut().editor_mut().set_dirty(true);

    let deadline = harness.now_ms() + IDLE_TIMEOUT_MS + 1000;
    let request = run_until_sleep(&mut harness, deadline);
    assert_eq!(request.reason, SleepReason::IdleTimeout);
    assert_eq!(
        harness.fs.file_content("/notes/a.txt"),
        Some("Alpha\n\nparked")
    );
}
