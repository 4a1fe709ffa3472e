//! Input debounce engine.
//!
//! Two resistor-ladder ADC channels carry six navigation buttons; a
//! separate digital line carries the power button. Raw levels are
//! averaged, decoded into bands, and edge-detected so the session only
//! ever sees discrete press events.

use alloc::vec::Vec;

/// Physical device buttons (directly maps to hardware)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    // Primary ADC ladder
    Back,
    Confirm,
    Left,
    Right,
    // Secondary ADC ladder
    Up,
    Down,
    // Digital, active LOW at the pin; sources report it as a level
    Power,
}

/// Logical keys delivered to the session after debounce. The power
/// button never appears here; it has its own press-length semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

impl Button {
    pub fn key(self) -> Option<Key> {
        match self {
            Button::Up => Some(Key::Up),
            Button::Down => Some(Key::Down),
            Button::Left => Some(Key::Left),
            Button::Right => Some(Key::Right),
            Button::Confirm => Some(Key::Confirm),
            Button::Back => Some(Key::Back),
            Button::Power => None,
        }
    }
}

/// The two resistor-ladder channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// Back / Confirm / Left / Right
    Primary,
    /// Up / Down
    Secondary,
}

/// Raw input provider. The firmware backs this with ADC oneshot reads
/// and GPIO levels; the harness scripts it.
pub trait InputSource {
    /// Pre-debounced level of one ladder button, true while held.
    /// Used by the digital strategy.
    fn button_level(&mut self, button: Button) -> bool;
    /// Single raw ladder reading in millivolts. Used by the
    /// averaged-analog strategy.
    fn read_analog(&mut self, channel: AnalogChannel) -> u16;
    /// Power button level, true while held.
    fn power_pressed(&mut self) -> bool;
}

/// How ladder buttons are sampled this tick.
///
/// The digital path relies on the hardware debounce window. While the
/// radio scans, analog jitter keeps that window from ever settling, so
/// the Bluetooth screen switches to averaging raw ADC reads instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    Digital,
    AveragedAnalog,
}

/// Readings averaged per poll to ride out ladder noise
pub const ADC_SAMPLES: u32 = 8;
/// Holds longer than this force a sleep
pub const LONG_PRESS_MS: u64 = 5000;
/// Releases at or under this are contact bounce
pub const SHORT_PRESS_MIN_MS: u64 = 50;
/// Releases at or past this are deliberate holds, not taps
pub const SHORT_PRESS_MAX_MS: u64 = 1000;

/// Average `ADC_SAMPLES` consecutive readings of one channel.
pub fn sample_channel<I: InputSource>(input: &mut I, channel: AnalogChannel) -> u16 {
    let mut sum: u32 = 0;
    for _ in 0..ADC_SAMPLES {
        sum += u32::from(input.read_analog(channel));
    }
    (sum / ADC_SAMPLES) as u16
}

/// Map an averaged millivolt reading onto its ladder band. Readings
/// above the idle threshold mean no button is down.
pub fn decode_channel(channel: AnalogChannel, millivolts: u16) -> Option<Button> {
    match channel {
        AnalogChannel::Primary => {
            if millivolts > 3800 {
                None
            } else if millivolts > 2600 {
                Some(Button::Back)
            } else if millivolts > 1400 {
                Some(Button::Confirm)
            } else if millivolts > 400 {
                Some(Button::Left)
            } else {
                Some(Button::Right)
            }
        }
        AnalogChannel::Secondary => {
            if millivolts > 3800 {
                None
            } else if millivolts > 600 {
                Some(Button::Up)
            } else {
                Some(Button::Down)
            }
        }
    }
}

/// Turns decoded ladder states into press events: a button fires on the
/// poll where it first appears and stays silent while held.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    last: Option<Button>,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn update(&mut self, current: Option<Button>) -> Option<Button> {
        let fired = if current != self.last { current } else { None };
        self.last = current;
        fired
    }
}

/// What the power button resolved to this poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    None,
    /// Released after a deliberate tap.
    ShortPress,
    /// Held long enough to force a sleep. Fires once per hold, while
    /// the button is still down.
    Sleep,
}

/// Press-length state machine for the power button.
#[derive(Debug, Default)]
pub struct PowerButtonTracker {
    pressed_at: Option<u64>,
    long_fired: bool,
}

impl PowerButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, pressed: bool, now_ms: u64) -> PowerAction {
        match (pressed, self.pressed_at) {
            (true, None) => {
                self.pressed_at = Some(now_ms);
                self.long_fired = false;
                PowerAction::None
            }
            (true, Some(since)) => {
                if !self.long_fired && now_ms.saturating_sub(since) > LONG_PRESS_MS {
                    self.long_fired = true;
                    PowerAction::Sleep
                } else {
                    PowerAction::None
                }
            }
            (false, Some(since)) => {
                self.pressed_at = None;
                let held = now_ms.saturating_sub(since);
                if !self.long_fired
                    && held > SHORT_PRESS_MIN_MS
                    && held < SHORT_PRESS_MAX_MS
                {
                    PowerAction::ShortPress
                } else {
                    PowerAction::None
                }
            }
            (false, None) => PowerAction::None,
        }
    }
}

/// Debounced events produced by one poll of all inputs.
#[derive(Debug, Clone)]
pub struct InputEvents {
    pub presses: Vec<Button>,
    pub power: PowerAction,
}

impl InputEvents {
    pub fn any_activity(&self) -> bool {
        !self.presses.is_empty() || self.power != PowerAction::None
    }
}

const LADDER_BUTTONS: [Button; 6] = [
    Button::Back,
    Button::Confirm,
    Button::Left,
    Button::Right,
    Button::Up,
    Button::Down,
];

/// Polls both ladders and the power line in one pass, running whichever
/// sampling strategy the caller selects for this tick.
#[derive(Debug, Default)]
pub struct ButtonReader {
    digital_prev: [bool; 6],
    primary: EdgeDetector,
    secondary: EdgeDetector,
    power: PowerButtonTracker,
    last_strategy: Option<SamplingStrategy>,
}

impl ButtonReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll<I: InputSource>(
        &mut self,
        input: &mut I,
        strategy: SamplingStrategy,
        now_ms: u64,
    ) -> InputEvents {
        // Re-seed edge state on a strategy switch so a level that was
        // already high does not fire a phantom edge. Boot state stays at
        // the not-pressed baseline: a button held on the very first poll
        // is a real press and must fire.
        match self.last_strategy {
            Some(last) if last != strategy => self.resync(input, strategy),
            _ => {}
        }
        self.last_strategy = Some(strategy);

        let mut presses = Vec::new();
        match strategy {
            SamplingStrategy::Digital => {
                for (slot, &button) in LADDER_BUTTONS.iter().enumerate() {
                    let level = input.button_level(button);
                    if level && !self.digital_prev[slot] {
                        log::debug!("Button press: {:?}", button);
                        presses.push(button);
                    }
                    self.digital_prev[slot] = level;
                }
            }
            SamplingStrategy::AveragedAnalog => {
                for channel in [AnalogChannel::Primary, AnalogChannel::Secondary] {
                    let mv = sample_channel(input, channel);
                    let edge = match channel {
                        AnalogChannel::Primary => &mut self.primary,
                        AnalogChannel::Secondary => &mut self.secondary,
                    };
                    if let Some(button) = edge.update(decode_channel(channel, mv)) {
                        log::debug!("Button press: {:?} ({} mV avg)", button, mv);
                        presses.push(button);
                    }
                }
            }
        }

        let power = self.power.update(input.power_pressed(), now_ms);
        InputEvents { presses, power }
    }

    fn resync<I: InputSource>(&mut self, input: &mut I, strategy: SamplingStrategy) {
        match strategy {
            SamplingStrategy::Digital => {
                for (slot, &button) in LADDER_BUTTONS.iter().enumerate() {
                    self.digital_prev[slot] = input.button_level(button);
                }
            }
            SamplingStrategy::AveragedAnalog => {
                for channel in [AnalogChannel::Primary, AnalogChannel::Secondary] {
                    let mv = sample_channel(input, channel);
                    let edge = match channel {
                        AnalogChannel::Primary => &mut self.primary,
                        AnalogChannel::Secondary => &mut self.secondary,
                    };
                    let _ = edge.update(decode_channel(channel, mv));
                }
            }
        }
    }
}
