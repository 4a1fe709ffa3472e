//! Text-based screen rendering into a 1bpp framebuffer.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use inkslate_core::render::{Renderer, ScreenView, SleepReason};
use inkslate_core::session::{Screen, MAIN_MENU_ITEMS, SETTINGS_ITEMS};

use crate::panel::{FRAME_BYTES, PANEL_COLS, PANEL_ROWS};

const MARGIN: i32 = 12;
const HEADER_BASELINE: i32 = 28;
const LINE_HEIGHT: i32 = 24;
const BODY_LINE_HEIGHT: i32 = 14;
/// Characters per body line at FONT_6X10, inside the margins.
const BODY_WRAP_COLS: usize = 76;

/// 1bpp framebuffer the panel can push directly. White is the idle
/// e-paper color, so "off" bits are white.
pub struct FrameBuffer {
    pixels: Box<[u8; FRAME_BYTES]>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([0xFF; FRAME_BYTES]),
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0xFF);
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels[..]
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(PANEL_COLS), u32::from(PANEL_ROWS))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = Rectangle::new(Point::zero(), self.size());
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let index = point.y as usize * (PANEL_COLS as usize / 8) + point.x as usize / 8;
            let mask = 0x80 >> (point.x as usize % 8);
            match color {
                BinaryColor::On => self.pixels[index] &= !mask, // black
                BinaryColor::Off => self.pixels[index] |= mask,
            }
        }
        Ok(())
    }
}

/// Draws every screen as a titled text list. Owns the framebuffer; the
/// main loop pushes it to the panel after each draw.
pub struct TextRenderer {
    frame: FrameBuffer,
    frame_ready: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            frame_ready: false,
        }
    }

    /// The finished frame from the last draw call, if one is pending.
    pub fn take_frame(&mut self) -> Option<&[u8]> {
        if self.frame_ready {
            self.frame_ready = false;
            Some(self.frame.data())
        } else {
            None
        }
    }

    fn header(&mut self, text: &str) {
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let _ = Text::new(text, Point::new(MARGIN, HEADER_BASELINE), style)
            .draw(&mut self.frame);
    }

    fn list(&mut self, items: &[String], selected: usize) {
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        for (row, item) in items.iter().enumerate() {
            let marker = if row == selected { "> " } else { "  " };
            let y = HEADER_BASELINE + LINE_HEIGHT + row as i32 * LINE_HEIGHT;
            let line = format!("{}{}", marker, item);
            let _ = Text::new(&line, Point::new(MARGIN, y), style).draw(&mut self.frame);
        }
    }

    fn body(&mut self, text: &str, from_y: i32) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let mut y = from_y;
        for line in text.lines() {
            let mut rest = line;
            loop {
                let cut = rest
                    .char_indices()
                    .nth(BODY_WRAP_COLS)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                let (head, tail) = rest.split_at(cut);
                let _ = Text::new(head, Point::new(MARGIN, y), style).draw(&mut self.frame);
                y += BODY_LINE_HEIGHT;
                if tail.is_empty() || y > i32::from(PANEL_ROWS) - BODY_LINE_HEIGHT {
                    break;
                }
                rest = tail;
            }
            if y > i32::from(PANEL_ROWS) - BODY_LINE_HEIGHT {
                break;
            }
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, view: &ScreenView<'_>) {
        self.frame.clear();
        match view.screen {
            Screen::MainMenu => {
                self.header("Inkslate");
                let items: Vec<String> =
                    MAIN_MENU_ITEMS.iter().map(|s| s.to_string()).collect();
                self.list(&items, view.menu_selection);
                if !view.storage_available {
                    self.body("SD card unavailable", i32::from(PANEL_ROWS) - 20);
                }
            }
            Screen::FileBrowser => {
                self.header("Notes");
                if view.notes.is_empty() {
                    self.body("No notes yet.", HEADER_BASELINE + LINE_HEIGHT);
                } else {
                    let items: Vec<String> =
                        view.notes.iter().map(|n| n.title.clone()).collect();
                    self.list(&items, view.note_selection);
                }
            }
            Screen::TextEditor => {
                let marker = if view.editor_dirty { " *" } else { "" };
                self.header(&format!("{}{}", view.editor_title, marker));
                self.body(view.editor_content, HEADER_BASELINE + LINE_HEIGHT);
            }
            Screen::RenameFile => {
                self.header("Rename note");
                self.body(view.rename_buffer, HEADER_BASELINE + LINE_HEIGHT);
            }
            Screen::NewFile => {
                self.header("New note title");
                self.body(view.rename_buffer, HEADER_BASELINE + LINE_HEIGHT);
            }
            Screen::Settings => {
                self.header("Settings");
                let items = vec![
                    format!("{}: {}", SETTINGS_ITEMS[0], view.orientation.label()),
                    format!(
                        "{}: {}",
                        SETTINGS_ITEMS[1],
                        if view.auto_reconnect { "on" } else { "off" }
                    ),
                ];
                self.list(&items, view.settings_selection);
            }
            Screen::BluetoothSettings => {
                self.header("Bluetooth");
                if let Some(passkey) = view.passkey {
                    self.body(
                        &format!("Confirm passkey: {:06}", passkey),
                        HEADER_BASELINE + LINE_HEIGHT,
                    );
                } else if view.devices.is_empty() {
                    self.body("Scanning...", HEADER_BASELINE + LINE_HEIGHT);
                } else {
                    let items: Vec<String> = view
                        .devices
                        .iter()
                        .map(|d| format!("{} ({})", d.name, d.address))
                        .collect();
                    self.list(&items, view.device_selection);
                }
            }
        }
        self.frame_ready = true;
    }

    fn draw_sleep_notice(&mut self, reason: SleepReason) {
        self.frame.clear();
        let notice = match reason {
            SleepReason::PowerLongPress => "Powering off...",
            SleepReason::IdleTimeout => "Sleeping...",
        };
        self.header(notice);
        self.frame_ready = true;
    }
}
