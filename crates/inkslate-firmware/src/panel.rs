//! Minimal SSD1677 e-paper driver: init, full-frame push, deep sleep.
//!
//! The note UI only ever does full refreshes, so partial-update RAM
//! juggling and LUT loading stay out of this driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

pub const PANEL_COLS: u16 = 480;
pub const PANEL_ROWS: u16 = 800;
pub const FRAME_BYTES: usize = (PANEL_COLS as usize / 8) * PANEL_ROWS as usize;

// SSD1677 command set (subset)
const SOFT_RESET: u8 = 0x12;
const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
const DATA_ENTRY_MODE: u8 = 0x11;
const BORDER_WAVEFORM: u8 = 0x3C;
const TEMP_SENSOR_CONTROL: u8 = 0x18;
const SET_RAM_X_RANGE: u8 = 0x44;
const SET_RAM_Y_RANGE: u8 = 0x45;
const SET_RAM_X_COUNTER: u8 = 0x4E;
const SET_RAM_Y_COUNTER: u8 = 0x4F;
const WRITE_RAM_BW: u8 = 0x24;
const DISPLAY_UPDATE_CTRL1: u8 = 0x21;
const DISPLAY_UPDATE_CTRL2: u8 = 0x22;
const MASTER_ACTIVATION: u8 = 0x20;
const DEEP_SLEEP: u8 = 0x10;
const CTRL1_BYPASS_RED: u8 = 0x40;
const CTRL2_FULL_SEQUENCE: u8 = 0xF7;

#[derive(Debug)]
pub enum PanelError {
    Spi,
    Pin,
    BusyTimeout,
}

pub struct Panel<SPI, DC, RST, BUSY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
}

impl<SPI, DC, RST, BUSY> Panel<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self { spi, dc, rst, busy }
    }

    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError> {
        self.hardware_reset(delay)?;
        self.command(SOFT_RESET)?;
        self.wait_while_busy(delay)?;

        let last_gate = PANEL_ROWS - 1;
        self.command_with_data(
            DRIVER_OUTPUT_CONTROL,
            &[(last_gate & 0xFF) as u8, (last_gate >> 8) as u8, 0x00],
        )?;
        // X increment, Y increment.
        self.command_with_data(DATA_ENTRY_MODE, &[0x03])?;
        self.command_with_data(BORDER_WAVEFORM, &[0x01])?;
        // Internal temperature sensor.
        self.command_with_data(TEMP_SENSOR_CONTROL, &[0x80])?;
        self.set_full_window()?;
        Ok(())
    }

    /// Push one full 1bpp frame and run a full refresh. Blocks until
    /// the panel reports ready.
    pub fn draw_frame<D: DelayNs>(
        &mut self,
        frame: &[u8],
        delay: &mut D,
    ) -> Result<(), PanelError> {
        self.set_full_window()?;
        self.command(WRITE_RAM_BW)?;
        self.data(frame)?;
        self.command_with_data(DISPLAY_UPDATE_CTRL1, &[CTRL1_BYPASS_RED, 0x00])?;
        self.command_with_data(DISPLAY_UPDATE_CTRL2, &[CTRL2_FULL_SEQUENCE])?;
        self.command(MASTER_ACTIVATION)?;
        self.wait_while_busy(delay)
    }

    /// Power the panel down. Only a hardware reset wakes it again.
    pub fn deep_sleep(&mut self) -> Result<(), PanelError> {
        self.command_with_data(DEEP_SLEEP, &[0x01])
    }

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError> {
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(20);
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(4);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(20);
        Ok(())
    }

    fn set_full_window(&mut self) -> Result<(), PanelError> {
        let last_x = PANEL_COLS - 1;
        let last_y = PANEL_ROWS - 1;
        self.command_with_data(
            SET_RAM_X_RANGE,
            &[0x00, 0x00, (last_x & 0xFF) as u8, (last_x >> 8) as u8],
        )?;
        self.command_with_data(
            SET_RAM_Y_RANGE,
            &[0x00, 0x00, (last_y & 0xFF) as u8, (last_y >> 8) as u8],
        )?;
        self.command_with_data(SET_RAM_X_COUNTER, &[0x00, 0x00])?;
        self.command_with_data(SET_RAM_Y_COUNTER, &[0x00, 0x00])
    }

    fn wait_while_busy<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError> {
        // Full refresh takes a few seconds; 10 s is generous.
        for _ in 0..1000 {
            if !self.busy.is_high().map_err(|_| PanelError::Pin)? {
                return Ok(());
            }
            delay.delay_ms(10);
        }
        Err(PanelError::BusyTimeout)
    }

    fn command(&mut self, command: u8) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Spi)
    }

    fn data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        self.spi.write(data).map_err(|_| PanelError::Spi)
    }

    fn command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.command(command)?;
        self.data(data)
    }
}
