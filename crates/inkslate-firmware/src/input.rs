//! Hardware input: two ADC resistor ladders plus the power GPIO.

use esp_idf_svc::hal::gpio::{Gpio3, Input, PinDriver};
use esp_idf_svc::sys;
use inkslate_core::input::{decode_channel, AnalogChannel, Button, InputSource};

const ADC_WIDTH_BIT_12: u32 = 3;
const ADC_ATTEN_DB_11: u32 = 3;

pub struct HardwareInput<'d> {
    power_btn: PinDriver<'d, Gpio3, Input>,
}

impl<'d> HardwareInput<'d> {
    pub fn new(power_btn: PinDriver<'d, Gpio3, Input>) -> Self {
        unsafe {
            sys::adc1_config_width(ADC_WIDTH_BIT_12);
            sys::adc1_config_channel_atten(sys::adc_channel_t_ADC_CHANNEL_1, ADC_ATTEN_DB_11);
            sys::adc1_config_channel_atten(sys::adc_channel_t_ADC_CHANNEL_2, ADC_ATTEN_DB_11);
        }
        Self { power_btn }
    }

    pub fn power_is_held(&self) -> bool {
        self.power_btn.is_low()
    }

    fn read_raw(channel: AnalogChannel) -> u16 {
        let channel = match channel {
            AnalogChannel::Primary => sys::adc_channel_t_ADC_CHANNEL_1,
            AnalogChannel::Secondary => sys::adc_channel_t_ADC_CHANNEL_2,
        };
        unsafe { sys::adc1_get_raw(channel) as u16 }
    }
}

impl InputSource for HardwareInput<'_> {
    fn button_level(&mut self, button: Button) -> bool {
        let channel = match button {
            Button::Up | Button::Down => AnalogChannel::Secondary,
            _ => AnalogChannel::Primary,
        };
        decode_channel(channel, Self::read_raw(channel)) == Some(button)
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        Self::read_raw(channel)
    }

    fn power_pressed(&mut self) -> bool {
        // Active low.
        self.power_btn.is_low()
    }
}
