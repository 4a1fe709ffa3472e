mod ble;
mod display;
mod input;
mod panel;
mod sdcard;

use esp_idf_svc::hal::delay::{Delay, FreeRtos};
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_svc::sys;
use inkslate_core::App;

use ble::BleLink;
use display::TextRenderer;
use input::HardwareInput;
use panel::Panel;
use sdcard::SdCardFs;

const LOOP_PERIOD_MS: u32 = 20;
const POWER_BTN_GPIO: i32 = 3;

fn now_ms() -> u64 {
    unsafe { sys::esp_timer_get_time() as u64 / 1000 }
}

fn enter_deep_sleep() -> ! {
    log::info!("Entering deep sleep");
    unsafe {
        sys::esp_deep_sleep_enable_gpio_wakeup(
            1u64 << POWER_BTN_GPIO,
            sys::esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_LOW,
        );
        sys::esp_deep_sleep_start();
    }
    unreachable!()
}

fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!(
        "Inkslate starting, {} bytes main stack",
        sys::CONFIG_ESP_MAIN_TASK_STACK_SIZE
    );

    let peripherals = Peripherals::take().expect("peripherals already taken");

    let spi = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio8,
        peripherals.pins.gpio10,
        Some(peripherals.pins.gpio7),
        &SpiDriverConfig::default(),
    )
    .expect("SPI init failed");

    let spi_config = Config::default().baudrate(esp_idf_svc::hal::units::Hertz(20_000_000));
    let panel_spi = SpiDeviceDriver::new(&spi, Option::<esp_idf_svc::hal::gpio::AnyIOPin>::None, &spi_config)
        .expect("panel SPI device failed");

    let dc = PinDriver::output(peripherals.pins.gpio4).expect("dc pin");
    let rst = PinDriver::output(peripherals.pins.gpio5).expect("rst pin");
    let busy = PinDriver::input(peripherals.pins.gpio6).expect("busy pin");
    let power_btn = PinDriver::input(peripherals.pins.gpio3).expect("power pin");

    let mut delay = Delay::new_default();
    let mut panel = Panel::new(panel_spi, dc, rst, busy);
    if let Err(err) = panel.init(&mut delay) {
        log::error!("Panel init failed: {:?}", err);
    }

    // A missing card leaves the note store unavailable; the UI still
    // runs with every storage operation degraded to a logged no-op.
    let mut fs = match SdCardFs::new(&spi, peripherals.pins.gpio9) {
        Ok(fs) => fs,
        Err(err) => {
            log::error!("SD init failed: {}", err);
            SdCardFs::unmounted()
        }
    };

    let mut input = HardwareInput::new(power_btn);
    let mut ble_link = BleLink::new();
    let mut renderer = TextRenderer::new();
    let mut app = App::new(&mut fs, now_ms());

    loop {
        let sleep_request = app.tick(now_ms(), &mut fs, &mut input, &mut ble_link, &mut renderer);

        if let Some(frame) = renderer.take_frame() {
            if let Err(err) = panel.draw_frame(frame, &mut delay) {
                log::error!("Frame push failed: {:?}", err);
            }
        }

        if let Some(request) = sleep_request {
            log::info!("Sleep requested: {:?}", request.reason);
            let _ = panel.deep_sleep();
            // Wait for release so the low level does not wake us right
            // back up.
            while input.power_is_held() {
                FreeRtos::delay_ms(50);
            }
            enter_deep_sleep();
        }

        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
