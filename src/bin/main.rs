#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal_bus::{i2c::CriticalSectionDevice, spi::ExclusiveDevice};
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcConfig, Attenuation},
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    rng::Rng,
    rtc_cntl::{reset_reason, wakeup_cause},
    spi::master::Spi,
    system::Cpu,
    time::Rate,
};
use gdeh0154d67::{Config as PanelConfig, Gdeh0154d67};
use log::{LevelFilter, info, warn};
use static_cell::StaticCell;
use storms_core::{
    app::{CycleOutcome, WatchApp, WatchConfig},
    clock::TimeSnapshot,
    wake::{TimingMode, WakePins},
    weather::SimulatedWeather,
};
use storms_hal_esp32::{
    clock::ds3231::Ds3231,
    haptics::motor::VibrationMotor,
    input::buttons::{ButtonConfig, WatchButtons},
    motion::bma423::Bma423,
    platform::display::EpaperDisplay,
    render::{SevenSegmentFace, WatchRenderer},
};

use board::{BatteryMonitor, WatchyBoard};

#[path = "main/board.rs"]
mod board;
#[path = "main/power.rs"]
mod power;
#[path = "main/retained.rs"]
mod retained;

// Watchy v1 wiring.
const MENU_GPIO: u8 = 26;
const BACK_GPIO: u8 = 25;
const UP_GPIO: u8 = 32;
const DOWN_GPIO: u8 = 4;
const ACC_INT_GPIO: u8 = 14;
const RTC_INT_GPIO: u8 = 27;

const WAKE_PINS: WakePins =
    WakePins::from_gpios(MENU_GPIO, BACK_GPIO, UP_GPIO, DOWN_GPIO, ACC_INT_GPIO);

const I2C_HZ: u32 = 400_000;
const BUTTON_DEBOUNCE_POLLS: u8 = 2;

static I2C_BUS: StaticCell<Mutex<RefCell<I2c<'static, Blocking>>>> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn watch_config() -> WatchConfig {
    let timing = if cfg!(feature = "free-running-timer") {
        TimingMode::FreeRunning
    } else {
        TimingMode::RtcAlarm
    };

    let initial_time = option_env!("STORMS_DATETIME").and_then(|stamp| {
        let parsed = TimeSnapshot::parse_stamp(stamp);
        if parsed.is_none() {
            warn!("config: ignoring malformed STORMS_DATETIME {:?}", stamp);
        }
        parsed
    });

    WatchConfig {
        timing,
        initial_time,
        ..WatchConfig::default()
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "the display framebuffer lives in main for the whole wake"
)]
#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: storms starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    let cause = power::wake_cause();
    info!(
        "boot reset_reason={:?} wakeup_cause={:?} cause={:?}",
        reset_reason(Cpu::ProCpu),
        wakeup_cause(),
        cause
    );

    let watch_config = watch_config();

    // Panel: SCK=18 MOSI=23 CS=5 DC=10 RST=9 BUSY=19.
    let panel_config = PanelConfig::default();
    let spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(panel_config.spi_hz))
        .with_mode(esp_hal::spi::Mode::_0);
    let spi = Spi::new(peripherals.SPI2, spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO18)
        .with_mosi(peripherals.GPIO23);
    let cs = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());
    let Ok(panel_spi) = ExclusiveDevice::new(spi, cs, Delay::new());
    let dc = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO9, Level::High, OutputConfig::default());
    let busy = Input::new(peripherals.GPIO19, InputConfig::default());
    let panel = Gdeh0154d67::new(panel_spi, dc, rst, busy, panel_config);
    let renderer = WatchRenderer::new(SevenSegmentFace, watch_config.ota_device_name);
    let display = EpaperDisplay::new(panel, Delay::new(), renderer);

    // DS3231 and BMA423 share I2C0: SDA=21 SCL=22.
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_hz(I2C_HZ)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO21)
    .with_scl(peripherals.GPIO22);
    let i2c_bus: &'static Mutex<RefCell<I2c<'static, Blocking>>> =
        I2C_BUS.init(Mutex::new(RefCell::new(i2c)));
    let clock = Ds3231::new(CriticalSectionDevice::new(i2c_bus));
    let motion = Bma423::new(CriticalSectionDevice::new(i2c_bus), Delay::new());

    // Buttons pull their lines high; the board carries the pull-downs.
    let button_cfg = InputConfig::default().with_pull(Pull::None);
    let buttons = WatchButtons::new(
        Input::new(peripherals.GPIO26, button_cfg),
        Input::new(peripherals.GPIO25, button_cfg),
        Input::new(peripherals.GPIO32, button_cfg),
        Input::new(peripherals.GPIO4, button_cfg),
        ButtonConfig::default().with_debounce_polls(BUTTON_DEBOUNCE_POLLS),
    );

    let motor = VibrationMotor::new(Output::new(
        peripherals.GPIO13,
        Level::Low,
        OutputConfig::default(),
    ));

    let mut adc_config = AdcConfig::new();
    let battery_pin = adc_config.enable_pin(peripherals.GPIO34, Attenuation::_11dB);
    let battery = BatteryMonitor::new(Adc::new(peripherals.ADC1, adc_config), battery_pin);

    let rng = Rng::new();
    let weather = SimulatedWeather::new(rng.random());

    let board = WatchyBoard::new(
        display, clock, motion, buttons, motor, battery, weather, rng,
    );
    let mut app = WatchApp::new(board, watch_config, WAKE_PINS);

    let outcome = app.run_cycle(cause, &retained::load());
    retained::store(app.retained_record());
    app.finish();

    let plan = app.wake_plan();
    drop(app);

    match outcome {
        CycleOutcome::Restart => {
            info!("ota: restarting into the new image");
            esp_hal::system::software_reset()
        }
        CycleOutcome::Sleep => power::enter_deep_sleep(plan),
    }
}
