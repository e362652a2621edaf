use embedded_hal::delay::DelayNs;
use embedded_hal_bus::{i2c::CriticalSectionDevice, spi::ExclusiveDevice};
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcPin},
    delay::Delay,
    gpio::{Input, Output},
    i2c::master::I2c,
    peripherals::{ADC1, GPIO34},
    rng::Rng,
    spi::master::Spi,
    time::Instant,
};
use log::warn;
use storms_core::{board::Board, firmware::DetachedTransport, weather::SimulatedWeather};
use storms_hal_esp32::{
    clock::ds3231::Ds3231,
    haptics::motor::VibrationMotor,
    input::buttons::WatchButtons,
    motion::bma423::Bma423,
    platform::display::EpaperDisplay,
    power::battery::millivolts_from_raw,
    render::WatchRenderer,
};

type SharedI2c = CriticalSectionDevice<'static, I2c<'static, Blocking>>;
type PanelSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;

pub(super) type WatchDisplay = EpaperDisplay<
    PanelSpi,
    Output<'static>,
    Output<'static>,
    Input<'static>,
    Delay,
    WatchRenderer,
>;
pub(super) type WatchClock = Ds3231<SharedI2c>;
pub(super) type WatchMotion = Bma423<SharedI2c, Delay>;
pub(super) type WatchInputs =
    WatchButtons<Input<'static>, Input<'static>, Input<'static>, Input<'static>>;

/// Battery sense divider on ADC1.
pub(super) struct BatteryMonitor {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    pin: AdcPin<GPIO34<'static>, ADC1<'static>>,
}

impl BatteryMonitor {
    pub(super) fn new(
        adc: Adc<'static, ADC1<'static>, Blocking>,
        pin: AdcPin<GPIO34<'static>, ADC1<'static>>,
    ) -> Self {
        Self { adc, pin }
    }

    fn millivolts(&mut self) -> u16 {
        match nb::block!(self.adc.read_oneshot(&mut self.pin)) {
            Ok(raw) => millivolts_from_raw(raw),
            Err(()) => {
                warn!("battery: adc read failed");
                0
            }
        }
    }
}

/// Watchy v1 peripherals behind the core's collaborator traits.
pub(super) struct WatchyBoard {
    display: WatchDisplay,
    clock: WatchClock,
    motion: WatchMotion,
    buttons: WatchInputs,
    transport: DetachedTransport,
    weather: SimulatedWeather,
    motor: VibrationMotor<Output<'static>>,
    battery: BatteryMonitor,
    rng: Rng,
    delay: Delay,
    boot: Instant,
}

impl WatchyBoard {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        display: WatchDisplay,
        clock: WatchClock,
        motion: WatchMotion,
        buttons: WatchInputs,
        motor: VibrationMotor<Output<'static>>,
        battery: BatteryMonitor,
        weather: SimulatedWeather,
        rng: Rng,
    ) -> Self {
        Self {
            display,
            clock,
            motion,
            buttons,
            transport: DetachedTransport,
            weather,
            motor,
            battery,
            rng,
            delay: Delay::new(),
            boot: Instant::now(),
        }
    }
}

impl Board for WatchyBoard {
    type Display = WatchDisplay;
    type Clock = WatchClock;
    type Motion = WatchMotion;
    type Buttons = WatchInputs;
    type Transport = DetachedTransport;
    type Weather = SimulatedWeather;

    fn display(&mut self) -> &mut Self::Display {
        &mut self.display
    }

    fn clock(&mut self) -> &mut Self::Clock {
        &mut self.clock
    }

    fn motion(&mut self) -> &mut Self::Motion {
        &mut self.motion
    }

    fn buttons(&mut self) -> &mut Self::Buttons {
        &mut self.buttons
    }

    fn transport(&mut self) -> &mut Self::Transport {
        &mut self.transport
    }

    fn weather(&mut self) -> &mut Self::Weather {
        &mut self.weather
    }

    fn clock_and_motion(&mut self) -> (&mut Self::Clock, &mut Self::Motion) {
        (&mut self.clock, &mut self.motion)
    }

    fn battery_millivolts(&mut self) -> u16 {
        self.battery.millivolts()
    }

    fn vibrate(&mut self, interval_ms: u32, toggles: u8) {
        if let Err(err) = self.motor.pulse(&mut self.delay, interval_ms, toggles) {
            warn!("haptics: motor pulse failed: {:?}", err);
        }
    }

    fn random_below(&mut self, bound: u32) -> u32 {
        self.rng.random() % bound.max(1)
    }

    fn now_ms(&self) -> u64 {
        self.boot.elapsed().as_millis()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
