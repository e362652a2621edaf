//! Everything the dispatch layer needs from the hardware, behind one seam.

use crate::{
    clock::Clock,
    firmware::FirmwareTransport,
    input::ButtonPoller,
    render::Display,
    sensors::MotionSensor,
    weather::WeatherSource,
};

pub trait Board {
    type Display: Display;
    type Clock: Clock;
    type Motion: MotionSensor;
    type Buttons: ButtonPoller;
    type Transport: FirmwareTransport;
    type Weather: WeatherSource;

    fn display(&mut self) -> &mut Self::Display;
    fn clock(&mut self) -> &mut Self::Clock;
    fn motion(&mut self) -> &mut Self::Motion;
    fn buttons(&mut self) -> &mut Self::Buttons;
    fn transport(&mut self) -> &mut Self::Transport;
    fn weather(&mut self) -> &mut Self::Weather;

    /// Both I2C peripherals at once, for wake classification.
    fn clock_and_motion(&mut self) -> (&mut Self::Clock, &mut Self::Motion);

    fn battery_millivolts(&mut self) -> u16;
    /// Toggles the motor `toggles` times, `interval_ms` apart, and leaves it off.
    fn vibrate(&mut self, interval_ms: u32, toggles: u8);
    /// Uniform in `0..bound`.
    fn random_below(&mut self, bound: u32) -> u32;

    /// Milliseconds since this wake.
    fn now_ms(&self) -> u64;
    fn delay_ms(&mut self, ms: u32);
}
