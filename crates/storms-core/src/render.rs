//! Screen view models handed to the display, and the display contract.

use crate::{
    clock::TimeSnapshot,
    editor::EditorView,
    firmware::FirmwareView,
    menu::MenuIndex,
    sensors::{Acceleration, Orientation, SensorErrorFlags},
    weather::WeatherSnapshot,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshKind {
    Full,
    Partial,
}

impl RefreshKind {
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Partial)
    }

    pub const fn from_partial(partial: bool) -> Self {
        if partial { Self::Partial } else { Self::Full }
    }
}

/// Everything the watch face shows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaceSnapshot {
    pub time: TimeSnapshot,
    pub steps: u32,
    pub weather: WeatherSnapshot,
    /// Accelerometer die temperature in the weather unit.
    pub sensor_temperature: Option<i16>,
    /// 0..=3
    pub battery_segments: u8,
    pub wifi_configured: bool,
    pub ble_configured: bool,
    pub dark_mode: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccelView {
    /// `None` when the sensor read failed.
    pub reading: Option<Acceleration>,
    pub orientation: Option<Orientation>,
    pub errors: Option<SensorErrorFlags>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    WatchFace(FaceSnapshot),
    Menu { selected: MenuIndex },
    Battery { millivolts: u16 },
    Buzz,
    Accelerometer(AccelView),
    SetTime(EditorView),
    Verse { text: &'static str },
    FirmwareInstructions,
    Firmware(FirmwareView),
}

/// E-paper panel as the dispatch layer sees it.
pub trait Display {
    type Error: core::fmt::Debug;

    /// Wakes the panel. With `full_refresh_suppressed` the controller keeps its previous
    /// image so a partial update can follow.
    fn init(&mut self, full_refresh_suppressed: bool) -> Result<(), Self::Error>;
    fn draw(&mut self, screen: &Screen) -> Result<(), Self::Error>;
    /// Pushes the drawn frame. The panel may upgrade a partial request to a full one.
    fn commit(&mut self, partial: bool) -> Result<RefreshKind, Self::Error>;
    fn hibernate(&mut self) -> Result<(), Self::Error>;
}
