//! Wake dispatch: menu controller, screen entries, and the bounded polling loops.

use log::{debug, info, warn};

use crate::{
    board::Board,
    clock::{TimeKeeper, TimeSnapshot},
    editor::{DigitEditor, EditStep},
    firmware::{FirmwareTransport, FirmwareUpdateSession, FirmwareView, SessionControl},
    input::{Button, ButtonPoller},
    menu::MenuItem,
    power::WakePlan,
    render::{AccelView, Display, FaceSnapshot, RefreshKind, Screen},
    retained::{GuiState, RETAINED_RECORD_LEN, RetainedState},
    sensors::{MotionSensor, Orientation, battery_segments},
    wake::{TimingMode, WakeCause, WakeClassifier, WakeEvent, WakePins},
    weather::{TemperatureUnit, WeatherSnapshot},
};

const VERSES: [&str; 3] = [
    "Count it all joy my brothers when you face various trials and temptations. James 1.2",
    "No temptation has overtaken you, except that is common to man. 1 Cor. 10.13",
    "Submit yourselves therefore to God. Resist the Devil and he will flee from you. \
     Come near to God and He will come near you. James 4.7",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WatchConfig {
    pub fast_idle_timeout_ms: u64,
    pub poll_interval_ms: u32,
    /// Set-time and accelerometer screens give up after this long without a press.
    pub app_idle_timeout_ms: u64,
    pub set_time_fudge_secs: u32,
    pub cold_start_fudge_secs: u32,
    pub accel_refresh_ms: u64,
    /// Time between cursor blink frames on the set-time screen.
    pub edit_blink_ms: u64,
    pub ota_poll_interval_ms: u32,
    pub ota_reboot_grace_ms: u32,
    pub ota_exit_grace_ms: u32,
    pub buzz_interval_ms: u32,
    pub buzz_toggles: u8,
    /// Watch-face draws between weather condition refreshes.
    pub weather_update_interval: u16,
    pub temperature_unit: TemperatureUnit,
    pub dark_mode: bool,
    pub ota_device_name: &'static str,
    pub timing: TimingMode,
    /// Written to the clock on cold start, when present.
    pub initial_time: Option<TimeSnapshot>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            fast_idle_timeout_ms: 5_000,
            poll_interval_ms: 10,
            app_idle_timeout_ms: 60_000,
            set_time_fudge_secs: 10,
            cold_start_fudge_secs: 30,
            accel_refresh_ms: 200,
            edit_blink_ms: 300,
            ota_poll_interval_ms: 100,
            ota_reboot_grace_ms: 2_000,
            ota_exit_grace_ms: 1_000,
            buzz_interval_ms: 100,
            buzz_toggles: 20,
            weather_update_interval: 30,
            temperature_unit: TemperatureUnit::Imperial,
            dark_mode: false,
            ota_device_name: "Watchy BLE OTA",
            timing: TimingMode::RtcAlarm,
            initial_time: None,
        }
    }
}

/// How a wake cycle ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CycleOutcome {
    Sleep,
    /// A new image was installed; reset the chip instead of sleeping.
    Restart,
}

/// Result of one dispatched event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    /// Back to the watch face; stop polling and sleep.
    Leave,
    Restart,
}

pub struct WatchApp<B>
where
    B: Board,
{
    board: B,
    config: WatchConfig,
    classifier: WakeClassifier,
    time: TimeKeeper,
    state: RetainedState,
    display_ready: bool,
}

include!("dispatch.rs");
include!("screens.rs");
include!("fast_input.rs");
include!("apps.rs");

#[cfg(test)]
mod tests;
