//! Wake sources to arm before the next deep sleep.

use crate::wake::{TimingMode, WakePins};

/// Sleep-timer period used when minute ticks come from the chip itself.
pub const FREE_RUNNING_TICK_SECS: u64 = 60;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WakePlan {
    /// GPIOs that wake the chip when any of them goes high.
    pub any_high_mask: u64,
    /// Wake when the clock's interrupt line goes low.
    pub rtc_alarm_low: bool,
    pub timer_secs: Option<u64>,
}

impl WakePlan {
    pub const fn for_mode(pins: WakePins, mode: TimingMode) -> Self {
        match mode {
            TimingMode::RtcAlarm => Self {
                any_high_mask: pins.all(),
                rtc_alarm_low: true,
                timer_secs: None,
            },
            TimingMode::FreeRunning => Self {
                any_high_mask: pins.all(),
                rtc_alarm_low: false,
                timer_secs: Some(FREE_RUNNING_TICK_SECS),
            },
        }
    }
}
