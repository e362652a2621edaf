use core::time::Duration;

use esp_hal::{
    gpio::RtcPin,
    peripherals::{GPIO4, GPIO14, GPIO25, GPIO26, GPIO27, GPIO32, LPWR},
    rtc_cntl::{
        Rtc, SleepSource,
        sleep::{Ext0WakeupSource, Ext1WakeupSource, TimerWakeupSource, WakeSource, WakeupLevel},
        wakeup_cause,
    },
};
use heapless::Vec;
use log::info;
use storms_core::{power::WakePlan, wake::WakeCause};
use storms_hal_esp32::platform::wake::gpio_mask_from_rtcio_status;

use super::{ACC_INT_GPIO, BACK_GPIO, DOWN_GPIO, MENU_GPIO, RTC_INT_GPIO, UP_GPIO};

/// What woke the chip, with ext1 pads translated to GPIO bits.
pub(super) fn wake_cause() -> WakeCause {
    match wakeup_cause() {
        SleepSource::Ext0 => WakeCause::RtcAlarm,
        SleepSource::Ext1 => {
            let status = LPWR::regs().ext_wakeup1_status().read().bits();
            WakeCause::ExternalPins {
                mask: gpio_mask_from_rtcio_status(status),
            }
        }
        SleepSource::Timer => WakeCause::Timer,
        _ => WakeCause::Other,
    }
}

pub(super) fn enter_deep_sleep(plan: WakePlan) -> ! {
    let mut rtc = Rtc::new(unsafe { LPWR::steal() });

    let mut menu = unsafe { GPIO26::steal() };
    let mut back = unsafe { GPIO25::steal() };
    let mut up = unsafe { GPIO32::steal() };
    let mut down = unsafe { GPIO4::steal() };
    let mut accel = unsafe { GPIO14::steal() };

    let candidates: [(u8, &mut dyn RtcPin); 5] = [
        (MENU_GPIO, &mut menu),
        (BACK_GPIO, &mut back),
        (UP_GPIO, &mut up),
        (DOWN_GPIO, &mut down),
        (ACC_INT_GPIO, &mut accel),
    ];
    let mut ext1_pins: Vec<&mut dyn RtcPin, 5> = Vec::new();
    for (gpio, pin) in candidates {
        if plan.any_high_mask & (1u64 << gpio) != 0 {
            let _ = ext1_pins.push(pin);
        }
    }

    let ext1 = Ext1WakeupSource::new(ext1_pins.as_mut_slice(), WakeupLevel::High);
    let ext0 = Ext0WakeupSource::new(unsafe { GPIO27::steal() }, WakeupLevel::Low);
    let timer = plan
        .timer_secs
        .map(|secs| TimerWakeupSource::new(Duration::from_secs(secs)));

    let mut sources: Vec<&dyn WakeSource, 3> = Vec::new();
    let _ = sources.push(&ext1);
    if plan.rtc_alarm_low {
        let _ = sources.push(&ext0);
    }
    if let Some(timer) = timer.as_ref() {
        let _ = sources.push(timer);
    }

    info!(
        "sleep: ext1_mask={:#x} rtc_alarm_gpio{}={} timer={:?}",
        plan.any_high_mask, RTC_INT_GPIO, plan.rtc_alarm_low, plan.timer_secs
    );
    rtc.sleep_deep(&sources);
}
