//! Wake-cause classification.

use log::{debug, info};

use crate::{
    clock::{Clock, TimeKeeper},
    input::Button,
    sensors::MotionSensor,
};

/// Hardware-reported reason the chip left deep sleep.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WakeCause {
    /// Sleep timer expired.
    Timer,
    /// Single-pin wake from the RTC interrupt line.
    RtcAlarm,
    /// Multi-pin wake; `mask` has one bit per GPIO that was high.
    ExternalPins { mask: u64 },
    /// Power-on, reset, or anything the board could not attribute.
    Other,
}

/// Which GPIO bit in an external-pin mask belongs to which source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WakePins {
    pub menu: u64,
    pub back: u64,
    pub up: u64,
    pub down: u64,
    pub accel: u64,
}

impl WakePins {
    pub const fn from_gpios(menu: u8, back: u8, up: u8, down: u8, accel: u8) -> Self {
        Self {
            menu: 1u64 << menu,
            back: 1u64 << back,
            up: 1u64 << up,
            down: 1u64 << down,
            accel: 1u64 << accel,
        }
    }

    pub const fn buttons(&self) -> u64 {
        self.menu | self.back | self.up | self.down
    }

    pub const fn all(&self) -> u64 {
        self.buttons() | self.accel
    }

    /// Highest-priority button in `mask`: Menu, Back, Up, Down.
    fn button_in(&self, mask: u64) -> Option<Button> {
        [
            (self.menu, Button::Menu),
            (self.back, Button::Back),
            (self.up, Button::Up),
            (self.down, Button::Down),
        ]
        .into_iter()
        .find(|(bit, _)| mask & bit != 0)
        .map(|(_, button)| button)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimingMode {
    /// Minute ticks come from the external clock alarm.
    #[default]
    RtcAlarm,
    /// Minute ticks come from the chip's own sleep timer.
    FreeRunning,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WakeEvent {
    TimerTick,
    AlarmTick,
    ButtonMenu,
    ButtonBack,
    ButtonUp,
    ButtonDown,
    AccelTilt,
    AccelDoubleTap,
    ColdStart,
    /// External-pin wake with nothing to attribute it to.
    Spurious,
}

impl WakeEvent {
    pub const fn from_button(button: Button) -> Self {
        match button {
            Button::Menu => Self::ButtonMenu,
            Button::Back => Self::ButtonBack,
            Button::Up => Self::ButtonUp,
            Button::Down => Self::ButtonDown,
        }
    }

    /// Wakes that came in through the external-pin source.
    pub const fn is_external(self) -> bool {
        matches!(
            self,
            Self::ButtonMenu
                | Self::ButtonBack
                | Self::ButtonUp
                | Self::ButtonDown
                | Self::AccelTilt
                | Self::AccelDoubleTap
                | Self::Spurious
        )
    }
}

/// Turns a wake cause into exactly one [`WakeEvent`], performing the latch clears the
/// cause requires.
#[derive(Clone, Copy, Debug)]
pub struct WakeClassifier {
    pins: WakePins,
    mode: TimingMode,
}

impl WakeClassifier {
    pub const fn new(pins: WakePins, mode: TimingMode) -> Self {
        Self { pins, mode }
    }

    pub const fn pins(&self) -> WakePins {
        self.pins
    }

    pub const fn mode(&self) -> TimingMode {
        self.mode
    }

    pub fn classify<C, M>(
        &self,
        cause: WakeCause,
        time: &mut TimeKeeper,
        clock: &mut C,
        motion: &mut M,
    ) -> WakeEvent
    where
        C: Clock,
        M: MotionSensor,
    {
        let event = match cause {
            WakeCause::RtcAlarm => {
                time.clear_alarm(clock);
                WakeEvent::AlarmTick
            }
            WakeCause::Timer if self.mode == TimingMode::FreeRunning => WakeEvent::TimerTick,
            WakeCause::Timer => {
                info!("wake: timer wake without free-running timing");
                WakeEvent::ColdStart
            }
            WakeCause::ExternalPins { mask } => self.classify_mask(mask, motion),
            WakeCause::Other => WakeEvent::ColdStart,
        };

        debug!("wake: cause={:?} event={:?}", cause, event);
        event
    }

    fn classify_mask<M: MotionSensor>(&self, mask: u64, motion: &mut M) -> WakeEvent {
        if let Some(button) = self.pins.button_in(mask) {
            return WakeEvent::from_button(button);
        }

        if mask & self.pins.accel == 0 {
            return WakeEvent::Spurious;
        }

        // The latch read must come first; the event checks report what it captured.
        if !motion.clear_interrupt_latch() {
            return WakeEvent::Spurious;
        }
        if motion.is_tilt_event() {
            WakeEvent::AccelTilt
        } else if motion.is_double_tap_event() {
            WakeEvent::AccelDoubleTap
        } else {
            WakeEvent::Spurious
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;
    use crate::{
        clock::TimeSnapshot,
        sensors::{Acceleration, SensorErrorFlags},
    };

    const PINS: WakePins = WakePins::from_gpios(26, 25, 32, 4, 14);

    #[derive(Default)]
    struct CountingClock {
        alarm_clears: u32,
    }

    impl Clock for CountingClock {
        type Error = Infallible;

        fn read(&mut self) -> Result<TimeSnapshot, Self::Error> {
            Ok(TimeSnapshot::default())
        }

        fn write(&mut self, _: TimeSnapshot, _: u32) -> Result<(), Self::Error> {
            Ok(())
        }

        fn arm_alarm(&mut self, _: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn clear_alarm_flag(&mut self) -> Result<(), Self::Error> {
            self.alarm_clears += 1;
            Ok(())
        }

        fn raw_temperature(&mut self) -> Result<i16, Self::Error> {
            Ok(21)
        }
    }

    #[derive(Default)]
    struct LatchedMotion {
        latched: bool,
        tilt: bool,
        double_tap: bool,
        latch_reads: u32,
        captured: Option<(bool, bool)>,
    }

    impl MotionSensor for LatchedMotion {
        type Error = Infallible;

        fn configure(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn clear_interrupt_latch(&mut self) -> bool {
            self.latch_reads += 1;
            let was = self.latched;
            self.captured = was.then_some((self.tilt, self.double_tap));
            self.latched = false;
            was
        }

        fn is_tilt_event(&self) -> bool {
            self.captured.is_some_and(|(tilt, _)| tilt)
        }

        fn is_double_tap_event(&self) -> bool {
            self.captured.is_some_and(|(_, tap)| tap)
        }

        fn step_count(&mut self) -> Result<u32, Self::Error> {
            Ok(0)
        }

        fn raw_acceleration(&mut self) -> Result<Acceleration, Self::Error> {
            Ok(Acceleration::default())
        }

        fn last_error_flags(&mut self) -> Result<SensorErrorFlags, Self::Error> {
            Ok(SensorErrorFlags::default())
        }

        fn temperature_celsius(&mut self) -> Result<i16, Self::Error> {
            Ok(0)
        }
    }

    fn classify(cause: WakeCause, mode: TimingMode, motion: &mut LatchedMotion) -> (WakeEvent, u32) {
        let classifier = WakeClassifier::new(PINS, mode);
        let mut clock = CountingClock::default();
        let mut time = TimeKeeper::default();
        let event = classifier.classify(cause, &mut time, &mut clock, motion);
        (event, clock.alarm_clears)
    }

    #[test]
    fn buttons_win_in_fixed_priority_order() {
        let mut motion = LatchedMotion::default();
        let all = PINS.all();
        let (event, _) = classify(WakeCause::ExternalPins { mask: all }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::ButtonMenu);

        let mask = PINS.up | PINS.down | PINS.accel;
        let (event, _) = classify(WakeCause::ExternalPins { mask }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::ButtonUp);
        assert_eq!(motion.latch_reads, 0);

        let mask = PINS.back | PINS.down;
        let (event, _) = classify(WakeCause::ExternalPins { mask }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::ButtonBack);
    }

    #[test]
    fn accelerometer_wake_reads_latch_before_deciding() {
        let mut motion = LatchedMotion {
            latched: true,
            double_tap: true,
            ..LatchedMotion::default()
        };
        let mask = PINS.accel;
        let (event, _) = classify(WakeCause::ExternalPins { mask }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::AccelDoubleTap);
        assert_eq!(motion.latch_reads, 1);
        assert!(!motion.latched);

        let mut motion = LatchedMotion {
            latched: true,
            tilt: true,
            double_tap: true,
            ..LatchedMotion::default()
        };
        let (event, _) = classify(WakeCause::ExternalPins { mask }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::AccelTilt);
    }

    #[test]
    fn unattributable_external_wake_is_spurious() {
        let mut motion = LatchedMotion::default();
        let mask = PINS.accel;
        let (event, _) = classify(WakeCause::ExternalPins { mask }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::Spurious);

        let (event, _) = classify(WakeCause::ExternalPins { mask: 1 << 2 }, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::Spurious);
    }

    #[test]
    fn alarm_wake_clears_flag_exactly_once() {
        let mut motion = LatchedMotion::default();
        let (event, clears) = classify(WakeCause::RtcAlarm, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::AlarmTick);
        assert_eq!(clears, 1);
    }

    #[test]
    fn timer_is_a_tick_only_when_free_running() {
        let mut motion = LatchedMotion::default();
        let (event, clears) = classify(WakeCause::Timer, TimingMode::FreeRunning, &mut motion);
        assert_eq!(event, WakeEvent::TimerTick);
        assert_eq!(clears, 0);

        let (event, _) = classify(WakeCause::Timer, TimingMode::RtcAlarm, &mut motion);
        assert_eq!(event, WakeEvent::ColdStart);

        let (event, _) = classify(WakeCause::Other, TimingMode::FreeRunning, &mut motion);
        assert_eq!(event, WakeEvent::ColdStart);
    }
}
