use core::convert::Infallible;
use std::{cell::Cell, rc::Rc, string::String};

use super::*;
use crate::{
    clock::Clock,
    firmware::TransferStatus,
    input::Debounce,
    menu::{MENU_LENGTH, MenuIndex},
    sensors::{Acceleration, SensorErrorFlags},
    weather::WeatherSource,
};

const PINS: WakePins = WakePins::from_gpios(26, 25, 32, 4, 14);

type Millis = Rc<Cell<u64>>;

#[derive(Default)]
struct RecordingDisplay {
    inits: Vec<bool>,
    pending: Option<Screen>,
    frames: Vec<(Screen, RefreshKind)>,
    hibernations: u32,
    /// Simulated panel refresh time; each commit blocks this long.
    commit_ms: u64,
    millis: Millis,
}

impl Display for RecordingDisplay {
    type Error = Infallible;

    fn init(&mut self, full_refresh_suppressed: bool) -> Result<(), Self::Error> {
        self.inits.push(full_refresh_suppressed);
        Ok(())
    }

    fn draw(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        self.pending = Some(*screen);
        Ok(())
    }

    fn commit(&mut self, partial: bool) -> Result<RefreshKind, Self::Error> {
        let kind = RefreshKind::from_partial(partial);
        self.millis.set(self.millis.get() + self.commit_ms);
        if let Some(screen) = self.pending.take() {
            self.frames.push((screen, kind));
        }
        Ok(kind)
    }

    fn hibernate(&mut self) -> Result<(), Self::Error> {
        self.hibernations += 1;
        Ok(())
    }
}

struct FakeClock {
    now: TimeSnapshot,
    writes: Vec<(TimeSnapshot, u32)>,
    alarm_flag: bool,
    alarm_clears: u32,
    armed: Vec<u8>,
    fail_reads: bool,
    celsius: i16,
}

impl FakeClock {
    fn at(now: TimeSnapshot) -> Self {
        Self {
            now,
            writes: Vec::new(),
            alarm_flag: false,
            alarm_clears: 0,
            armed: Vec::new(),
            fail_reads: false,
            celsius: 20,
        }
    }
}

impl Clock for FakeClock {
    type Error = ();

    fn read(&mut self) -> Result<TimeSnapshot, Self::Error> {
        if self.fail_reads { Err(()) } else { Ok(self.now) }
    }

    fn write(&mut self, time: TimeSnapshot, fudge_secs: u32) -> Result<(), Self::Error> {
        self.writes.push((time, fudge_secs));
        self.now = time.plus_seconds(fudge_secs);
        Ok(())
    }

    fn arm_alarm(&mut self, period_minutes: u8) -> Result<(), Self::Error> {
        self.armed.push(period_minutes);
        Ok(())
    }

    fn clear_alarm_flag(&mut self) -> Result<(), Self::Error> {
        self.alarm_clears += 1;
        self.alarm_flag = false;
        Ok(())
    }

    fn raw_temperature(&mut self) -> Result<i16, Self::Error> {
        Ok(self.celsius)
    }
}

#[derive(Default)]
struct FakeMotion {
    latched: bool,
    tilt: bool,
    double_tap: bool,
    captured: (bool, bool),
    steps: u32,
    configure_fails: bool,
    configured: u32,
    acceleration: Acceleration,
}

impl MotionSensor for FakeMotion {
    type Error = ();

    fn configure(&mut self) -> Result<(), Self::Error> {
        self.configured += 1;
        if self.configure_fails { Err(()) } else { Ok(()) }
    }

    fn clear_interrupt_latch(&mut self) -> bool {
        let was = self.latched;
        self.captured = if was { (self.tilt, self.double_tap) } else { (false, false) };
        self.latched = false;
        was
    }

    fn is_tilt_event(&self) -> bool {
        self.captured.0
    }

    fn is_double_tap_event(&self) -> bool {
        self.captured.1
    }

    fn step_count(&mut self) -> Result<u32, Self::Error> {
        Ok(self.steps)
    }

    fn raw_acceleration(&mut self) -> Result<Acceleration, Self::Error> {
        Ok(self.acceleration)
    }

    fn last_error_flags(&mut self) -> Result<SensorErrorFlags, Self::Error> {
        Ok(SensorErrorFlags::default())
    }

    fn temperature_celsius(&mut self) -> Result<i16, Self::Error> {
        Ok(24)
    }
}

/// Delivers each scripted press once the simulated clock reaches its timestamp.
///
/// With `holds` set, the lines are instead held high over `[from, to)` windows and sampled
/// through the same debouncer the board poller uses.
struct ScriptedButtons {
    millis: Millis,
    script: Vec<(u64, Button)>,
    cursor: usize,
    configured: u32,
    holds: Vec<(u64, u64, Button)>,
    debounce: [Debounce; 4],
}

impl ScriptedButtons {
    fn held(&self, button: Button) -> bool {
        let now = self.millis.get();
        self.holds
            .iter()
            .any(|&(from, to, held)| held == button && (from..to).contains(&now))
    }
}

impl ButtonPoller for ScriptedButtons {
    type Error = ();

    fn configure_inputs(&mut self) -> Result<(), Self::Error> {
        self.configured += 1;
        self.debounce = Button::ALL.map(|button| Debounce::seeded(self.held(button)));
        Ok(())
    }

    fn poll_press(&mut self) -> Result<Option<Button>, Self::Error> {
        if !self.holds.is_empty() {
            let levels = Button::ALL.map(|button| self.held(button));
            let mut press = None;
            for ((state, pressed), button) in self.debounce.iter_mut().zip(levels).zip(Button::ALL)
            {
                if state.sample(pressed, 2) && press.is_none() {
                    press = Some(button);
                }
            }
            return Ok(press);
        }

        let Some(&(at_ms, button)) = self.script.get(self.cursor) else {
            return Ok(None);
        };
        if self.millis.get() < at_ms {
            return Ok(None);
        }
        self.cursor += 1;
        Ok(Some(button))
    }
}

#[derive(Default)]
struct ScriptedTransport {
    script: Vec<(TransferStatus, u32)>,
    cursor: usize,
    bytes: u32,
    started: Option<String>,
    stopped: bool,
}

impl FirmwareTransport for ScriptedTransport {
    type Error = ();

    fn start(&mut self, device_name: &str) -> Result<(), Self::Error> {
        self.started = Some(device_name.into());
        Ok(())
    }

    fn poll_status(&mut self) -> TransferStatus {
        let (status, bytes) = self
            .script
            .get(self.cursor)
            .copied()
            .unwrap_or((TransferStatus::Disconnected, 0));
        self.cursor += 1;
        self.bytes = bytes;
        status
    }

    fn bytes_transferred(&self) -> u32 {
        self.bytes
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

struct FixedWeather(i16);

impl WeatherSource for FixedWeather {
    fn condition_code(&mut self) -> Option<i16> {
        Some(self.0)
    }
}

struct FakeBoard {
    display: RecordingDisplay,
    clock: FakeClock,
    motion: FakeMotion,
    buttons: ScriptedButtons,
    transport: ScriptedTransport,
    weather: FixedWeather,
    millis: Millis,
    battery_mv: u16,
    vibrations: Vec<(u32, u8)>,
    random: u32,
    delays: Vec<u32>,
}

impl FakeBoard {
    fn new() -> Self {
        let millis: Millis = Rc::new(Cell::new(0));
        Self {
            display: RecordingDisplay {
                millis: millis.clone(),
                ..RecordingDisplay::default()
            },
            clock: FakeClock::at(TimeSnapshot::from_calendar(2024, 6, 15, 12, 30, 45)),
            motion: FakeMotion::default(),
            buttons: ScriptedButtons {
                millis: millis.clone(),
                script: Vec::new(),
                cursor: 0,
                configured: 0,
                holds: Vec::new(),
                debounce: [Debounce::default(); 4],
            },
            transport: ScriptedTransport::default(),
            weather: FixedWeather(800),
            millis,
            battery_mv: 4_000,
            vibrations: Vec::new(),
            random: 1,
            delays: Vec::new(),
        }
    }

    fn with_presses(mut self, script: &[(u64, Button)]) -> Self {
        self.buttons.script = script.to_vec();
        self
    }

    /// Buttons held for `hold_ms` from each start time, and a panel that blocks per refresh.
    fn with_taps(mut self, taps: &[(u64, Button)], hold_ms: u64, commit_ms: u64) -> Self {
        self.buttons.holds = taps
            .iter()
            .map(|&(from, button)| (from, from + hold_ms, button))
            .collect();
        self.display.commit_ms = commit_ms;
        self
    }
}

impl Board for FakeBoard {
    type Display = RecordingDisplay;
    type Clock = FakeClock;
    type Motion = FakeMotion;
    type Buttons = ScriptedButtons;
    type Transport = ScriptedTransport;
    type Weather = FixedWeather;

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
        self.battery_mv
    }

    fn vibrate(&mut self, interval_ms: u32, toggles: u8) {
        self.vibrations.push((interval_ms, toggles));
    }

    fn random_below(&mut self, bound: u32) -> u32 {
        self.random % bound
    }

    fn now_ms(&self) -> u64 {
        self.millis.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.millis.set(self.millis.get() + ms as u64);
    }
}

fn menu(index: u8) -> MenuIndex {
    MenuIndex::new(index).unwrap()
}

fn app_in(board: FakeBoard, gui: GuiState, index: u8) -> WatchApp<FakeBoard> {
    app_with_config(board, WatchConfig::default(), gui, index)
}

fn app_with_config(
    board: FakeBoard,
    config: WatchConfig,
    gui: GuiState,
    index: u8,
) -> WatchApp<FakeBoard> {
    let mut app = WatchApp::new(board, config, PINS);
    let mut state = app.default_state();
    state.gui = gui;
    state.menu = menu(index);
    app.restore(state);
    app
}

fn frames(app: &WatchApp<FakeBoard>) -> &[(Screen, RefreshKind)] {
    &app.board().display.frames
}

#[test]
fn menu_wake_on_face_opens_menu_with_one_full_render() {
    let mut app = app_in(FakeBoard::new(), GuiState::WatchFace, 2);

    assert_eq!(app.handle_wake(WakeEvent::ButtonMenu), CycleOutcome::Sleep);

    assert_eq!(app.state().gui, GuiState::MainMenu);
    assert_eq!(app.state().menu, menu(2));
    assert_eq!(
        frames(&app),
        &[(Screen::Menu { selected: menu(2) }, RefreshKind::Full)]
    );
    // The fast-input window ran out before sleeping.
    assert!(app.board().now_ms() > 5_000);
}

#[test]
fn down_on_last_item_wraps_to_first_with_partial_render() {
    let last = MENU_LENGTH as u8 - 1;
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, last);

    app.handle_wake(WakeEvent::ButtonDown);

    assert_eq!(app.state().menu, MenuIndex::FIRST);
    assert_eq!(
        frames(&app),
        &[(Screen::Menu { selected: MenuIndex::FIRST }, RefreshKind::Partial)]
    );
}

#[test]
fn up_on_first_item_wraps_to_last() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 0);
    app.dispatch(WakeEvent::ButtonUp);
    assert_eq!(app.state().menu, MenuIndex::LAST);
}

#[test]
fn unlisted_event_and_state_pairs_change_nothing() {
    use GuiState::*;
    use WakeEvent::*;

    let handled = [
        (TimerTick, WatchFace),
        (AlarmTick, WatchFace),
        (ButtonMenu, WatchFace),
        (ButtonMenu, MainMenu),
        (ButtonMenu, FirmwareUpdate),
        (ButtonBack, MainMenu),
        (ButtonBack, App),
        (ButtonBack, FirmwareUpdate),
        (ButtonUp, MainMenu),
        (ButtonDown, MainMenu),
        (AccelTilt, WatchFace),
        (AccelDoubleTap, WatchFace),
    ];
    let events = [
        TimerTick,
        AlarmTick,
        ButtonMenu,
        ButtonBack,
        ButtonUp,
        ButtonDown,
        AccelTilt,
        AccelDoubleTap,
        ColdStart,
        Spurious,
    ];

    let mut checked = 0;
    for event in events {
        for gui in [WatchFace, MainMenu, App, FirmwareUpdate] {
            if handled.contains(&(event, gui)) {
                continue;
            }
            let mut app = app_in(FakeBoard::new(), gui, 3);
            let before = app.state();

            assert_eq!(app.dispatch(event), Flow::Continue);
            assert_eq!(app.state(), before, "{event:?} in {gui:?}");
            assert!(frames(&app).is_empty(), "{event:?} in {gui:?} drew");
            assert!(app.board().clock.writes.is_empty());
            checked += 1;
        }
    }
    assert_eq!(checked, events.len() * 4 - handled.len());
}

#[test]
fn alarm_wake_clears_flag_before_partial_face() {
    let mut app = app_in(FakeBoard::new(), GuiState::WatchFace, 0);
    app.board_mut().clock.alarm_flag = true;
    let record = app.state().encode();

    assert_eq!(app.run_cycle(WakeCause::RtcAlarm, &record), CycleOutcome::Sleep);

    assert_eq!(app.board().clock.alarm_clears, 1);
    assert!(!app.board().clock.alarm_flag);
    assert_eq!(frames(&app).len(), 1);
    assert!(matches!(
        frames(&app)[0],
        (Screen::WatchFace(_), RefreshKind::Partial)
    ));
    // Ticks never open the fast-input window.
    assert_eq!(app.board().buttons.configured, 0);
    assert_eq!(app.board().now_ms(), 0);
}

#[test]
fn clearing_the_alarm_twice_matches_clearing_once() {
    let mut once = FakeClock::at(TimeSnapshot::default());
    let mut twice = FakeClock::at(TimeSnapshot::default());
    once.alarm_flag = true;
    twice.alarm_flag = true;

    let mut time = TimeKeeper::default();
    time.clear_alarm(&mut once);
    time.clear_alarm(&mut twice);
    time.clear_alarm(&mut twice);

    assert_eq!(once.alarm_flag, twice.alarm_flag);
    assert!(!twice.alarm_flag);
}

#[test]
fn alarm_tick_outside_face_only_clears_the_flag() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 4);
    let record = app.state().encode();

    app.run_cycle(WakeCause::RtcAlarm, &record);

    assert_eq!(app.board().clock.alarm_clears, 1);
    assert!(frames(&app).is_empty());
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn free_running_tick_advances_clock_one_minute() {
    let config = WatchConfig {
        timing: TimingMode::FreeRunning,
        ..WatchConfig::default()
    };
    let mut app = app_with_config(FakeBoard::new(), config, GuiState::WatchFace, 0);
    let record = app.state().encode();

    app.run_cycle(WakeCause::Timer, &record);

    let expected = TimeSnapshot::from_calendar(2024, 6, 15, 12, 31, 0);
    assert_eq!(app.board().clock.writes, vec![(expected, 0)]);
    match frames(&app) {
        [(Screen::WatchFace(face), RefreshKind::Partial)] => assert_eq!(face.time, expected),
        other => panic!("unexpected frames {other:?}"),
    }
}

#[test]
fn back_from_menu_clears_alarm_draws_full_face_and_sleeps() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 1);

    assert_eq!(app.handle_wake(WakeEvent::ButtonBack), CycleOutcome::Sleep);

    assert_eq!(app.state().gui, GuiState::WatchFace);
    assert_eq!(app.board().clock.alarm_clears, 1);
    assert!(matches!(frames(&app), [(Screen::WatchFace(_), RefreshKind::Full)]));
    assert_eq!(app.board().buttons.configured, 0);
}

#[test]
fn fast_input_navigates_until_back_leaves() {
    let board = FakeBoard::new().with_presses(&[
        (1_000, Button::Down),
        (2_000, Button::Down),
        (3_000, Button::Back),
    ]);
    let mut app = app_in(board, GuiState::WatchFace, 0);

    assert_eq!(app.handle_wake(WakeEvent::ButtonMenu), CycleOutcome::Sleep);

    assert_eq!(app.state().gui, GuiState::WatchFace);
    assert_eq!(app.state().menu, menu(2));
    let frames = frames(&app);
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0], (Screen::Menu { selected: menu(0) }, RefreshKind::Full));
    assert_eq!(frames[1], (Screen::Menu { selected: menu(1) }, RefreshKind::Partial));
    assert_eq!(frames[2], (Screen::Menu { selected: menu(2) }, RefreshKind::Partial));
    assert!(matches!(frames[3], (Screen::WatchFace(_), RefreshKind::Full)));
    assert_eq!(app.board().display.inits, vec![true]);
    assert_eq!(app.board().now_ms(), 3_000);
}

#[test]
fn each_press_restarts_the_idle_window() {
    let board = FakeBoard::new().with_presses(&[(4_000, Button::Down), (8_500, Button::Down)]);
    let mut app = app_in(board, GuiState::WatchFace, 0);

    app.handle_wake(WakeEvent::ButtonMenu);

    assert_eq!(app.state().menu, menu(2));
    assert_eq!(app.state().gui, GuiState::MainMenu);
    let now = app.board().now_ms();
    assert!((13_500..13_600).contains(&now), "slept at {now}");
}

#[test]
fn spurious_wake_dispatches_nothing_but_still_polls() {
    let board = FakeBoard::new().with_presses(&[(100, Button::Menu)]);
    let mut app = app_in(board, GuiState::WatchFace, 0);

    app.handle_wake(WakeEvent::Spurious);

    assert_eq!(app.state().gui, GuiState::MainMenu);
    assert_eq!(frames(&app).len(), 1);
}

#[test]
fn set_time_commits_every_field_in_one_write() {
    let board = FakeBoard::new().with_presses(&[
        (50, Button::Down),
        (100, Button::Menu),
        (150, Button::Up),
        (200, Button::Menu),
        (250, Button::Menu),
        (300, Button::Menu),
        (350, Button::Up),
        (400, Button::Menu),
    ]);
    let mut app = app_in(board, GuiState::MainMenu, 3);

    app.handle_wake(WakeEvent::ButtonMenu);

    let committed = TimeSnapshot::from_calendar(2024, 6, 14, 13, 29, 0);
    assert_eq!(app.board().clock.writes, vec![(committed, 10)]);
    assert_eq!(app.state().gui, GuiState::MainMenu);

    let frames = frames(&app);
    assert!(
        frames[..frames.len() - 1]
            .iter()
            .all(|(screen, kind)| matches!(screen, Screen::SetTime(_)) && kind.is_partial())
    );
    assert_eq!(
        frames.last(),
        Some(&(Screen::Menu { selected: menu(3) }, RefreshKind::Full))
    );
}

#[test]
fn set_time_gives_up_without_writing_after_idle_timeout() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 3);

    app.handle_wake(WakeEvent::ButtonMenu);

    assert!(app.board().clock.writes.is_empty());
    assert_eq!(app.state().gui, GuiState::MainMenu);
    assert!(app.board().now_ms() > 60_000);
}

#[test]
fn set_time_catches_short_taps_between_slow_refreshes() {
    let board = FakeBoard::new().with_taps(
        &[
            (1_000, Button::Down),
            (2_000, Button::Menu),
            (3_000, Button::Menu),
            (4_000, Button::Menu),
            (5_000, Button::Menu),
            (6_000, Button::Menu),
        ],
        300,
        250,
    );
    let mut app = app_in(board, GuiState::MainMenu, 3);

    app.handle_wake(WakeEvent::ButtonMenu);

    let committed = TimeSnapshot::from_calendar(2024, 6, 15, 13, 30, 0);
    assert_eq!(app.board().clock.writes, vec![(committed, 10)]);
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn accelerometer_screen_catches_a_short_back_tap() {
    let board = FakeBoard::new().with_taps(&[(1_000, Button::Back)], 300, 250);
    let mut app = app_in(board, GuiState::MainMenu, 2);

    app.handle_wake(WakeEvent::ButtonMenu);

    let back_at = frames(&app)
        .iter()
        .position(|(screen, _)| matches!(screen, Screen::Menu { .. }))
        .unwrap();
    let accel_frames = frames(&app)[..back_at]
        .iter()
        .filter(|(screen, _)| matches!(screen, Screen::Accelerometer(_)))
        .count();
    assert!((2..=4).contains(&accel_frames), "{accel_frames} frames");
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn buzz_pulses_motor_then_returns_to_menu() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 1);

    app.handle_wake(WakeEvent::ButtonMenu);

    assert_eq!(app.board().vibrations, vec![(100, 20)]);
    assert_eq!(
        frames(&app),
        &[
            (Screen::Buzz, RefreshKind::Full),
            (Screen::Menu { selected: menu(1) }, RefreshKind::Full),
        ]
    );
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn battery_screen_then_back_to_menu() {
    let board = FakeBoard::new().with_presses(&[(500, Button::Back)]);
    let mut app = app_in(board, GuiState::MainMenu, 0);

    app.handle_wake(WakeEvent::ButtonMenu);

    assert_eq!(
        frames(&app),
        &[
            (Screen::Battery { millivolts: 4_000 }, RefreshKind::Full),
            (Screen::Menu { selected: menu(0) }, RefreshKind::Full),
        ]
    );
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn double_tap_on_face_shows_a_verse() {
    let mut app = app_in(FakeBoard::new(), GuiState::WatchFace, 0);

    app.dispatch(WakeEvent::AccelDoubleTap);

    assert_eq!(app.state().gui, GuiState::App);
    assert_eq!(
        frames(&app),
        &[(Screen::Verse { text: VERSES[1] }, RefreshKind::Full)]
    );
}

#[test]
fn accelerometer_screen_refreshes_until_back() {
    let mut board = FakeBoard::new().with_presses(&[(1_000, Button::Back)]);
    board.motion.acceleration = Acceleration { x: 12, y: -40, z: 1_010 };
    let mut app = app_in(board, GuiState::MainMenu, 2);

    app.handle_wake(WakeEvent::ButtonMenu);

    let frames = frames(&app);
    let accel: Vec<_> = frames
        .iter()
        .filter(|(screen, _)| matches!(screen, Screen::Accelerometer(_)))
        .collect();
    assert_eq!(accel.len(), 5);
    assert!(accel.iter().all(|(_, kind)| kind.is_partial()));
    match accel[0].0 {
        Screen::Accelerometer(view) => {
            assert_eq!(view.reading, Some(Acceleration { x: 12, y: -40, z: 1_010 }));
            assert!(view.orientation.is_some());
        }
        _ => unreachable!(),
    }
    assert_eq!(
        frames.last(),
        Some(&(Screen::Menu { selected: menu(2) }, RefreshKind::Full))
    );
}

#[test]
fn firmware_session_redraws_per_transition_then_restarts() {
    let mut board = FakeBoard::new();
    board.transport.script = vec![
        (TransferStatus::Idle, 0),
        (TransferStatus::Connected, 0),
        (TransferStatus::Downloading, 120),
        (TransferStatus::Downloading, 500),
        (TransferStatus::Completed, 500),
    ];
    let mut app = app_in(board, GuiState::FirmwareUpdate, 5);

    assert_eq!(app.handle_wake(WakeEvent::ButtonMenu), CycleOutcome::Restart);

    assert_eq!(
        frames(&app),
        &[
            (Screen::Firmware(FirmwareView::Waiting), RefreshKind::Full),
            (Screen::Firmware(FirmwareView::Connected), RefreshKind::Full),
            (
                Screen::Firmware(FirmwareView::Downloading { bytes: 120 }),
                RefreshKind::Partial
            ),
            (
                Screen::Firmware(FirmwareView::Downloading { bytes: 500 }),
                RefreshKind::Partial
            ),
            (Screen::Firmware(FirmwareView::Rebooting), RefreshKind::Full),
        ]
    );
    assert_eq!(app.board().transport.started.as_deref(), Some("Watchy BLE OTA"));
    assert_eq!(app.board().delays.last(), Some(&2_000));
}

#[test]
fn firmware_session_exits_to_menu_on_disconnect() {
    let mut board = FakeBoard::new();
    board.transport.script = vec![
        (TransferStatus::Connected, 0),
        (TransferStatus::Connected, 0),
        (TransferStatus::Disconnected, 0),
    ];
    let mut app = app_in(board, GuiState::FirmwareUpdate, 5);

    assert_eq!(app.handle_wake(WakeEvent::ButtonMenu), CycleOutcome::Sleep);

    assert_eq!(
        frames(&app),
        &[
            (Screen::Firmware(FirmwareView::Waiting), RefreshKind::Full),
            (Screen::Firmware(FirmwareView::Connected), RefreshKind::Full),
            (Screen::Firmware(FirmwareView::Exiting), RefreshKind::Full),
            (Screen::Menu { selected: menu(5) }, RefreshKind::Full),
        ]
    );
    assert!(app.board().transport.stopped);
    assert_eq!(app.state().gui, GuiState::MainMenu);
}

#[test]
fn firmware_menu_item_shows_instructions_first() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 5);

    app.dispatch(WakeEvent::ButtonMenu);

    assert_eq!(app.state().gui, GuiState::FirmwareUpdate);
    assert_eq!(
        frames(&app),
        &[(Screen::FirmwareInstructions, RefreshKind::Full)]
    );
    assert!(app.board().transport.started.is_none());
}

#[test]
fn cold_start_resets_state_and_reconfigures_hardware() {
    let initial = TimeSnapshot::from_calendar(2022, 7, 4, 18, 30, 5);
    let config = WatchConfig {
        initial_time: Some(initial),
        ..WatchConfig::default()
    };
    let mut app = app_with_config(FakeBoard::new(), config, GuiState::MainMenu, 4);
    let record = app.state().encode();

    assert_eq!(app.run_cycle(WakeCause::Other, &record), CycleOutcome::Sleep);

    assert_eq!(app.state().gui, GuiState::WatchFace);
    assert_eq!(app.state().menu, MenuIndex::FIRST);
    assert_eq!(app.board().clock.writes, vec![(initial, 30)]);
    assert_eq!(app.board().clock.armed, vec![1]);
    assert_eq!(app.board().motion.configured, 1);
    assert_eq!(app.board().display.inits, vec![false]);
    match frames(&app) {
        [(Screen::WatchFace(face), RefreshKind::Full)] => {
            assert_eq!(face.time, initial.plus_seconds(30));
        }
        other => panic!("unexpected frames {other:?}"),
    }
}

#[test]
fn motion_sensor_failure_is_a_degraded_cold_start() {
    let mut board = FakeBoard::new();
    board.motion.configure_fails = true;
    let mut app = app_in(board, GuiState::WatchFace, 0);

    assert_eq!(app.handle_wake(WakeEvent::ColdStart), CycleOutcome::Sleep);
    assert_eq!(frames(&app).len(), 1);
}

#[test]
fn failed_clock_read_keeps_last_known_time() {
    let mut board = FakeBoard::new();
    board.clock.fail_reads = true;
    let mut app = app_in(board, GuiState::WatchFace, 0);

    app.dispatch(WakeEvent::AccelTilt);

    match frames(&app) {
        [(Screen::WatchFace(face), RefreshKind::Partial)] => {
            assert_eq!(face.time, TimeSnapshot::default());
        }
        other => panic!("unexpected frames {other:?}"),
    }
}

#[test]
fn warm_wake_restores_retained_record() {
    let mut app = app_in(FakeBoard::new(), GuiState::MainMenu, 4);
    let record = app.state().encode();
    app.restore(app.default_state());

    app.run_cycle(WakeCause::ExternalPins { mask: PINS.up }, &record);

    assert_eq!(app.state().gui, GuiState::MainMenu);
    assert_eq!(app.state().menu, menu(3));
    assert_eq!(
        frames(&app),
        &[(Screen::Menu { selected: menu(3) }, RefreshKind::Partial)]
    );
}

#[test]
fn face_carries_weather_steps_and_battery() {
    let mut board = FakeBoard::new();
    board.motion.steps = 4_321;
    board.battery_mv = 4_150;
    let mut app = app_in(board, GuiState::WatchFace, 0);

    app.dispatch(WakeEvent::AccelTilt);

    match frames(&app) {
        [(Screen::WatchFace(face), _)] => {
            assert_eq!(face.steps, 4_321);
            assert_eq!(face.battery_segments, 3);
            assert_eq!(face.weather.temperature, 68);
            assert_eq!(face.sensor_temperature, Some(75));
            assert_eq!(face.weather.condition_code, 800);
            assert_eq!(face.weather.update_counter, 0);
        }
        other => panic!("unexpected frames {other:?}"),
    }
    assert_eq!(app.state().weather.update_counter, 0);
}

#[test]
fn finish_hibernates_only_a_display_that_was_woken() {
    let mut idle = app_in(FakeBoard::new(), GuiState::MainMenu, 0);
    idle.finish();
    assert_eq!(idle.board().display.hibernations, 0);

    let mut app = app_in(FakeBoard::new(), GuiState::WatchFace, 0);
    app.dispatch(WakeEvent::AccelTilt);
    app.finish();
    assert_eq!(app.board().display.hibernations, 1);
}
