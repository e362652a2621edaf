impl<B> WatchApp<B>
where
    B: Board,
{
    pub fn new(board: B, config: WatchConfig, pins: WakePins) -> Self {
        let state = Self::defaults_for(&config);
        Self {
            board,
            classifier: WakeClassifier::new(pins, config.timing),
            config,
            time: TimeKeeper::default(),
            state,
            display_ready: false,
        }
    }

    /// Replaces the retained state, as a warm wake would.
    pub fn restore(&mut self, state: RetainedState) {
        self.state = state;
    }

    pub fn state(&self) -> RetainedState {
        self.state
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn last_known_time(&self) -> TimeSnapshot {
        self.time.last_known()
    }

    pub fn default_state(&self) -> RetainedState {
        Self::defaults_for(&self.config)
    }

    fn defaults_for(config: &WatchConfig) -> RetainedState {
        RetainedState::new(WeatherSnapshot::new(
            config.temperature_unit,
            config.weather_update_interval,
        ))
    }

    /// One full wake: classify, restore retained state, dispatch.
    pub fn run_cycle(
        &mut self,
        cause: WakeCause,
        record: &[u8; RETAINED_RECORD_LEN],
    ) -> CycleOutcome {
        let event = {
            let (clock, motion) = self.board.clock_and_motion();
            self.classifier.classify(cause, &mut self.time, clock, motion)
        };

        let defaults = self.default_state();
        self.state = RetainedState::resume(event == WakeEvent::ColdStart, record, defaults);
        self.handle_wake(event)
    }

    pub fn handle_wake(&mut self, event: WakeEvent) -> CycleOutcome {
        debug!(
            "wake: event={:?} gui={:?} menu={}",
            event,
            self.state.gui,
            self.state.menu.get()
        );

        if event == WakeEvent::ColdStart {
            self.cold_start();
            return CycleOutcome::Sleep;
        }

        match self.dispatch(event) {
            Flow::Continue => {}
            Flow::Leave => return CycleOutcome::Sleep,
            Flow::Restart => return CycleOutcome::Restart,
        }

        if event.is_external() {
            return self.run_fast_input();
        }
        CycleOutcome::Sleep
    }

    /// Resolves one event against the current screen. Unlisted pairs do nothing.
    pub fn dispatch(&mut self, event: WakeEvent) -> Flow {
        match (event, self.state.gui) {
            (WakeEvent::TimerTick, GuiState::WatchFace) => {
                self.time.advance_one_minute(self.board.clock());
                self.show_watch_face(true);
            }
            (WakeEvent::AlarmTick, GuiState::WatchFace)
            | (WakeEvent::AccelTilt, GuiState::WatchFace) => {
                self.time.read(self.board.clock());
                self.show_watch_face(true);
            }
            (WakeEvent::ButtonMenu, GuiState::WatchFace) => self.show_menu(false),
            (WakeEvent::ButtonMenu, GuiState::MainMenu) => {
                return self.run_menu_item(self.state.menu.item());
            }
            (WakeEvent::ButtonMenu, GuiState::FirmwareUpdate) => {
                return self.run_firmware_update();
            }
            (WakeEvent::ButtonBack, GuiState::MainMenu) => {
                // A pending alarm would wake us straight back up.
                self.time.clear_alarm(self.board.clock());
                self.time.read(self.board.clock());
                self.show_watch_face(false);
                return Flow::Leave;
            }
            (WakeEvent::ButtonBack, GuiState::App)
            | (WakeEvent::ButtonBack, GuiState::FirmwareUpdate) => self.show_menu(false),
            (WakeEvent::ButtonUp, GuiState::MainMenu) => {
                self.state.menu = self.state.menu.prev();
                self.show_menu(true);
            }
            (WakeEvent::ButtonDown, GuiState::MainMenu) => {
                self.state.menu = self.state.menu.next();
                self.show_menu(true);
            }
            (WakeEvent::AccelDoubleTap, GuiState::WatchFace) => self.show_verse(),
            (event, gui) => debug!("ui-nav: {:?} ignored in {:?}", event, gui),
        }

        Flow::Continue
    }

    fn cold_start(&mut self) {
        info!("wake: cold start, reconfiguring clock and motion sensor");

        if let Some(initial) = self.config.initial_time {
            let fudge = self.config.cold_start_fudge_secs;
            self.time.set(self.board.clock(), initial, fudge);
        }
        if self.config.timing == TimingMode::RtcAlarm {
            self.time.arm_periodic_alarm(self.board.clock());
        }
        if let Err(err) = self.board.motion().configure() {
            warn!("wake: motion sensor unavailable, steps and gestures disabled: {:?}", err);
        }

        self.time.read(self.board.clock());
        self.wake_display(false);
        self.show_watch_face(false);
    }

    /// Wake sources for the coming sleep.
    pub fn wake_plan(&self) -> WakePlan {
        WakePlan::for_mode(self.classifier.pins(), self.classifier.mode())
    }

    pub fn retained_record(&self) -> [u8; RETAINED_RECORD_LEN] {
        self.state.encode()
    }

    /// Puts the panel into its lowest-power mode if this wake used it.
    pub fn finish(&mut self) {
        if !self.display_ready {
            return;
        }
        if let Err(err) = self.board.display().hibernate() {
            warn!("sleep: display hibernate failed: {:?}", err);
        }
        self.display_ready = false;
    }
}
