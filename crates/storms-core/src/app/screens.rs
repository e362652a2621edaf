impl<B> WatchApp<B>
where
    B: Board,
{
    /// Powers the panel up once per wake; later screens reuse it.
    fn wake_display(&mut self, full_refresh_suppressed: bool) {
        if self.display_ready {
            return;
        }
        if let Err(err) = self.board.display().init(full_refresh_suppressed) {
            warn!("ui: display init failed: {:?}", err);
        }
        self.display_ready = true;
    }

    fn present(&mut self, screen: Screen, partial: bool) -> RefreshKind {
        self.wake_display(true);

        let display = self.board.display();
        if let Err(err) = display.draw(&screen) {
            warn!("ui: draw failed: {:?}", err);
        }
        match display.commit(partial) {
            Ok(kind) => kind,
            Err(err) => {
                warn!("ui: refresh failed: {:?}", err);
                RefreshKind::from_partial(partial)
            }
        }
    }

    fn face_snapshot(&mut self) -> FaceSnapshot {
        let steps = self.board.motion().step_count().unwrap_or_else(|err| {
            debug!("ui: step count unavailable: {:?}", err);
            0
        });

        let celsius = self.time.temperature_celsius(self.board.clock());
        let interval = self.config.weather_update_interval;
        self.state
            .weather
            .refresh(celsius, self.board.weather(), interval);

        let unit = self.state.weather.unit;
        let sensor_temperature = match self.board.motion().temperature_celsius() {
            Ok(celsius) => Some(unit.convert_celsius(celsius)),
            Err(err) => {
                debug!("ui: sensor temperature unavailable: {:?}", err);
                None
            }
        };

        FaceSnapshot {
            time: self.time.last_known(),
            steps,
            weather: self.state.weather,
            sensor_temperature,
            battery_segments: battery_segments(self.board.battery_millivolts()),
            wifi_configured: self.state.wifi_configured,
            ble_configured: self.state.ble_configured,
            dark_mode: self.config.dark_mode,
        }
    }

    fn show_watch_face(&mut self, partial: bool) {
        let face = self.face_snapshot();
        self.present(Screen::WatchFace(face), partial);
        self.state.gui = GuiState::WatchFace;
    }

    fn show_menu(&mut self, partial: bool) {
        self.present(
            Screen::Menu {
                selected: self.state.menu,
            },
            partial,
        );
        self.state.gui = GuiState::MainMenu;
    }

    fn show_battery(&mut self) {
        let millivolts = self.board.battery_millivolts();
        debug!("ui: battery {} mV", millivolts);
        self.present(Screen::Battery { millivolts }, false);
        self.state.gui = GuiState::App;
    }

    fn show_buzz(&mut self) {
        self.present(Screen::Buzz, false);
        self.board
            .vibrate(self.config.buzz_interval_ms, self.config.buzz_toggles);
        self.show_menu(false);
    }

    fn show_verse(&mut self) {
        let pick = self.board.random_below(VERSES.len() as u32) as usize;
        let text = VERSES[pick.min(VERSES.len() - 1)];
        self.present(Screen::Verse { text }, false);
        self.state.gui = GuiState::App;
    }

    fn show_firmware_instructions(&mut self) {
        self.present(Screen::FirmwareInstructions, false);
        self.state.gui = GuiState::FirmwareUpdate;
    }
}
