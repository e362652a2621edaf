impl<B> WatchApp<B>
where
    B: Board,
{
    fn run_menu_item(&mut self, item: MenuItem) -> Flow {
        debug!("ui-nav: open {:?}", item);
        match item {
            MenuItem::ShowBattery => self.show_battery(),
            MenuItem::Buzz => self.show_buzz(),
            MenuItem::ShowAccelerometer => self.run_accelerometer(),
            MenuItem::SetTime => self.run_set_time(),
            MenuItem::ShowVerse => self.show_verse(),
            MenuItem::ShowFirmwareUpdate => self.show_firmware_instructions(),
        }
        Flow::Continue
    }

    fn idle_for(&self, since_ms: u64) -> bool {
        self.board.now_ms().saturating_sub(since_ms) > self.config.app_idle_timeout_ms
    }

    fn run_set_time(&mut self) {
        self.state.gui = GuiState::App;
        let current = self.time.read(self.board.clock());
        let mut editor = DigitEditor::new(current);

        self.configure_buttons();
        let mut last_input_ms = self.board.now_ms();
        let mut next_frame_ms = last_input_ms;

        // Buttons are polled between frames; the editor only steps on a press or a blink.
        loop {
            let press = self.poll_button();
            let now_ms = self.board.now_ms();
            if press.is_some() {
                last_input_ms = now_ms;
            } else if self.idle_for(last_input_ms) {
                info!("edit: idle, abandoning time edit");
                break;
            }

            if press.is_some() || now_ms >= next_frame_ms {
                match editor.step(press) {
                    EditStep::Commit(time) => {
                        let fudge = self.config.set_time_fudge_secs;
                        if self.time.set(self.board.clock(), time, fudge) {
                            debug!("edit: committed {:?}", time);
                        }
                        break;
                    }
                    EditStep::Editing => {
                        if press.is_some() {
                            debug!("edit: {:?} -> {:?}", editor.cursor(), editor.fields());
                        }
                        self.present(Screen::SetTime(editor.view()), true);
                        next_frame_ms = self.board.now_ms() + self.config.edit_blink_ms;
                    }
                }
            }

            self.board.delay_ms(self.config.poll_interval_ms);
        }

        self.show_menu(false);
    }

    fn accel_view(&mut self) -> AccelView {
        let motion = self.board.motion();
        let reading = match motion.raw_acceleration() {
            Ok(reading) => Some(reading),
            Err(err) => {
                debug!("ui: acceleration read failed: {:?}", err);
                None
            }
        };

        AccelView {
            reading,
            orientation: reading.map(Orientation::from_acceleration),
            errors: motion.last_error_flags().ok(),
        }
    }

    fn run_accelerometer(&mut self) {
        self.state.gui = GuiState::App;
        self.configure_buttons();

        let mut last_input_ms = self.board.now_ms();
        let mut last_frame_ms: Option<u64> = None;

        loop {
            let now_ms = self.board.now_ms();
            match self.poll_button() {
                Some(Button::Back) => break,
                Some(_) => last_input_ms = now_ms,
                None if self.idle_for(last_input_ms) => {
                    info!("ui: accelerometer screen idle, closing");
                    break;
                }
                None => {}
            }

            let due = last_frame_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= self.config.accel_refresh_ms);
            if due {
                let view = self.accel_view();
                self.present(Screen::Accelerometer(view), true);
                // Measured after the refresh so the buttons get polled between frames.
                last_frame_ms = Some(self.board.now_ms());
            }

            self.board.delay_ms(self.config.poll_interval_ms);
        }

        self.show_menu(false);
    }

    fn run_firmware_update(&mut self) -> Flow {
        self.present(Screen::Firmware(FirmwareView::Waiting), false);

        let name = self.config.ota_device_name;
        if let Err(err) = self.board.transport().start(name) {
            warn!("ota: transport failed to start: {:?}", err);
            self.board.transport().stop();
            self.show_menu(false);
            return Flow::Continue;
        }
        info!("ota: advertising as '{}'", name);

        let mut session = FirmwareUpdateSession::new();
        loop {
            let transport = self.board.transport();
            let status = transport.poll_status();
            let bytes = transport.bytes_transferred();
            let step = session.poll(status, bytes);

            if let Some(view) = step.redraw {
                self.present(Screen::Firmware(view), view.is_partial());
            }

            match step.control {
                SessionControl::Continue => self.board.delay_ms(self.config.ota_poll_interval_ms),
                SessionControl::Reboot => {
                    info!("ota: image received ({} bytes), restarting", bytes);
                    self.board.delay_ms(self.config.ota_reboot_grace_ms);
                    return Flow::Restart;
                }
                SessionControl::Exit => {
                    self.board.delay_ms(self.config.ota_exit_grace_ms);
                    self.board.transport().stop();
                    self.show_menu(false);
                    return Flow::Continue;
                }
            }
        }
    }
}
