#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopStep {
    Idle,
    Press(Button),
    /// No press within the idle timeout.
    Expired,
}

/// Idle-timeout bookkeeping for the post-wake polling loop.
///
/// One call to [`FastInputLoop::observe`] is one poll; the caller acts on the step and
/// decides whether to keep polling.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FastInputLoop {
    idle_timeout_ms: u64,
    last_activity_ms: u64,
}

impl FastInputLoop {
    pub const fn new(now_ms: u64, idle_timeout_ms: u64) -> Self {
        Self {
            idle_timeout_ms,
            last_activity_ms: now_ms,
        }
    }

    pub fn observe(&mut self, now_ms: u64, press: Option<Button>) -> LoopStep {
        if let Some(button) = press {
            self.last_activity_ms = now_ms;
            return LoopStep::Press(button);
        }

        if now_ms.saturating_sub(self.last_activity_ms) > self.idle_timeout_ms {
            LoopStep::Expired
        } else {
            LoopStep::Idle
        }
    }

    /// Restarts the idle window, e.g. after a long-running screen returns.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }
}

impl<B> WatchApp<B>
where
    B: Board,
{
    fn poll_button(&mut self) -> Option<Button> {
        match self.board.buttons().poll_press() {
            Ok(press) => press,
            Err(err) => {
                debug!("ui: button poll failed: {:?}", err);
                None
            }
        }
    }

    fn configure_buttons(&mut self) -> bool {
        match self.board.buttons().configure_inputs() {
            Ok(()) => true,
            Err(err) => {
                warn!("ui: button lines unavailable: {:?}", err);
                false
            }
        }
    }

    /// Stays awake for quick follow-up presses, feeding them through the same table.
    fn run_fast_input(&mut self) -> CycleOutcome {
        if !self.configure_buttons() {
            return CycleOutcome::Sleep;
        }

        let mut fast = FastInputLoop::new(self.board.now_ms(), self.config.fast_idle_timeout_ms);
        loop {
            let press = self.poll_button();
            match fast.observe(self.board.now_ms(), press) {
                LoopStep::Idle => {}
                LoopStep::Expired => {
                    debug!("ui: fast input idle, leaving");
                    return CycleOutcome::Sleep;
                }
                LoopStep::Press(button) => match self.dispatch(WakeEvent::from_button(button)) {
                    Flow::Continue => fast.touch(self.board.now_ms()),
                    Flow::Leave => return CycleOutcome::Sleep,
                    Flow::Restart => return CycleOutcome::Restart,
                },
            }
            self.board.delay_ms(self.config.poll_interval_ms);
        }
    }
}
