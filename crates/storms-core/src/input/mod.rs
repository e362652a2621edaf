//! Button abstraction layer.

/// The four side buttons, in wake-priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Button {
    Menu,
    Back,
    Up,
    Down,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::Menu, Self::Back, Self::Up, Self::Down];
}

/// Polled button lines, used while the device stays awake after a wake.
///
/// `poll_press` reports press edges only; a button held across two polls is one press.
pub trait ButtonPoller {
    type Error: core::fmt::Debug;

    /// Switch the lines from wake-source use to plain inputs and latch their current levels.
    fn configure_inputs(&mut self) -> Result<(), Self::Error>;

    fn poll_press(&mut self) -> Result<Option<Button>, Self::Error>;
}

/// Debounce state for one line.
///
/// A level must be seen on `threshold + 1` consecutive samples before it is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debounce {
    raw: bool,
    stable: bool,
    stable_count: u8,
}

impl Debounce {
    /// Starts from a known level so a line already held is not reported as a new press.
    pub const fn seeded(pressed: bool) -> Self {
        Self {
            raw: pressed,
            stable: pressed,
            stable_count: 0,
        }
    }

    /// Feeds one sample; returns `true` on a debounced press edge.
    pub fn sample(&mut self, pressed: bool, threshold: u8) -> bool {
        if pressed == self.raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.raw = pressed;
            self.stable_count = 0;
        }

        if self.stable_count >= threshold.max(1) && self.stable != self.raw {
            self.stable = self.raw;
            return self.stable;
        }
        false
    }
}
