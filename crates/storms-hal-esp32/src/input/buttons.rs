use embedded_hal::digital::InputPin;

use storms_core::input::{Button, ButtonPoller, Debounce};

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    debounce_polls: u8,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { debounce_polls: 2 }
    }
}

impl ButtonConfig {
    pub const fn with_debounce_polls(mut self, debounce_polls: u8) -> Self {
        self.debounce_polls = debounce_polls;
        self
    }
}

#[derive(Debug)]
pub enum ButtonError<MenuErr, BackErr, UpErr, DownErr> {
    Menu(MenuErr),
    Back(BackErr),
    Up(UpErr),
    Down(DownErr),
}

type ButtonResult<MenuErr, BackErr, UpErr, DownErr, T> =
    Result<T, ButtonError<MenuErr, BackErr, UpErr, DownErr>>;

/// Four polled push buttons reporting debounced press edges. Watchy buttons pull their
/// line high while pressed.
///
/// A button that is already held when the lines are configured (the press that woke the
/// watch) is not reported again until it is released and pressed anew.
#[derive(Debug)]
pub struct WatchButtons<MENU, BACK, UP, DOWN> {
    menu: MENU,
    back: BACK,
    up: UP,
    down: DOWN,
    config: ButtonConfig,
    state: [Debounce; 4],
}

impl<MENU, BACK, UP, DOWN> WatchButtons<MENU, BACK, UP, DOWN>
where
    MENU: InputPin,
    BACK: InputPin,
    UP: InputPin,
    DOWN: InputPin,
{
    pub fn new(menu: MENU, back: BACK, up: UP, down: DOWN, config: ButtonConfig) -> Self {
        Self {
            menu,
            back,
            up,
            down,
            config,
            state: [Debounce::default(); 4],
        }
    }

    pub fn release(self) -> (MENU, BACK, UP, DOWN) {
        (self.menu, self.back, self.up, self.down)
    }

    fn sample_levels(
        &mut self,
    ) -> ButtonResult<MENU::Error, BACK::Error, UP::Error, DOWN::Error, [bool; 4]> {
        Ok([
            self.menu.is_high().map_err(ButtonError::Menu)?,
            self.back.is_high().map_err(ButtonError::Back)?,
            self.up.is_high().map_err(ButtonError::Up)?,
            self.down.is_high().map_err(ButtonError::Down)?,
        ])
    }
}

impl<MENU, BACK, UP, DOWN> ButtonPoller for WatchButtons<MENU, BACK, UP, DOWN>
where
    MENU: InputPin,
    BACK: InputPin,
    UP: InputPin,
    DOWN: InputPin,
{
    type Error = ButtonError<MENU::Error, BACK::Error, UP::Error, DOWN::Error>;

    fn configure_inputs(&mut self) -> Result<(), Self::Error> {
        let levels = self.sample_levels()?;
        for (state, pressed) in self.state.iter_mut().zip(levels) {
            *state = Debounce::seeded(pressed);
        }
        Ok(())
    }

    fn poll_press(&mut self) -> Result<Option<Button>, Self::Error> {
        let levels = self.sample_levels()?;
        let threshold = self.config.debounce_polls;

        // Sample every line so each debounce counter advances; report the first edge.
        let mut press = None;
        for ((state, pressed), button) in self.state.iter_mut().zip(levels).zip(Button::ALL) {
            if state.sample(pressed, threshold) && press.is_none() {
                press = Some(button);
            }
        }
        Ok(press)
    }
}
