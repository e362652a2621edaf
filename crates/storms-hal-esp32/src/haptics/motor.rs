use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Vibration motor on a single push-pull output.
#[derive(Debug)]
pub struct VibrationMotor<P> {
    pin: P,
}

impl<P> VibrationMotor<P>
where
    P: OutputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Toggles the motor `toggles` times, `interval_ms` apart, and leaves it off.
    pub fn pulse<D: DelayNs>(
        &mut self,
        delay: &mut D,
        interval_ms: u32,
        toggles: u8,
    ) -> Result<(), P::Error> {
        let mut on = false;
        for _ in 0..toggles {
            on = !on;
            if on {
                self.pin.set_high()?;
            } else {
                self.pin.set_low()?;
            }
            delay.delay_ms(interval_ms);
        }
        self.pin.set_low()
    }

    pub fn release(self) -> P {
        self.pin
    }
}
