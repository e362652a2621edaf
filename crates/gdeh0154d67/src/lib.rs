#![cfg_attr(not(test), no_std)]

//! GDEH0154D67 (1.54" 200x200 e-paper, SSD1681 controller) driver primitives.

mod framebuffer;
pub mod protocol;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use framebuffer::FrameBuffer;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Waveform used for one panel update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Refresh {
    Full,
    Partial,
}

/// Driver configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Expected SPI clock in Hz (documented for board glue).
    pub spi_hz: u32,
    /// Longest wait for BUSY to drop; a full refresh takes about two seconds.
    pub busy_timeout_ms: u32,
    pub busy_poll_ms: u32,
    /// Low pulse width on RST.
    pub reset_pulse_ms: u32,
    pub border_waveform: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spi_hz: 20_000_000,
            busy_timeout_ms: 10_000,
            busy_poll_ms: 1,
            reset_pulse_ms: 10,
            border_waveform: 0x05,
        }
    }
}

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<SpiErr, DcErr, RstErr, BusyErr> {
    Spi(SpiErr),
    Dc(DcErr),
    Rst(RstErr),
    Busy(BusyErr),
    /// BUSY stayed high past [`Config::busy_timeout_ms`].
    Timeout,
}

pub type DriverResult<SpiErr, DcErr, RstErr, BusyErr, T = ()> =
    Result<T, Error<SpiErr, DcErr, RstErr, BusyErr>>;

/// GDEH0154D67 driver.
#[derive(Debug)]
pub struct Gdeh0154d67<SPI, DC, RST, BUSY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    config: Config,
    awake: bool,
    /// Controller's previous-image RAM matches what is on the glass.
    previous_valid: bool,
}

impl<SPI, DC, RST, BUSY> Gdeh0154d67<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, config: Config) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            config,
            awake: false,
            previous_valid: false,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Releases owned bus and pins.
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }

    fn command(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error> {
        self.dc.set_low().map_err(Error::Dc)?;
        self.spi.write(&[command]).map_err(Error::Spi)?;
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(Error::Dc)?;
        self.spi.write(data).map_err(Error::Spi)
    }

    fn wait_idle<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error> {
        let poll_ms = self.config.busy_poll_ms.max(1);
        let mut waited_ms = 0u32;
        while self.busy.is_high().map_err(Error::Busy)? {
            if waited_ms >= self.config.busy_timeout_ms {
                return Err(Error::Timeout);
            }
            delay.delay_ms(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }
        Ok(())
    }

    /// Resets the controller and programs the panel geometry.
    ///
    /// `keep_previous` trusts the controller's previous-image RAM (retained through deep
    /// sleep), so the next update may be partial. Without it the next update is full.
    pub fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
        keep_previous: bool,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error> {
        self.rst.set_low().map_err(Error::Rst)?;
        delay.delay_ms(self.config.reset_pulse_ms);
        self.rst.set_high().map_err(Error::Rst)?;
        delay.delay_ms(self.config.reset_pulse_ms);
        self.wait_idle(delay)?;

        self.command(protocol::SW_RESET, &[])?;
        self.wait_idle(delay)?;

        self.command(
            protocol::DRIVER_OUTPUT_CONTROL,
            &protocol::driver_output_control(),
        )?;
        self.command(
            protocol::DATA_ENTRY_MODE,
            &[protocol::DATA_ENTRY_X_INC_Y_INC],
        )?;
        self.command(protocol::RAM_X_WINDOW, &protocol::ram_x_window())?;
        self.command(protocol::RAM_Y_WINDOW, &protocol::ram_y_window())?;
        self.command(protocol::BORDER_WAVEFORM, &[self.config.border_waveform])?;
        self.command(
            protocol::TEMPERATURE_SENSOR,
            &[protocol::TEMPERATURE_INTERNAL],
        )?;
        self.wait_idle(delay)?;

        self.awake = true;
        self.previous_valid = keep_previous;
        Ok(())
    }

    fn write_ram(
        &mut self,
        ram: u8,
        frame: &FrameBuffer,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error> {
        self.command(protocol::RAM_X_COUNTER, &[0x00])?;
        self.command(protocol::RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.command(ram, &[])?;

        self.dc.set_high().map_err(Error::Dc)?;
        for row in frame.rows() {
            self.spi
                .write(&protocol::to_ram_row(row))
                .map_err(Error::Spi)?;
        }
        Ok(())
    }

    /// Pushes `frame` to the glass and returns the waveform actually used.
    ///
    /// A partial request becomes full when the previous-image RAM cannot be trusted.
    pub fn update<D: DelayNs>(
        &mut self,
        frame: &FrameBuffer,
        delay: &mut D,
        partial: bool,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error, Refresh> {
        if !self.awake {
            self.init(delay, true)?;
        }

        let partial = partial && self.previous_valid;
        self.write_ram(protocol::WRITE_RAM_BW, frame)?;
        self.command(
            protocol::DISPLAY_UPDATE_CONTROL_2,
            &[protocol::update_sequence(partial)],
        )?;
        self.command(protocol::MASTER_ACTIVATION, &[])?;
        self.wait_idle(delay)?;

        // Next partial update diffs against this frame.
        self.write_ram(protocol::WRITE_RAM_PREVIOUS, frame)?;
        self.previous_valid = true;

        Ok(if partial {
            Refresh::Partial
        } else {
            Refresh::Full
        })
    }

    /// Powers the analog stage down and enters deep sleep with RAM retained.
    pub fn hibernate<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error, BUSY::Error> {
        if !self.awake {
            return Ok(());
        }

        self.command(
            protocol::DISPLAY_UPDATE_CONTROL_2,
            &[protocol::UPDATE_POWER_OFF],
        )?;
        self.command(protocol::MASTER_ACTIVATION, &[])?;
        self.wait_idle(delay)?;
        self.command(protocol::DEEP_SLEEP_MODE, &[protocol::DEEP_SLEEP_RETAIN_RAM])?;
        self.awake = false;
        Ok(())
    }
}
