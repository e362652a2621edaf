use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use gdeh0154d67::{Error as PanelError, FrameBuffer, Gdeh0154d67, Refresh};
use log::debug;
use storms_core::render::{Display, RefreshKind, Screen};

use crate::render::FrameRenderer;

pub type DisplayError<SpiErr, DcErr, RstErr, BusyErr> = PanelError<SpiErr, DcErr, RstErr, BusyErr>;

/// Board-level display: renders screens into an owned framebuffer and pushes it to the
/// GDEH0154D67 panel.
pub struct EpaperDisplay<SPI, DC, RST, BUSY, D, R> {
    panel: Gdeh0154d67<SPI, DC, RST, BUSY>,
    delay: D,
    renderer: R,
    frame: FrameBuffer,
}

impl<SPI, DC, RST, BUSY, D, R> EpaperDisplay<SPI, DC, RST, BUSY, D, R>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
    R: FrameRenderer,
{
    pub fn new(panel: Gdeh0154d67<SPI, DC, RST, BUSY>, delay: D, renderer: R) -> Self {
        Self {
            panel,
            delay,
            renderer,
            frame: FrameBuffer::new(),
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn panel(&self) -> &Gdeh0154d67<SPI, DC, RST, BUSY> {
        &self.panel
    }
}

impl<SPI, DC, RST, BUSY, D, R> Display for EpaperDisplay<SPI, DC, RST, BUSY, D, R>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
    R: FrameRenderer,
{
    type Error = DisplayError<SPI::Error, DC::Error, RST::Error, BUSY::Error>;

    fn init(&mut self, full_refresh_suppressed: bool) -> Result<(), Self::Error> {
        debug!("display: init keep_previous={}", full_refresh_suppressed);
        self.panel.init(&mut self.delay, full_refresh_suppressed)
    }

    fn draw(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        self.renderer.render(screen, &mut self.frame);
        Ok(())
    }

    fn commit(&mut self, partial: bool) -> Result<RefreshKind, Self::Error> {
        let refresh = self.panel.update(&self.frame, &mut self.delay, partial)?;
        Ok(match refresh {
            Refresh::Full => RefreshKind::Full,
            Refresh::Partial => RefreshKind::Partial,
        })
    }

    fn hibernate(&mut self) -> Result<(), Self::Error> {
        self.panel.hibernate(&mut self.delay)
    }
}
