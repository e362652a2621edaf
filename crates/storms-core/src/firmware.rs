//! Over-the-air firmware update session.
//!
//! The transport is polled, not interrupt driven. [`FirmwareUpdateSession::poll`] is the
//! single step of that loop: feed it the latest status and it says what to draw and
//! whether to keep going.

use core::convert::Infallible;

use log::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferStatus {
    Idle,
    Connected,
    Downloading,
    Completed,
    Disconnected,
}

/// Radio link that receives the firmware image.
pub trait FirmwareTransport {
    type Error: core::fmt::Debug;

    fn start(&mut self, device_name: &str) -> Result<(), Self::Error>;
    fn poll_status(&mut self) -> TransferStatus;
    fn bytes_transferred(&self) -> u32;
    /// Powers the radio down.
    fn stop(&mut self);
}

/// Transport for builds without a radio stack: the peer is never there.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedTransport;

impl FirmwareTransport for DetachedTransport {
    type Error = Infallible;

    fn start(&mut self, device_name: &str) -> Result<(), Self::Error> {
        debug!("ota: no radio linked, '{}' will not advertise", device_name);
        Ok(())
    }

    fn poll_status(&mut self) -> TransferStatus {
        TransferStatus::Disconnected
    }

    fn bytes_transferred(&self) -> u32 {
        0
    }

    fn stop(&mut self) {}
}

/// Screens the session draws while running.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FirmwareView {
    Waiting,
    Connected,
    Downloading { bytes: u32 },
    Rebooting,
    Exiting,
}

impl FirmwareView {
    /// Only the byte counter is redrawn in place.
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Downloading { .. })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionControl {
    Continue,
    /// Image written; restart after the grace delay.
    Reboot,
    /// Peer went away; return to the menu after the grace delay.
    Exit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionStep {
    pub redraw: Option<FirmwareView>,
    pub control: SessionControl,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FirmwareUpdateSession {
    last_status: Option<TransferStatus>,
}

impl FirmwareUpdateSession {
    pub const fn new() -> Self {
        Self { last_status: None }
    }

    pub fn poll(&mut self, status: TransferStatus, bytes: u32) -> SessionStep {
        let changed = self.last_status != Some(status);
        self.last_status = Some(status);

        let (view, control) = match status {
            TransferStatus::Idle => (None, SessionControl::Continue),
            TransferStatus::Connected => (Some(FirmwareView::Connected), SessionControl::Continue),
            TransferStatus::Downloading => (
                Some(FirmwareView::Downloading { bytes }),
                SessionControl::Continue,
            ),
            TransferStatus::Completed => (Some(FirmwareView::Rebooting), SessionControl::Reboot),
            TransferStatus::Disconnected => (Some(FirmwareView::Exiting), SessionControl::Exit),
        };

        let redraw = view.filter(|_| changed || status == TransferStatus::Downloading);
        if changed {
            debug!("ota: status={:?} bytes={}", status, bytes);
        }

        SessionStep { redraw, control }
    }
}
