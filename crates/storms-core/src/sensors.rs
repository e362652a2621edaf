//! Motion sensor and battery collaborator contracts.

/// Raw accelerometer sample in sensor LSB units.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Acceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Which face of the watch points down, derived from the dominant axis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    FaceUp,
    FaceDown,
    TopEdge,
    BottomEdge,
    LeftEdge,
    RightEdge,
}

impl Orientation {
    pub fn from_acceleration(acc: Acceleration) -> Self {
        let (ax, ay, az) = (acc.x.unsigned_abs(), acc.y.unsigned_abs(), acc.z.unsigned_abs());

        if az > ax && az > ay {
            if acc.z > 0 { Self::FaceDown } else { Self::FaceUp }
        } else if ay > ax && ay > az {
            if acc.y > 0 { Self::RightEdge } else { Self::LeftEdge }
        } else if acc.x < 0 {
            Self::BottomEdge
        } else {
            Self::TopEdge
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FaceUp => "FACE UP",
            Self::FaceDown => "FACE DOWN",
            Self::TopEdge => "TOP EDGE",
            Self::BottomEdge => "BOTTOM EDGE",
            Self::LeftEdge => "LEFT EDGE",
            Self::RightEdge => "RIGHT EDGE",
        }
    }
}

/// Error register snapshot of the motion sensor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SensorErrorFlags {
    pub fatal: bool,
    pub error_code: bool,
    pub command: bool,
    pub aux: bool,
}

/// Accelerometer with an on-chip gesture engine and a latched interrupt line.
pub trait MotionSensor {
    type Error: core::fmt::Debug;

    /// Cold-start setup: data rate, range, interrupt pin, step/tilt/double-tap features.
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// Reads the interrupt status register, which also releases the latched INT pin.
    ///
    /// Returns `true` when an interrupt was pending.
    fn clear_interrupt_latch(&mut self) -> bool;

    /// Tilt flag from the status captured by the last [`Self::clear_interrupt_latch`].
    fn is_tilt_event(&self) -> bool;

    /// Double-tap flag from the status captured by the last [`Self::clear_interrupt_latch`].
    fn is_double_tap_event(&self) -> bool;

    fn step_count(&mut self) -> Result<u32, Self::Error>;
    fn raw_acceleration(&mut self) -> Result<Acceleration, Self::Error>;
    fn last_error_flags(&mut self) -> Result<SensorErrorFlags, Self::Error>;
    fn temperature_celsius(&mut self) -> Result<i16, Self::Error>;
}

const BATTERY_FULL_MV: u16 = 4_100;
const BATTERY_MID_MV: u16 = 3_950;
const BATTERY_LOW_MV: u16 = 3_800;

/// Number of lit segments (0..=3) for a battery voltage.
pub fn battery_segments(millivolts: u16) -> u8 {
    if millivolts > BATTERY_FULL_MV {
        3
    } else if millivolts > BATTERY_MID_MV {
        2
    } else if millivolts > BATTERY_LOW_MV {
        1
    } else {
        0
    }
}
