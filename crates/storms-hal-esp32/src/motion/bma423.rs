//! BMA423 accelerometer on I2C: basic sensing and the latched feature interrupt on INT1.

use embedded_hal::{delay::DelayNs, i2c::I2c};
use log::{debug, info};

use storms_core::sensors::{Acceleration, MotionSensor, SensorErrorFlags};

pub const BMA423_ADDRESS: u8 = 0x18;
pub const BMA423_CHIP_ID: u8 = 0x13;

const REG_CHIP_ID: u8 = 0x00;
const REG_ERROR: u8 = 0x02;
const REG_ACC_X_LSB: u8 = 0x12;
const REG_INT_STATUS_0: u8 = 0x1C;
const REG_STEP_COUNT_0: u8 = 0x1E;
const REG_TEMPERATURE: u8 = 0x22;
const REG_ACC_CONF: u8 = 0x40;
const REG_ACC_RANGE: u8 = 0x41;
const REG_INT1_IO_CTRL: u8 = 0x53;
const REG_INT_LATCH: u8 = 0x55;
const REG_INT1_MAP: u8 = 0x56;
const REG_PWR_CONF: u8 = 0x7C;
const REG_PWR_CTRL: u8 = 0x7D;

/// Continuous filter mode, 4-sample average, 100 Hz.
const ACC_CONF_100HZ_AVG4: u8 = 0xA8;
const ACC_RANGE_2G: u8 = 0x00;
/// Level-triggered, active high, push-pull, output enabled.
const INT1_ACTIVE_HIGH_OUTPUT: u8 = 0x0A;
const INT_LATCHED: u8 = 0x01;
const PWR_CTRL_ACC_EN: u8 = 0x04;
const PWR_CONF_PERFORMANCE: u8 = 0x00;

const INT_TILT: u8 = 0x08;
const INT_DOUBLE_TAP: u8 = 0x20;

const ERR_FATAL: u8 = 0x01;
const ERR_CMD: u8 = 0x02;
const ERR_CODE_MASK: u8 = 0x1C;
const ERR_AUX: u8 = 0x80;

/// Temperature register reads this when no conversion is available.
const TEMPERATURE_INVALID: u8 = 0x80;
const TEMPERATURE_OFFSET_C: i16 = 23;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MotionError<E> {
    I2c(E),
    ChipId(u8),
    NoTemperature,
}

#[derive(Debug)]
pub struct Bma423<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    captured_status: u8,
}

impl<I2C, D> Bma423<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: BMA423_ADDRESS,
            captured_status: 0,
        }
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn read_into(&mut self, register: u8, buf: &mut [u8]) -> Result<(), MotionError<I2C::Error>> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .map_err(MotionError::I2c)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, MotionError<I2C::Error>> {
        let mut value = [0u8; 1];
        self.read_into(register, &mut value)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), MotionError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(MotionError::I2c)
    }
}

impl<I2C, D> MotionSensor for Bma423<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = MotionError<I2C::Error>;

    /// Sets up 100 Hz sampling at 2 g and latches tilt and double-tap on INT1.
    ///
    /// The feature-engine config blob is not uploaded, so the step counter stays at zero and
    /// the tilt and double-tap interrupts never assert; raw acceleration, error flags and
    /// temperature work regardless.
    fn configure(&mut self) -> Result<(), Self::Error> {
        let chip_id = self.read_register(REG_CHIP_ID)?;
        if chip_id != BMA423_CHIP_ID {
            return Err(MotionError::ChipId(chip_id));
        }

        self.write_register(REG_PWR_CONF, PWR_CONF_PERFORMANCE)?;
        self.delay.delay_us(450);
        self.write_register(REG_ACC_CONF, ACC_CONF_100HZ_AVG4)?;
        self.write_register(REG_ACC_RANGE, ACC_RANGE_2G)?;
        self.write_register(REG_PWR_CTRL, PWR_CTRL_ACC_EN)?;

        self.write_register(REG_INT1_IO_CTRL, INT1_ACTIVE_HIGH_OUTPUT)?;
        self.write_register(REG_INT_LATCH, INT_LATCHED)?;
        self.write_register(REG_INT1_MAP, INT_TILT | INT_DOUBLE_TAP)?;

        info!("bma423: configured (100Hz, 2g, INT1 tilt|double-tap latched)");
        Ok(())
    }

    fn clear_interrupt_latch(&mut self) -> bool {
        let mut status = [0u8; 2];
        match self.read_into(REG_INT_STATUS_0, &mut status) {
            Ok(()) => {
                self.captured_status = status[0];
                debug!("bma423: int status {:#04x} {:#04x}", status[0], status[1]);
                status[0] != 0 || status[1] != 0
            }
            Err(err) => {
                self.captured_status = 0;
                debug!("bma423: int status read failed: {:?}", err);
                false
            }
        }
    }

    fn is_tilt_event(&self) -> bool {
        self.captured_status & INT_TILT != 0
    }

    fn is_double_tap_event(&self) -> bool {
        self.captured_status & INT_DOUBLE_TAP != 0
    }

    fn step_count(&mut self) -> Result<u32, Self::Error> {
        let mut raw = [0u8; 4];
        self.read_into(REG_STEP_COUNT_0, &mut raw)?;
        Ok(u32::from_le_bytes(raw))
    }

    fn raw_acceleration(&mut self) -> Result<Acceleration, Self::Error> {
        let mut raw = [0u8; 6];
        self.read_into(REG_ACC_X_LSB, &mut raw)?;
        Ok(remap_to_watch_frame(decode_acceleration(&raw)))
    }

    fn last_error_flags(&mut self) -> Result<SensorErrorFlags, Self::Error> {
        let raw = self.read_register(REG_ERROR)?;
        Ok(decode_error_flags(raw))
    }

    fn temperature_celsius(&mut self) -> Result<i16, Self::Error> {
        let raw = self.read_register(REG_TEMPERATURE)?;
        if raw == TEMPERATURE_INVALID {
            return Err(MotionError::NoTemperature);
        }
        Ok(raw as i8 as i16 + TEMPERATURE_OFFSET_C)
    }
}

/// 12-bit samples, left-aligned in little-endian register pairs.
fn decode_acceleration(raw: &[u8; 6]) -> Acceleration {
    let axis = |lsb: u8, msb: u8| i16::from_le_bytes([lsb, msb]) >> 4;
    Acceleration {
        x: axis(raw[0], raw[1]),
        y: axis(raw[2], raw[3]),
        z: axis(raw[4], raw[5]),
    }
}

/// The sensor sits rotated on the Watchy board: swap X/Y and flip every axis.
fn remap_to_watch_frame(acc: Acceleration) -> Acceleration {
    Acceleration {
        x: acc.y.saturating_neg(),
        y: acc.x.saturating_neg(),
        z: acc.z.saturating_neg(),
    }
}

fn decode_error_flags(raw: u8) -> SensorErrorFlags {
    SensorErrorFlags {
        fatal: raw & ERR_FATAL != 0,
        error_code: raw & ERR_CODE_MASK != 0,
        command: raw & ERR_CMD != 0,
        aux: raw & ERR_AUX != 0,
    }
}
