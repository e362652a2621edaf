//! DS3231 real-time clock on I2C.

use embedded_hal::i2c::I2c;
use log::debug;

use storms_core::clock::{Clock, TimeSnapshot};

pub const DS3231_ADDRESS: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_ALARM2_MINUTES: u8 = 0x0B;
const REG_CONTROL: u8 = 0x0E;
const REG_STATUS: u8 = 0x0F;
const REG_TEMP_MSB: u8 = 0x11;

const ALARM_MASK_BIT: u8 = 0x80;
const CONTROL_INTCN: u8 = 0x04;
const CONTROL_A2IE: u8 = 0x02;
const STATUS_A2F: u8 = 0x02;
const HOUR_12H_MODE: u8 = 0x40;
const HOUR_PM: u8 = 0x20;
const MONTH_CENTURY: u8 = 0x80;

/// The chip stores a two-digit year; this is the century it is read into.
const BASE_YEAR: u16 = 2000;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClockError<E> {
    I2c(E),
    /// Only the once-per-minute alarm is wired up.
    UnsupportedPeriod(u8),
}

#[derive(Debug)]
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ds3231<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DS3231_ADDRESS,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, register: u8) -> Result<u8, ClockError<I2C::Error>> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(ClockError::I2c)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), ClockError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(ClockError::I2c)
    }
}

impl<I2C> Clock for Ds3231<I2C>
where
    I2C: I2c,
{
    type Error = ClockError<I2C::Error>;

    fn read(&mut self) -> Result<TimeSnapshot, Self::Error> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(self.address, &[REG_SECONDS], &mut regs)
            .map_err(ClockError::I2c)?;
        Ok(decode_time(&regs))
    }

    fn write(&mut self, time: TimeSnapshot, fudge_secs: u32) -> Result<(), Self::Error> {
        let time = time.plus_seconds(fudge_secs);
        let mut packet = [0u8; 8];
        packet[0] = REG_SECONDS;
        packet[1..].copy_from_slice(&encode_time(&time));
        self.i2c
            .write(self.address, &packet)
            .map_err(ClockError::I2c)
    }

    fn arm_alarm(&mut self, period_minutes: u8) -> Result<(), Self::Error> {
        if period_minutes != 1 {
            return Err(ClockError::UnsupportedPeriod(period_minutes));
        }

        // Alarm 2 with every match bit masked fires at second 00 of each minute.
        self.i2c
            .write(
                self.address,
                &[REG_ALARM2_MINUTES, ALARM_MASK_BIT, ALARM_MASK_BIT, ALARM_MASK_BIT],
            )
            .map_err(ClockError::I2c)?;
        // INTCN routes alarms to INT/SQW and turns the square wave off.
        self.write_register(REG_CONTROL, CONTROL_INTCN | CONTROL_A2IE)?;
        debug!("ds3231: minute alarm armed");
        Ok(())
    }

    fn clear_alarm_flag(&mut self) -> Result<(), Self::Error> {
        let status = self.read_register(REG_STATUS)?;
        if status & STATUS_A2F != 0 {
            self.write_register(REG_STATUS, status & !STATUS_A2F)?;
        }
        Ok(())
    }

    fn raw_temperature(&mut self) -> Result<i16, Self::Error> {
        let mut regs = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_TEMP_MSB], &mut regs)
            .map_err(ClockError::I2c)?;
        Ok(celsius_from_registers(regs[0], regs[1]))
    }
}

pub fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

pub fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn decode_hour(raw: u8) -> u8 {
    if raw & HOUR_12H_MODE == 0 {
        return bcd_to_bin(raw & 0x3F);
    }
    let hour = bcd_to_bin(raw & 0x1F) % 12;
    if raw & HOUR_PM != 0 { hour + 12 } else { hour }
}

fn decode_time(regs: &[u8; 7]) -> TimeSnapshot {
    let year = BASE_YEAR + bcd_to_bin(regs[6]) as u16;
    TimeSnapshot::from_calendar(
        year,
        bcd_to_bin(regs[5] & !MONTH_CENTURY),
        bcd_to_bin(regs[4] & 0x3F),
        decode_hour(regs[2]),
        bcd_to_bin(regs[1] & 0x7F),
        bcd_to_bin(regs[0] & 0x7F),
    )
}

fn encode_time(time: &TimeSnapshot) -> [u8; 7] {
    let year = time.year().saturating_sub(BASE_YEAR).min(99) as u8;
    [
        bin_to_bcd(time.second),
        bin_to_bcd(time.minute),
        bin_to_bcd(time.hour),
        time.weekday() + 1,
        bin_to_bcd(time.day),
        bin_to_bcd(time.month),
        bin_to_bcd(year),
    ]
}

/// Integer part of the quarter-degree die temperature.
fn celsius_from_registers(msb: u8, lsb: u8) -> i16 {
    let quarters = ((msb as i8 as i16) << 2) | (lsb >> 6) as i16;
    quarters / 4
}
