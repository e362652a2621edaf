//! Calendar snapshot and the TimeKeeper facade over the external clock.

use log::{debug, warn};
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

/// Years are stored as an offset from this epoch so they fit in one byte.
pub const YEAR_EPOCH: u16 = 1970;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Wall-clock time as the RTC reports it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeSnapshot {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    /// Years since [`YEAR_EPOCH`].
    pub year_offset: u8,
}

impl Default for TimeSnapshot {
    fn default() -> Self {
        // 2020-01-01 00:00:00, the lowest year the time-set screen accepts.
        Self::from_calendar(2020, 1, 1, 0, 0, 0)
    }
}

impl TimeSnapshot {
    pub const fn from_calendar(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            day,
            month,
            year_offset: year.saturating_sub(YEAR_EPOCH) as u8,
        }
    }

    pub const fn year(&self) -> u16 {
        YEAR_EPOCH + self.year_offset as u16
    }

    pub fn is_valid(&self) -> bool {
        self.hour < 24
            && self.minute < 60
            && self.second < 60
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
    }

    /// Calendar view of the snapshot. A day past the end of its month rolls into the next
    /// month, the same way the editor's fixed 1..=31 day range is committed.
    pub fn to_datetime(&self) -> Option<PrimitiveDateTime> {
        let month = Month::try_from(self.month).ok()?;
        let first = Date::from_calendar_date(i32::from(self.year()), month, 1).ok()?;
        let date = first.checked_add(Duration::days(i64::from(self.day.max(1)) - 1))?;
        let time = Time::from_hms(self.hour, self.minute, self.second).ok()?;
        Some(PrimitiveDateTime::new(date, time))
    }

    pub fn from_datetime(datetime: PrimitiveDateTime) -> Self {
        Self::from_calendar(
            u16::try_from(datetime.year()).unwrap_or(YEAR_EPOCH),
            u8::from(datetime.month()),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
        )
    }

    /// Normalizing add; a day-31 in a 30-day month rolls into the next month.
    pub fn plus_seconds(&self, seconds: u32) -> Self {
        self.to_datetime()
            .and_then(|datetime| datetime.checked_add(Duration::seconds(i64::from(seconds))))
            .map_or(*self, Self::from_datetime)
    }

    /// 0 = Sunday.
    pub fn weekday(&self) -> u8 {
        self.to_datetime()
            .map_or(0, |datetime| datetime.weekday().number_days_from_sunday())
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday() as usize]
    }

    pub fn month_short_name(&self) -> &'static str {
        MONTH_SHORT_NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Parses `YYYY:MM:DD:HH:MM:SS`. Missing trailing fields default to zero; the date must
    /// exist on the calendar.
    pub fn parse_stamp(stamp: &str) -> Option<Self> {
        let mut parts = stamp.trim().split(':').map(str::trim);

        let year: u16 = parts.next()?.parse().ok()?;
        let month: u8 = parts.next()?.parse().ok()?;
        let day: u8 = parts.next()?.parse().ok()?;
        let mut clock = [0u8; 3];
        for field in clock.iter_mut() {
            match parts.next() {
                Some(part) => *field = part.parse().ok()?,
                None => break,
            }
        }
        if parts.next().is_some() {
            return None;
        }
        if year < YEAR_EPOCH || year > YEAR_EPOCH + u16::from(u8::MAX) {
            return None;
        }

        let [hour, minute, second] = clock;
        let date =
            Date::from_calendar_date(i32::from(year), Month::try_from(month).ok()?, day).ok()?;
        let time = Time::from_hms(hour, minute, second).ok()?;
        Some(Self::from_datetime(PrimitiveDateTime::new(date, time)))
    }
}

/// External real-time clock.
pub trait Clock {
    type Error: core::fmt::Debug;

    fn read(&mut self) -> Result<TimeSnapshot, Self::Error>;
    /// Writes `time + fudge_secs` in a single transaction.
    fn write(&mut self, time: TimeSnapshot, fudge_secs: u32) -> Result<(), Self::Error>;
    fn arm_alarm(&mut self, period_minutes: u8) -> Result<(), Self::Error>;
    fn clear_alarm_flag(&mut self) -> Result<(), Self::Error>;
    /// Die temperature in whole degrees Celsius.
    fn raw_temperature(&mut self) -> Result<i16, Self::Error>;
}

/// Best-effort clock access. Never fails: a failed read returns the last value seen.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeKeeper {
    last_known: TimeSnapshot,
}

impl TimeKeeper {
    pub const fn new(last_known: TimeSnapshot) -> Self {
        Self { last_known }
    }

    pub const fn last_known(&self) -> TimeSnapshot {
        self.last_known
    }

    pub fn read<C: Clock>(&mut self, clock: &mut C) -> TimeSnapshot {
        match clock.read() {
            Ok(time) if time.is_valid() => self.last_known = time,
            Ok(time) => warn!("time: clock returned invalid value {:?}", time),
            Err(err) => warn!("time: read failed: {:?}", err),
        }
        self.last_known
    }

    /// Commits `time` plus `fudge_secs`. Returns `false` when the write did not happen.
    pub fn set<C: Clock>(&mut self, clock: &mut C, time: TimeSnapshot, fudge_secs: u32) -> bool {
        if !time.is_valid() {
            warn!("time: refusing to write invalid value {:?}", time);
            return false;
        }

        match clock.write(time, fudge_secs) {
            Ok(()) => {
                self.last_known = time.plus_seconds(fudge_secs);
                debug!("time: set {:?} fudge={}s", time, fudge_secs);
                true
            }
            Err(err) => {
                warn!("time: write failed: {:?}", err);
                false
            }
        }
    }

    /// Free-running tick path: bump the clock by one minute with seconds zeroed.
    pub fn advance_one_minute<C: Clock>(&mut self, clock: &mut C) -> TimeSnapshot {
        let mut now = self.read(clock);
        now.second = 0;
        let next = now.plus_seconds(60);
        let _ = self.set(clock, next, 0);
        self.read(clock)
    }

    pub fn arm_periodic_alarm<C: Clock>(&mut self, clock: &mut C) {
        if let Err(err) = clock.arm_alarm(1) {
            warn!("time: arming minute alarm failed: {:?}", err);
        }
    }

    pub fn clear_alarm<C: Clock>(&mut self, clock: &mut C) {
        if let Err(err) = clock.clear_alarm_flag() {
            warn!("time: clearing alarm flag failed: {:?}", err);
        }
    }

    pub fn temperature_celsius<C: Clock>(&mut self, clock: &mut C) -> Option<i16> {
        clock.raw_temperature().ok()
    }
}
