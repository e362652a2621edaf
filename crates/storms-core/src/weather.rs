//! Weather snapshot kept in retained memory and its pluggable source.

use log::debug;
use rand::{Rng, SeedableRng, rngs::SmallRng};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemperatureUnit {
    Metric,
    Imperial,
}

impl TemperatureUnit {
    pub fn convert_celsius(self, celsius: i16) -> i16 {
        match self {
            Self::Metric => celsius,
            Self::Imperial => celsius * 9 / 5 + 32,
        }
    }
}

/// Icon bucket for an OpenWeatherMap-style condition code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WeatherIcon {
    Cloudy,
    FewClouds,
    Clear,
    Snow,
    Rain,
}

impl WeatherIcon {
    pub fn from_condition(code: i16) -> Option<Self> {
        match code {
            802.. => Some(Self::Cloudy),
            801 => Some(Self::FewClouds),
            800 => Some(Self::Clear),
            700..=799 => Some(Self::Cloudy),
            600..=699 => Some(Self::Snow),
            200..=599 => Some(Self::Rain),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: i8,
    pub unit: TemperatureUnit,
    pub condition_code: i16,
    /// Watch-face draws since the condition was last fetched.
    pub update_counter: u16,
}

impl WeatherSnapshot {
    /// Starts "due" so the first face draw after a cold start fetches a condition.
    pub const fn new(unit: TemperatureUnit, update_interval: u16) -> Self {
        Self {
            temperature: 0,
            unit,
            condition_code: 0,
            update_counter: update_interval,
        }
    }

    /// Refreshes the temperature on every call and the condition once per `update_interval`.
    pub fn refresh<W: WeatherSource>(
        &mut self,
        celsius: Option<i16>,
        source: &mut W,
        update_interval: u16,
    ) {
        if let Some(celsius) = celsius {
            self.temperature = self
                .unit
                .convert_celsius(celsius)
                .clamp(i8::MIN as i16, i8::MAX as i16) as i8;
        }

        if self.update_counter >= update_interval {
            if let Some(code) = source.condition_code() {
                self.condition_code = code;
            }
            self.update_counter = 0;
            debug!("weather: condition refreshed code={}", self.condition_code);
        } else {
            self.update_counter = self.update_counter.saturating_add(1);
        }
    }

    pub fn icon(&self) -> Option<WeatherIcon> {
        WeatherIcon::from_condition(self.condition_code)
    }
}

/// Provider of the current weather condition code.
pub trait WeatherSource {
    fn condition_code(&mut self) -> Option<i16>;
}

/// Upper bound (exclusive) of simulated condition codes.
pub const SIMULATED_CONDITION_BOUND: i16 = 802;

/// Offline source producing bounded pseudo-random condition codes.
#[derive(Clone, Debug)]
pub struct SimulatedWeather {
    rng: SmallRng,
}

impl SimulatedWeather {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(u64::from(seed)),
        }
    }
}

impl WeatherSource for SimulatedWeather {
    fn condition_code(&mut self) -> Option<i16> {
        Some(self.rng.gen_range(0..SIMULATED_CONDITION_BOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWeather(i16, u32);

    impl WeatherSource for FixedWeather {
        fn condition_code(&mut self) -> Option<i16> {
            self.1 += 1;
            Some(self.0)
        }
    }

    #[test]
    fn condition_refreshes_only_when_counter_is_due() {
        let mut snapshot = WeatherSnapshot::new(TemperatureUnit::Metric, 3);
        let mut source = FixedWeather(801, 0);

        snapshot.refresh(Some(21), &mut source, 3);
        assert_eq!((snapshot.condition_code, snapshot.update_counter, source.1), (801, 0, 1));

        source.0 = 500;
        for _ in 0..3 {
            snapshot.refresh(Some(21), &mut source, 3);
        }
        assert_eq!((snapshot.condition_code, snapshot.update_counter), (801, 3));

        snapshot.refresh(Some(21), &mut source, 3);
        assert_eq!((snapshot.condition_code, snapshot.update_counter, source.1), (500, 0, 2));
    }

    #[test]
    fn temperature_converts_and_survives_missing_reading() {
        let mut snapshot = WeatherSnapshot::new(TemperatureUnit::Imperial, 30);
        let mut source = SimulatedWeather::new(7);

        snapshot.refresh(Some(25), &mut source, 30);
        assert_eq!(snapshot.temperature, 77);

        snapshot.refresh(None, &mut source, 30);
        assert_eq!(snapshot.temperature, 77);
    }

    #[test]
    fn icon_buckets_follow_condition_ranges() {
        assert_eq!(WeatherIcon::from_condition(804), Some(WeatherIcon::Cloudy));
        assert_eq!(WeatherIcon::from_condition(801), Some(WeatherIcon::FewClouds));
        assert_eq!(WeatherIcon::from_condition(800), Some(WeatherIcon::Clear));
        assert_eq!(WeatherIcon::from_condition(741), Some(WeatherIcon::Cloudy));
        assert_eq!(WeatherIcon::from_condition(601), Some(WeatherIcon::Snow));
        assert_eq!(WeatherIcon::from_condition(310), Some(WeatherIcon::Rain));
        assert_eq!(WeatherIcon::from_condition(211), Some(WeatherIcon::Rain));
        assert_eq!(WeatherIcon::from_condition(199), None);
    }

    #[test]
    fn simulated_codes_stay_in_range() {
        let mut source = SimulatedWeather::new(0);
        for _ in 0..1_000 {
            let code = source.condition_code().unwrap();
            assert!((0..SIMULATED_CONDITION_BOUND).contains(&code));
        }
    }

    #[test]
    fn simulated_source_is_reproducible_from_its_seed() {
        let mut a = SimulatedWeather::new(42);
        let mut b = SimulatedWeather::new(42);
        for _ in 0..16 {
            assert_eq!(a.condition_code(), b.condition_code());
        }
    }
}
