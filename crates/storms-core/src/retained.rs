//! State that survives deep sleep, and its fixed-size record.

use log::{debug, warn};

use crate::{
    menu::MenuIndex,
    weather::{TemperatureUnit, WeatherSnapshot},
};

pub const RETAINED_MAGIC: u32 = 0x3153_5453; // "STS1"
pub const RETAINED_VERSION: u8 = 1;
pub const RETAINED_RECORD_LEN: usize = 16;

const FLAG_WIFI: u8 = 1 << 0;
const FLAG_BLE: u8 = 1 << 1;

/// Which top-level screen owns the buttons.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GuiState {
    #[default]
    WatchFace,
    MainMenu,
    App,
    FirmwareUpdate,
}

impl GuiState {
    const fn to_byte(self) -> u8 {
        match self {
            Self::WatchFace => 0,
            Self::MainMenu => 1,
            Self::App => 2,
            Self::FirmwareUpdate => 3,
        }
    }

    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::WatchFace),
            1 => Some(Self::MainMenu),
            2 => Some(Self::App),
            3 => Some(Self::FirmwareUpdate),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetainedError {
    BadMagic,
    UnsupportedVersion(u8),
    Checksum,
    OutOfRange,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetainedState {
    pub gui: GuiState,
    pub menu: MenuIndex,
    pub wifi_configured: bool,
    pub ble_configured: bool,
    pub weather: WeatherSnapshot,
}

impl RetainedState {
    pub const fn new(weather: WeatherSnapshot) -> Self {
        Self {
            gui: GuiState::WatchFace,
            menu: MenuIndex::FIRST,
            wifi_configured: false,
            ble_configured: false,
            weather,
        }
    }

    pub fn encode(&self) -> [u8; RETAINED_RECORD_LEN] {
        let mut out = [0u8; RETAINED_RECORD_LEN];
        out[0..4].copy_from_slice(&RETAINED_MAGIC.to_le_bytes());
        out[4] = RETAINED_VERSION;
        out[5] = self.gui.to_byte();
        out[6] = self.menu.get();

        let mut flags = 0u8;
        if self.wifi_configured {
            flags |= FLAG_WIFI;
        }
        if self.ble_configured {
            flags |= FLAG_BLE;
        }
        out[7] = flags;

        out[8] = self.weather.temperature as u8;
        out[9] = match self.weather.unit {
            TemperatureUnit::Metric => 0,
            TemperatureUnit::Imperial => 1,
        };
        out[10..12].copy_from_slice(&self.weather.condition_code.to_le_bytes());
        out[12..14].copy_from_slice(&self.weather.update_counter.to_le_bytes());

        let checksum = record_checksum(&out[..14]);
        out[14..16].copy_from_slice(&checksum.to_le_bytes());
        out
    }

    pub fn decode(record: &[u8; RETAINED_RECORD_LEN]) -> Result<Self, RetainedError> {
        let magic = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        if magic != RETAINED_MAGIC {
            return Err(RetainedError::BadMagic);
        }
        if record[4] != RETAINED_VERSION {
            return Err(RetainedError::UnsupportedVersion(record[4]));
        }

        let stored = u16::from_le_bytes([record[14], record[15]]);
        if stored != record_checksum(&record[..14]) {
            return Err(RetainedError::Checksum);
        }

        let gui = GuiState::from_byte(record[5]).ok_or(RetainedError::OutOfRange)?;
        let menu = MenuIndex::new(record[6]).ok_or(RetainedError::OutOfRange)?;
        let unit = match record[9] {
            0 => TemperatureUnit::Metric,
            1 => TemperatureUnit::Imperial,
            _ => return Err(RetainedError::OutOfRange),
        };

        Ok(Self {
            gui,
            menu,
            wifi_configured: record[7] & FLAG_WIFI != 0,
            ble_configured: record[7] & FLAG_BLE != 0,
            weather: WeatherSnapshot {
                temperature: record[8] as i8,
                unit,
                condition_code: i16::from_le_bytes([record[10], record[11]]),
                update_counter: u16::from_le_bytes([record[12], record[13]]),
            },
        })
    }

    /// Cold starts always reset; warm wakes trust the record unless it fails to decode.
    pub fn resume(cold_start: bool, record: &[u8; RETAINED_RECORD_LEN], defaults: Self) -> Self {
        if cold_start {
            debug!("wake: cold start, retained state reset");
            return defaults;
        }

        match Self::decode(record) {
            Ok(state) => state,
            Err(err) => {
                warn!("wake: retained record rejected ({:?}), using defaults", err);
                defaults
            }
        }
    }
}

/// FNV-1a folded to 16 bits.
fn record_checksum(bytes: &[u8]) -> u16 {
    let mut hash = 0x811C_9DC5u32;
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(16_777_619);
    }
    (hash ^ (hash >> 16)) as u16
}
