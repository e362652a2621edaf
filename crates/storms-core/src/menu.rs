//! Main menu items and the wrapping selection cursor.

/// Menu entries, in display order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuItem {
    ShowBattery,
    Buzz,
    ShowAccelerometer,
    SetTime,
    ShowVerse,
    ShowFirmwareUpdate,
}

impl MenuItem {
    pub const ALL: [Self; MENU_LENGTH] = [
        Self::ShowBattery,
        Self::Buzz,
        Self::ShowAccelerometer,
        Self::SetTime,
        Self::ShowVerse,
        Self::ShowFirmwareUpdate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowBattery => "Check Battery",
            Self::Buzz => "Vibrate Motor",
            Self::ShowAccelerometer => "Show Accelerometer",
            Self::SetTime => "Set Time",
            Self::ShowVerse => "Verse",
            Self::ShowFirmwareUpdate => "Update Firmware",
        }
    }
}

pub const MENU_LENGTH: usize = 6;

pub const MENU_LABELS: [&str; MENU_LENGTH] = [
    MenuItem::ShowBattery.label(),
    MenuItem::Buzz.label(),
    MenuItem::ShowAccelerometer.label(),
    MenuItem::SetTime.label(),
    MenuItem::ShowVerse.label(),
    MenuItem::ShowFirmwareUpdate.label(),
];

/// Selection cursor in `0..MENU_LENGTH`; wraps in both directions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MenuIndex(u8);

impl MenuIndex {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(MENU_LENGTH as u8 - 1);

    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < MENU_LENGTH {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn item(self) -> MenuItem {
        MenuItem::ALL[self.0 as usize]
    }

    pub fn next(self) -> Self {
        Self(rotate_cw(self.0 as u16, MENU_LENGTH as u16) as u8)
    }

    pub fn prev(self) -> Self {
        Self(rotate_ccw(self.0 as u16, MENU_LENGTH as u16) as u8)
    }
}

pub(crate) fn rotate_cw(cursor: u16, total: u16) -> u16 {
    let total = total.max(1);
    (cursor + 1) % total
}

pub(crate) fn rotate_ccw(cursor: u16, total: u16) -> u16 {
    let total = total.max(1);
    if cursor == 0 { total - 1 } else { cursor - 1 }
}
