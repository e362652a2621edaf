#![cfg_attr(not(test), no_std)]

pub mod clock {
    pub mod ds3231;
}
pub mod haptics {
    pub mod motor;
}
pub mod input {
    pub mod buttons;
}
pub mod motion {
    pub mod bma423;
}
pub mod platform {
    pub mod display;
    pub mod wake;
}
pub mod power {
    pub mod battery;
}
pub mod render;
