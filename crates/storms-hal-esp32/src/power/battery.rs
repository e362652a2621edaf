//! Battery voltage from the ESP32 ADC behind the board's divider.

/// Full-scale reading of the 12-bit ADC.
pub const ADC_FULL_SCALE: u32 = 4_096;
/// Battery millivolts at full scale (divider and 11 dB attenuation).
pub const FULL_SCALE_MV: u32 = 7_230;

pub fn millivolts_from_raw(raw: u16) -> u16 {
    (raw as u32 * FULL_SCALE_MV / ADC_FULL_SCALE).min(u16::MAX as u32) as u16
}
