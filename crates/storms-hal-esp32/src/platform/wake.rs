//! Translation of the ESP32 ext1 wake status into GPIO bit masks.

/// `(rtc io channel, gpio)` for every RTC-capable pad on the ESP32.
const RTCIO_CHANNELS: [(u8, u8); 18] = [
    (0, 36),
    (1, 37),
    (2, 38),
    (3, 39),
    (4, 34),
    (5, 35),
    (6, 25),
    (7, 26),
    (8, 33),
    (9, 32),
    (10, 4),
    (11, 0),
    (12, 2),
    (13, 15),
    (14, 13),
    (15, 12),
    (16, 14),
    (17, 27),
];

/// Converts an `ext_wakeup1_status` value (one bit per RTC IO channel) into a mask with
/// `1 << gpio` set for each pad that triggered the wake.
pub fn gpio_mask_from_rtcio_status(status: u32) -> u64 {
    RTCIO_CHANNELS
        .iter()
        .filter(|(channel, _)| status & (1 << channel) != 0)
        .fold(0u64, |mask, (_, gpio)| mask | (1u64 << gpio))
}
