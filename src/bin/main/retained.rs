use storms_core::retained::RETAINED_RECORD_LEN;

/// Survives deep sleep; the record carries its own magic and checksum, so garbage after a
/// power cycle is rejected on decode.
#[esp_hal::ram(unstable(rtc_fast, persistent))]
static mut RETAINED: [u8; RETAINED_RECORD_LEN] = [0; RETAINED_RECORD_LEN];

pub(super) fn load() -> [u8; RETAINED_RECORD_LEN] {
    // SAFETY: single core, read before any other access in this wake.
    unsafe { (&raw const RETAINED).read() }
}

pub(super) fn store(record: [u8; RETAINED_RECORD_LEN]) {
    // SAFETY: single core, written once right before sleep.
    unsafe { (&raw mut RETAINED).write(record) }
}
