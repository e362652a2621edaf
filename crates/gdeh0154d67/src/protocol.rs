//! SSD1681 command set and parameter packing for the 200x200 GDEH0154D67 panel.

/// Panel width in pixels.
pub const WIDTH: usize = 200;
/// Panel height in pixels.
pub const HEIGHT: usize = 200;
/// Bytes per row of 1bpp pixels.
pub const LINE_BYTES: usize = WIDTH / 8;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = LINE_BYTES * HEIGHT;

pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
pub const DEEP_SLEEP_MODE: u8 = 0x10;
pub const DATA_ENTRY_MODE: u8 = 0x11;
pub const SW_RESET: u8 = 0x12;
pub const TEMPERATURE_SENSOR: u8 = 0x18;
pub const MASTER_ACTIVATION: u8 = 0x20;
pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
pub const WRITE_RAM_BW: u8 = 0x24;
pub const WRITE_RAM_PREVIOUS: u8 = 0x26;
pub const BORDER_WAVEFORM: u8 = 0x3C;
pub const RAM_X_WINDOW: u8 = 0x44;
pub const RAM_Y_WINDOW: u8 = 0x45;
pub const RAM_X_COUNTER: u8 = 0x4E;
pub const RAM_Y_COUNTER: u8 = 0x4F;

/// X and Y increment, address counter updated in X direction.
pub const DATA_ENTRY_X_INC_Y_INC: u8 = 0x03;
/// Internal temperature sensor.
pub const TEMPERATURE_INTERNAL: u8 = 0x80;
/// Deep sleep mode 1: RAM retained, only a hardware reset wakes the controller.
pub const DEEP_SLEEP_RETAIN_RAM: u8 = 0x01;

/// Update sequence: clock on, analog on, load temperature and LUT, full waveform, off.
pub const UPDATE_FULL: u8 = 0xF7;
/// Update sequence using the mode-2 (differential) waveform against previous RAM.
pub const UPDATE_PARTIAL: u8 = 0xFC;
/// Power down clock and analog without displaying.
pub const UPDATE_POWER_OFF: u8 = 0x83;

/// Gate count minus one, low byte first, scan order bits cleared.
pub const fn driver_output_control() -> [u8; 3] {
    let gates = (HEIGHT - 1) as u16;
    [(gates & 0xFF) as u8, (gates >> 8) as u8, 0x00]
}

/// RAM X window in bytes (start, end).
pub const fn ram_x_window() -> [u8; 2] {
    [0x00, (LINE_BYTES - 1) as u8]
}

/// RAM Y window in gates (start lo, start hi, end lo, end hi).
pub const fn ram_y_window() -> [u8; 4] {
    let end = (HEIGHT - 1) as u16;
    [0x00, 0x00, (end & 0xFF) as u8, (end >> 8) as u8]
}

/// Display update control byte for the requested refresh.
pub const fn update_sequence(partial: bool) -> u8 {
    if partial { UPDATE_PARTIAL } else { UPDATE_FULL }
}

/// Controller RAM stores white as 1; framebuffer rows store "ink" as 1.
pub fn to_ram_row(row: &[u8; LINE_BYTES]) -> [u8; LINE_BYTES] {
    let mut out = [0u8; LINE_BYTES];
    for (dst, src) in out.iter_mut().zip(row.iter()) {
        *dst = !*src;
    }
    out
}
