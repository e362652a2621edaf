//! 1bpp in-memory image for the panel.

use core::convert::TryFrom;

use crate::protocol::{BUFFER_SIZE, HEIGHT, LINE_BYTES, WIDTH};

/// 1bpp framebuffer, one bit per pixel, `1` = ink (black).
///
/// Rows are 0-based; bit 7 of each byte is the leftmost pixel.
#[derive(Clone)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a blank (all white) framebuffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BUFFER_SIZE],
        }
    }

    pub fn bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Fills with ink (`true`) or paper (`false`).
    pub fn fill(&mut self, ink: bool) {
        self.bytes.fill(if ink { 0xFF } else { 0x00 });
    }

    /// Returns `false` when the pixel is off-panel.
    pub fn set_pixel(&mut self, x: usize, y: usize, ink: bool) -> bool {
        let Some((index, mask)) = locate(x, y) else {
            return false;
        };

        if ink {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        let (index, mask) = locate(x, y)?;
        Some(self.bytes[index] & mask != 0)
    }

    pub fn row(&self, y: usize) -> Option<&[u8; LINE_BYTES]> {
        if y >= HEIGHT {
            return None;
        }
        let start = y * LINE_BYTES;
        <&[u8; LINE_BYTES]>::try_from(&self.bytes[start..start + LINE_BYTES]).ok()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8; LINE_BYTES]> {
        (0..HEIGHT).filter_map(|y| self.row(y))
    }

    /// Swaps ink and paper over the whole image.
    pub fn invert(&mut self) {
        for byte in self.bytes.iter_mut() {
            *byte = !*byte;
        }
    }
}

fn locate(x: usize, y: usize) -> Option<(usize, u8)> {
    if x >= WIDTH || y >= HEIGHT {
        return None;
    }
    Some((y * LINE_BYTES + x / 8, 1u8 << (7 - (x % 8))))
}
