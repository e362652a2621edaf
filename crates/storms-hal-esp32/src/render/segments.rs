use embedded_graphics::pixelcolor::BinaryColor;
use gdeh0154d67::FrameBuffer;

use super::text::fill_rect;

/// Segment bits `a..g` (bit 0 = top, clockwise, bit 6 = middle) for 0-9.
const DIGIT_SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

#[derive(Clone, Copy, Debug)]
pub(crate) struct SegmentSize {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
}

impl SegmentSize {
    pub(crate) const LARGE: Self = Self {
        width: 40,
        height: 68,
        thickness: 7,
    };
    pub(crate) const SMALL: Self = Self {
        width: 18,
        height: 30,
        thickness: 4,
    };

    /// Horizontal advance per digit.
    pub(crate) const fn pitch(self) -> i32 {
        self.width as i32 + self.thickness as i32
    }
}

pub(crate) fn draw_digit(
    frame: &mut FrameBuffer,
    digit: u8,
    x: i32,
    y: i32,
    size: SegmentSize,
    color: BinaryColor,
) {
    let Some(mask) = DIGIT_SEGMENTS.get(digit as usize).copied() else {
        return;
    };

    let (w, h, t) = (size.width, size.height, size.thickness);
    let (wi, hi, ti) = (w as i32, h as i32, t as i32);
    let half = h / 2;
    let halfi = hi / 2;
    let bar = w.saturating_sub(2 * t);
    let post = half.saturating_sub(t);

    let segments: [(i32, i32, u32, u32); 7] = [
        (x + ti, y, bar, t),
        (x + wi - ti, y + ti, t, post),
        (x + wi - ti, y + halfi, t, post),
        (x + ti, y + hi - ti, bar, t),
        (x, y + halfi, t, post),
        (x, y + ti, t, post),
        (x + ti, y + halfi - ti / 2, bar, t),
    ];

    for (bit, (sx, sy, sw, sh)) in segments.into_iter().enumerate() {
        if mask & (1 << bit) != 0 {
            fill_rect(frame, sx, sy, sw, sh, color);
        }
    }
}

/// Two zero-padded digits; returns the x after the pair.
pub(crate) fn draw_pair(
    frame: &mut FrameBuffer,
    value: u8,
    x: i32,
    y: i32,
    size: SegmentSize,
    color: BinaryColor,
) -> i32 {
    draw_digit(frame, (value / 10) % 10, x, y, size, color);
    draw_digit(frame, value % 10, x + size.pitch(), y, size, color);
    x + 2 * size.pitch()
}

/// Colon between hour and minute pairs; returns the x after it.
pub(crate) fn draw_colon(
    frame: &mut FrameBuffer,
    x: i32,
    y: i32,
    size: SegmentSize,
    color: BinaryColor,
) -> i32 {
    let t = size.thickness;
    let ti = t as i32;
    let hi = size.height as i32;
    fill_rect(frame, x, y + hi / 3 - ti / 2, t, t, color);
    fill_rect(frame, x, y + 2 * hi / 3 - ti / 2, t, t, color);
    x + 2 * ti
}
