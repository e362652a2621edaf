use core::fmt::{self, Write};

use embedded_graphics::{
    Drawable,
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::{Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use gdeh0154d67::FrameBuffer;
use heapless::String;

pub(crate) type Line = String<32>;

pub(crate) fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    // Overlong lines are clipped.
    let _ = line.write_fmt(args);
    line
}

/// Draws `text` with its top-left corner at `(x, y)`.
pub(crate) fn draw_text(
    frame: &mut FrameBuffer,
    text: &str,
    x: i32,
    y: i32,
    font: &MonoFont<'_>,
    color: BinaryColor,
) {
    let style = MonoTextStyle::new(font, color);
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(frame);
}

/// Left-aligned lines at a fixed pitch, starting at `y`.
pub(crate) fn draw_lines(
    frame: &mut FrameBuffer,
    lines: &[&str],
    y: i32,
    pitch: i32,
    font: &MonoFont<'_>,
    color: BinaryColor,
) {
    for (row, line) in lines.iter().enumerate() {
        draw_text(frame, line, 0, y + row as i32 * pitch, font, color);
    }
}

pub(crate) fn fill_rect(
    frame: &mut FrameBuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: BinaryColor,
) {
    let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(frame);
}

pub(crate) fn outline_rect(
    frame: &mut FrameBuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: BinaryColor,
) {
    let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
        .into_styled(PrimitiveStyle::with_stroke(color, 2))
        .draw(frame);
}

/// Greedy word wrap into lines of at most `columns` characters.
pub(crate) fn wrap(text: &str, columns: usize) -> WrapLines<'_> {
    WrapLines {
        rest: text,
        columns: columns.max(1),
    }
}

pub(crate) struct WrapLines<'a> {
    rest: &'a str,
    columns: usize,
}

impl<'a> Iterator for WrapLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }

        let mut end = 0usize;
        let mut offset = 0usize;
        for word in rest.split(' ') {
            let word_end = offset + word.len();
            if word_end > self.columns && end > 0 {
                break;
            }
            if !word.is_empty() {
                end = word_end;
            }
            offset = word_end + 1;
            if end >= self.columns {
                break;
            }
        }

        // A single word wider than the line is split hard.
        if end == 0 || end > self.columns {
            end = rest
                .char_indices()
                .nth(self.columns)
                .map_or(rest.len(), |(index, _)| index);
        }

        let (line, tail) = rest.split_at(end);
        self.rest = tail;
        Some(line.trim_end())
    }
}
