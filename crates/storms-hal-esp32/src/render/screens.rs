use embedded_graphics::{mono_font::ascii::FONT_9X18_BOLD, pixelcolor::BinaryColor};
use gdeh0154d67::FrameBuffer;
use storms_core::{
    editor::{EditCursor, EditorView},
    firmware::FirmwareView,
    menu::{MENU_LABELS, MenuIndex},
    render::AccelView,
};

use super::{
    segments::{SegmentSize, draw_colon, draw_pair},
    text::{draw_lines, draw_text, fill_rect, format_line, wrap},
};

/// Menus and apps are white text on black.
const TEXT: BinaryColor = BinaryColor::Off;
const BACKGROUND: bool = true;

const LINE_PITCH: i32 = 20;
const MENU_TOP: i32 = 16;
const MENU_PITCH: i32 = 25;
const VERSE_COLUMNS: usize = 22;
const VERSE_MAX_LINES: usize = 10;

pub(crate) fn menu(frame: &mut FrameBuffer, selected: MenuIndex) {
    frame.fill(BACKGROUND);
    for (index, label) in MENU_LABELS.iter().enumerate() {
        let y = MENU_TOP + index as i32 * MENU_PITCH;
        if index == selected.get() as usize {
            fill_rect(frame, 0, y - 4, 200, 24, TEXT);
            draw_text(frame, label, 2, y, &FONT_9X18_BOLD, BinaryColor::On);
        } else {
            draw_text(frame, label, 2, y, &FONT_9X18_BOLD, TEXT);
        }
    }
}

pub(crate) fn battery(frame: &mut FrameBuffer, millivolts: u16) {
    frame.fill(BACKGROUND);
    draw_text(frame, "Battery Voltage:", 20, 20, &FONT_9X18_BOLD, TEXT);
    let volts = format_line(format_args!(
        "{}.{:02}V",
        millivolts / 1000,
        (millivolts % 1000) / 10
    ));
    draw_text(frame, &volts, 70, 70, &FONT_9X18_BOLD, TEXT);
}

pub(crate) fn buzz(frame: &mut FrameBuffer) {
    frame.fill(BACKGROUND);
    draw_text(frame, "Buzz!", 70, 70, &FONT_9X18_BOLD, TEXT);
}

pub(crate) fn accelerometer(frame: &mut FrameBuffer, view: &AccelView) {
    frame.fill(BACKGROUND);

    let Some(reading) = view.reading else {
        draw_text(frame, "getAccel FAIL", 0, 20, &FONT_9X18_BOLD, TEXT);
        return;
    };

    for (row, (axis, value)) in [("X", reading.x), ("Y", reading.y), ("Z", reading.z)]
        .into_iter()
        .enumerate()
    {
        let line = format_line(format_args!("  {}:{}", axis, value));
        draw_text(frame, &line, 0, 20 + row as i32 * LINE_PITCH, &FONT_9X18_BOLD, TEXT);
    }

    let orientation = view.orientation.map_or("ERROR!!!", |o| o.label());
    draw_text(frame, orientation, 30, 100, &FONT_9X18_BOLD, TEXT);

    if let Some(errors) = view.errors {
        let flags = [
            (errors.fatal, "Fatal error"),
            (errors.error_code, "Error code"),
            (errors.command, "Cmd error"),
            (errors.aux, "Aux error"),
        ];
        let mut y = 124;
        for (_, label) in flags.iter().filter(|(set, _)| *set) {
            draw_text(frame, label, 40, y, &FONT_9X18_BOLD, TEXT);
            y += LINE_PITCH;
        }
    }
}

pub(crate) fn set_time(frame: &mut FrameBuffer, view: &EditorView) {
    frame.fill(BACKGROUND);

    let shown = |cursor: EditCursor| view.focused != cursor || view.focus_visible;
    let fields = view.fields;
    let size = SegmentSize::LARGE;
    let y = 30;

    let x = 4;
    if shown(EditCursor::Hour) {
        draw_pair(frame, fields.hour, x, y, size, TEXT);
    }
    let x = draw_colon(frame, x + 2 * size.pitch() - 2, y, size, TEXT);
    if shown(EditCursor::Minute) {
        draw_pair(frame, fields.minute, x, y, size, TEXT);
    }

    let date_y = 140;
    if shown(EditCursor::Year) {
        let year = format_line(format_args!("{}", fields.full_year()));
        draw_text(frame, &year, 45, date_y, &FONT_9X18_BOLD, TEXT);
    }
    draw_text(frame, "/", 81, date_y, &FONT_9X18_BOLD, TEXT);
    if shown(EditCursor::Month) {
        let month = format_line(format_args!("{:02}", fields.month));
        draw_text(frame, &month, 90, date_y, &FONT_9X18_BOLD, TEXT);
    }
    draw_text(frame, "/", 108, date_y, &FONT_9X18_BOLD, TEXT);
    if shown(EditCursor::Day) {
        let day = format_line(format_args!("{:02}", fields.day));
        draw_text(frame, &day, 117, date_y, &FONT_9X18_BOLD, TEXT);
    }
}

pub(crate) fn verse(frame: &mut FrameBuffer, text: &str) {
    frame.fill(BACKGROUND);
    for (row, line) in wrap(text, VERSE_COLUMNS).take(VERSE_MAX_LINES).enumerate() {
        draw_text(frame, line, 0, 4 + row as i32 * LINE_PITCH, &FONT_9X18_BOLD, TEXT);
    }
}

pub(crate) fn firmware_instructions(frame: &mut FrameBuffer) {
    frame.fill(BACKGROUND);
    draw_lines(
        frame,
        &[
            "Please Visit",
            "watchy.sqfmi.com",
            "with a Bluetooth",
            "enabled device",
            "",
            "Press menu button",
            "again when ready",
            "",
            "Keep USB powered",
        ],
        16,
        LINE_PITCH,
        &FONT_9X18_BOLD,
        TEXT,
    );
}

pub(crate) fn firmware(frame: &mut FrameBuffer, view: FirmwareView, device_name: &str) {
    frame.fill(BACKGROUND);
    let mut lines =
        |text: &[&str]| draw_lines(frame, text, 16, LINE_PITCH, &FONT_9X18_BOLD, TEXT);
    match view {
        FirmwareView::Waiting => lines(&[
            "Bluetooth Started",
            "",
            device_name,
            "",
            "Waiting for",
            "connection...",
        ]),
        FirmwareView::Connected => lines(&["BLE Connected!", "", "Waiting for", "upload..."]),
        FirmwareView::Downloading { bytes } => {
            let count = format_line(format_args!("{} bytes", bytes));
            lines(&["Downloading", "firmware:", "", count.as_str()]);
        }
        FirmwareView::Rebooting => lines(&["Download", "completed!", "", "Rebooting..."]),
        FirmwareView::Exiting => lines(&["BLE Disconnected!", "", "exiting..."]),
    }
}
