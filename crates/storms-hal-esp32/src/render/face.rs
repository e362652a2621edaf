use embedded_graphics::{
    Drawable,
    mono_font::ascii::{FONT_6X10, FONT_9X18_BOLD, FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::{Point, Primitive},
    primitives::{Circle, Line, PrimitiveStyle},
};
use gdeh0154d67::FrameBuffer;
use storms_core::{
    render::FaceSnapshot,
    weather::{TemperatureUnit, WeatherIcon},
};

use super::{
    FaceRenderer,
    segments::{SegmentSize, draw_colon, draw_pair},
    text::{draw_text, fill_rect, format_line, outline_rect},
};

const TIME_Y: i32 = 6;
const BATTERY_X: i32 = 154;
const BATTERY_Y: i32 = 84;
const BATTERY_SEGMENT_WIDTH: u32 = 7;
const BATTERY_SEGMENT_HEIGHT: u32 = 11;
const BATTERY_SEGMENT_SPACING: i32 = 9;
const ICON_X: i32 = 152;
const ICON_Y: i32 = 146;

/// Default watch face: seven-segment time over a date column, sensor readouts on the right.
#[derive(Debug, Default, Clone, Copy)]
pub struct SevenSegmentFace;

impl FaceRenderer for SevenSegmentFace {
    fn render_face(&mut self, face: &FaceSnapshot, frame: &mut FrameBuffer) {
        frame.fill(face.dark_mode);
        let ink = BinaryColor::from(!face.dark_mode);

        let size = SegmentSize::LARGE;
        let x = draw_pair(frame, face.time.hour, 4, TIME_Y, size, ink);
        let x = draw_colon(frame, x - 2, TIME_Y, size, ink);
        draw_pair(frame, face.time.minute, x, TIME_Y, size, ink);

        draw_date(frame, face, ink);
        draw_battery(frame, face.battery_segments, ink);
        draw_weather(frame, face, ink);

        let steps = format_line(format_args!("STEPS {}", face.steps));
        draw_text(frame, &steps, 4, 178, &FONT_9X18_BOLD, ink);
        if face.ble_configured {
            draw_text(frame, "BT", 172, 178, &FONT_9X18_BOLD, ink);
        }
        if face.wifi_configured {
            draw_text(frame, "W", 160, 182, &FONT_6X10, ink);
        }
    }
}

fn draw_date(frame: &mut FrameBuffer, face: &FaceSnapshot, ink: BinaryColor) {
    let time = face.time;
    draw_text(frame, time.weekday_name(), 4, 84, &FONT_9X18_BOLD, ink);

    let day = format_line(format_args!("{} {:02}", time.month_short_name(), time.day));
    draw_text(frame, &day, 4, 108, &FONT_10X20, ink);

    let year = format_line(format_args!("{}", time.year()));
    draw_text(frame, &year, 4, 132, &FONT_10X20, ink);
}

fn draw_battery(frame: &mut FrameBuffer, segments: u8, ink: BinaryColor) {
    outline_rect(frame, BATTERY_X, BATTERY_Y, 33, 21, ink);
    fill_rect(frame, BATTERY_X + 33, BATTERY_Y + 6, 4, 9, ink);
    for segment in 0..segments.min(3) as i32 {
        fill_rect(
            frame,
            BATTERY_X + 5 + segment * BATTERY_SEGMENT_SPACING,
            BATTERY_Y + 5,
            BATTERY_SEGMENT_WIDTH,
            BATTERY_SEGMENT_HEIGHT,
            ink,
        );
    }
}

fn draw_weather(frame: &mut FrameBuffer, face: &FaceSnapshot, ink: BinaryColor) {
    let unit = match face.weather.unit {
        TemperatureUnit::Metric => 'C',
        TemperatureUnit::Imperial => 'F',
    };

    if let Some(sensor) = face.sensor_temperature {
        let line = format_line(format_args!("{:>3}{}", sensor, unit));
        draw_text(frame, &line, 150, 112, &FONT_9X18_BOLD, ink);
    }
    let line = format_line(format_args!("{:>3}{}", face.weather.temperature, unit));
    draw_text(frame, &line, 110, 146, &FONT_10X20, ink);

    if let Some(icon) = face.weather.icon() {
        draw_icon(frame, icon, ICON_X, ICON_Y, ink);
    }
}

fn draw_icon(frame: &mut FrameBuffer, icon: WeatherIcon, x: i32, y: i32, ink: BinaryColor) {
    match icon {
        WeatherIcon::Clear => {
            let _ = Circle::new(Point::new(x + 10, y), 20)
                .into_styled(PrimitiveStyle::with_stroke(ink, 3))
                .draw(frame);
        }
        WeatherIcon::FewClouds => {
            let _ = Circle::new(Point::new(x + 20, y - 2), 14)
                .into_styled(PrimitiveStyle::with_stroke(ink, 2))
                .draw(frame);
            draw_cloud(frame, x, y + 6, ink);
        }
        WeatherIcon::Cloudy => draw_cloud(frame, x, y + 2, ink),
        WeatherIcon::Rain => {
            draw_cloud(frame, x, y, ink);
            for drop in 0..3 {
                let dx = x + 8 + drop * 9;
                let _ = Line::new(Point::new(dx, y + 20), Point::new(dx - 3, y + 27))
                    .into_styled(PrimitiveStyle::with_stroke(ink, 2))
                    .draw(frame);
            }
        }
        WeatherIcon::Snow => {
            draw_cloud(frame, x, y, ink);
            for flake in 0..3 {
                fill_rect(frame, x + 7 + flake * 9, y + 22, 3, 3, ink);
            }
        }
    }
}

fn draw_cloud(frame: &mut FrameBuffer, x: i32, y: i32, ink: BinaryColor) {
    let style = PrimitiveStyle::with_fill(ink);
    let _ = Circle::new(Point::new(x, y + 6), 14)
        .into_styled(style)
        .draw(frame);
    let _ = Circle::new(Point::new(x + 9, y), 20)
        .into_styled(style)
        .draw(frame);
    fill_rect(frame, x + 6, y + 10, 30, 10, ink);
}
