mod face;
mod screens;
mod segments;
mod text;

pub use face::SevenSegmentFace;

use gdeh0154d67::FrameBuffer;
use storms_core::render::{FaceSnapshot, Screen};

pub trait FrameRenderer {
    fn render(&mut self, screen: &Screen, frame: &mut FrameBuffer);
}

/// Draws the watch face; swap this out to restyle the face without touching other screens.
pub trait FaceRenderer {
    fn render_face(&mut self, face: &FaceSnapshot, frame: &mut FrameBuffer);
}

/// Renders every screen: the face through `F`, menus and apps in the fixed style.
#[derive(Debug)]
pub struct WatchRenderer<F = SevenSegmentFace> {
    face: F,
    ota_device_name: &'static str,
}

impl<F> WatchRenderer<F>
where
    F: FaceRenderer,
{
    pub const fn new(face: F, ota_device_name: &'static str) -> Self {
        Self {
            face,
            ota_device_name,
        }
    }

    pub fn face_mut(&mut self) -> &mut F {
        &mut self.face
    }
}

impl<F> FrameRenderer for WatchRenderer<F>
where
    F: FaceRenderer,
{
    fn render(&mut self, screen: &Screen, frame: &mut FrameBuffer) {
        match screen {
            Screen::WatchFace(face) => self.face.render_face(face, frame),
            Screen::Menu { selected } => screens::menu(frame, *selected),
            Screen::Battery { millivolts } => screens::battery(frame, *millivolts),
            Screen::Buzz => screens::buzz(frame),
            Screen::Accelerometer(view) => screens::accelerometer(frame, view),
            Screen::SetTime(view) => screens::set_time(frame, view),
            Screen::Verse { text } => screens::verse(frame, text),
            Screen::FirmwareInstructions => screens::firmware_instructions(frame),
            Screen::Firmware(view) => screens::firmware(frame, *view, self.ota_device_name),
        }
    }
}
