//! Cursor-driven time/date editor backing the "set time" screen.
//!
//! The editor only tracks data: which field is focused and the field values. Whether the
//! focused field is drawn on this frame is a separate blink phase exposed through
//! [`DigitEditor::view`].

use crate::{clock::TimeSnapshot, input::Button};

const YEAR_BASE: u16 = 2000;
const YEAR_MIN: u8 = 20;
const YEAR_MAX: u8 = 99;
const DAY_MAX: u8 = 31;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditCursor {
    Hour,
    Minute,
    Year,
    Month,
    Day,
}

impl EditCursor {
    /// `None` once the cursor moves past the last field.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Hour => Some(Self::Minute),
            Self::Minute => Some(Self::Year),
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => None,
        }
    }

    /// Clamped at [`EditCursor::Hour`].
    pub fn prev(self) -> Self {
        match self {
            Self::Hour | Self::Minute => Self::Hour,
            Self::Year => Self::Minute,
            Self::Month => Self::Year,
            Self::Day => Self::Month,
        }
    }

    fn bounds(self) -> (u8, u8) {
        match self {
            Self::Hour => (0, 23),
            Self::Minute => (0, 59),
            Self::Year => (YEAR_MIN, YEAR_MAX),
            Self::Month => (1, 12),
            // Fixed at 31 for every month.
            Self::Day => (1, DAY_MAX),
        }
    }
}

/// Field values under edit. `year` is two digits (20..=99 means 2020..=2099).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EditFields {
    pub hour: u8,
    pub minute: u8,
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl EditFields {
    fn field_mut(&mut self, cursor: EditCursor) -> &mut u8 {
        match cursor {
            EditCursor::Hour => &mut self.hour,
            EditCursor::Minute => &mut self.minute,
            EditCursor::Year => &mut self.year,
            EditCursor::Month => &mut self.month,
            EditCursor::Day => &mut self.day,
        }
    }

    pub fn full_year(&self) -> u16 {
        YEAR_BASE + self.year as u16
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditStep {
    Editing,
    Commit(TimeSnapshot),
}

/// What the set-time screen draws on one frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EditorView {
    pub fields: EditFields,
    pub focused: EditCursor,
    /// `false` on the blink-off half of the phase.
    pub focus_visible: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct DigitEditor {
    fields: EditFields,
    cursor: EditCursor,
    blink_on: bool,
}

impl DigitEditor {
    pub fn new(current: TimeSnapshot) -> Self {
        let (min, max) = EditCursor::Year.bounds();
        let year = current.year().saturating_sub(YEAR_BASE).clamp(min as u16, max as u16) as u8;

        Self {
            fields: EditFields {
                hour: current.hour.min(23),
                minute: current.minute.min(59),
                year,
                month: current.month.clamp(1, 12),
                day: current.day.clamp(1, DAY_MAX),
            },
            cursor: EditCursor::Hour,
            blink_on: false,
        }
    }

    pub fn cursor(&self) -> EditCursor {
        self.cursor
    }

    pub fn fields(&self) -> EditFields {
        self.fields
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            fields: self.fields,
            focused: self.cursor,
            focus_visible: self.blink_on,
        }
    }

    /// One editor iteration: apply at most one press, then advance the blink phase.
    ///
    /// Adjusting a field forces the focused field visible so the new value shows at once.
    pub fn step(&mut self, press: Option<Button>) -> EditStep {
        match press {
            Some(Button::Menu) => match self.cursor.next() {
                Some(next) => self.cursor = next,
                None => return EditStep::Commit(self.snapshot()),
            },
            Some(Button::Back) => self.cursor = self.cursor.prev(),
            _ => {}
        }

        self.blink_on = !self.blink_on;

        match press {
            Some(Button::Down) => {
                self.increment();
                self.blink_on = true;
            }
            Some(Button::Up) => {
                self.decrement();
                self.blink_on = true;
            }
            _ => {}
        }

        EditStep::Editing
    }

    pub fn increment(&mut self) {
        let (min, max) = self.cursor.bounds();
        let field = self.fields.field_mut(self.cursor);
        *field = if *field >= max { min } else { *field + 1 };
    }

    pub fn decrement(&mut self) {
        let (min, max) = self.cursor.bounds();
        let field = self.fields.field_mut(self.cursor);
        *field = if *field <= min { max } else { *field - 1 };
    }

    /// All five fields in one value, seconds zeroed.
    pub fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot::from_calendar(
            self.fields.full_year(),
            self.fields.month,
            self.fields.day,
            self.fields.hour,
            self.fields.minute,
            0,
        )
    }
}
