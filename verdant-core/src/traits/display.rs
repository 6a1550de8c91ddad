//! Two-line character display trait

use core::fmt::{self, Write};

use heapless::String;

/// Characters per display line
pub const LINE_WIDTH: usize = 16;

/// One display line, never longer than [`LINE_WIDTH`]
pub type Line = String<LINE_WIDTH>;

/// Errors that can occur driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed (NACK, arbitration loss, ...)
    Bus,
    /// Display did not respond in time
    Timeout,
}

/// Trait for a 16x2 character display
pub trait CharacterDisplay {
    /// Replace the whole screen with two lines of text
    ///
    /// Lines longer than [`LINE_WIDTH`] are truncated, shorter ones are
    /// padded with blanks.
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;

    fn render_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.render(&frame.line1, &frame.line2)
    }
}

impl<T: CharacterDisplay + ?Sized> CharacterDisplay for &mut T {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        (**self).render(line1, line2)
    }
}

/// A complete screen worth of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub line1: Line,
    pub line2: Line,
}

impl Frame {
    pub fn new(line1: &str, line2: &str) -> Self {
        Self {
            line1: truncate(line1),
            line2: truncate(line2),
        }
    }

    /// Build a frame from format arguments, truncating each line
    pub fn format(line1: fmt::Arguments<'_>, line2: fmt::Arguments<'_>) -> Self {
        Self {
            line1: format_line(line1),
            line2: format_line(line2),
        }
    }
}

/// Copy `text` into a [`Line`], dropping whatever does not fit
pub fn truncate(text: &str) -> Line {
    format_line(format_args!("{}", text))
}

/// Format into a [`Line`], dropping whatever does not fit
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut writer = Truncating(Line::new());
    // Truncating never reports an error
    let _ = writer.write_fmt(args);
    writer.0
}

struct Truncating(Line);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("Set Moisture").as_str(), "Set Moisture");
    }

    #[test]
    fn test_truncate_long() {
        let line = truncate("Calibration routine running");
        assert_eq!(line.len(), LINE_WIDTH);
        assert_eq!(line.as_str(), "Calibration rout");
    }

    #[test]
    fn test_frame_format() {
        let frame = Frame::format(format_args!("{}: Day {}", "Basil", 12), format_args!(""));
        assert_eq!(frame.line1.as_str(), "Basil: Day 12");
        assert!(frame.line2.is_empty());
    }

    #[test]
    fn test_frame_format_overflow() {
        let frame = Frame::format(
            format_args!("{}: Day {}", "Chamaedorea", 1234),
            format_args!("x"),
        );
        assert_eq!(frame.line1.as_str(), "Chamaedorea: Day");
    }
}
