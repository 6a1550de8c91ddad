//! 16x2 character LCD behind a PCF8574 I2C backpack
//!
//! The HD44780 protocol itself (4-bit nibble latching, init sequence,
//! backlight bit) is handled by `hd44780-driver`. This module only
//! shapes the two text rows and maps bus failures onto
//! [`DisplayError`].

use embedded_hal_02::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_02::blocking::i2c::Write;
use hd44780_driver::bus::I2CBus;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};
use heapless::String;
use verdant_core::traits::{CharacterDisplay, DisplayError, LINE_WIDTH};

/// Default backpack address (A0-A2 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// LCD driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// The controller rejected a command or the bus failed
    I2c,
}

impl From<LcdError> for DisplayError {
    fn from(e: LcdError) -> Self {
        match e {
            LcdError::I2c => DisplayError::Bus,
        }
    }
}

/// 16x2 character LCD
pub struct Lcd1602<I2C: Write, D> {
    lcd: HD44780<I2CBus<I2C>>,
    delay: D,
}

impl<I2C, D> Lcd1602<I2C, D>
where
    I2C: Write,
    D: DelayUs<u16> + DelayMs<u8>,
{
    /// Initialise the controller with the display on and no cursor
    pub fn new(i2c: I2C, mut delay: D, address: u8) -> Result<Self, LcdError> {
        let mut lcd = HD44780::new_i2c(i2c, address, &mut delay).map_err(|_| LcdError::I2c)?;
        lcd.set_display_mode(
            DisplayMode {
                display: Display::On,
                cursor_visibility: Cursor::Invisible,
                cursor_blink: CursorBlink::Off,
            },
            &mut delay,
        )
        .map_err(|_| LcdError::I2c)?;
        lcd.clear(&mut delay).map_err(|_| LcdError::I2c)?;

        Ok(Self { lcd, delay })
    }

    pub fn clear(&mut self) -> Result<(), LcdError> {
        self.lcd.clear(&mut self.delay).map_err(|_| LcdError::I2c)
    }

    /// Write one row, padding or truncating to the display width
    pub fn write_line(&mut self, row: usize, text: &str) -> Result<(), LcdError> {
        let offset = ROW_OFFSETS[row.min(ROW_OFFSETS.len() - 1)];
        self.lcd
            .set_cursor_pos(offset, &mut self.delay)
            .map_err(|_| LcdError::I2c)?;
        self.lcd
            .write_str(&padded(text), &mut self.delay)
            .map_err(|_| LcdError::I2c)
    }
}

impl<I2C, D> CharacterDisplay for Lcd1602<I2C, D>
where
    I2C: Write,
    D: DelayUs<u16> + DelayMs<u8>,
{
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.write_line(0, line1)?;
        self.write_line(1, line2)?;
        Ok(())
    }
}

/// Exactly one row of ASCII; anything the character ROM lacks shows as `?`
fn padded(text: &str) -> String<LINE_WIDTH> {
    let mut line = String::new();
    let mut chars = text.chars();
    for _ in 0..LINE_WIDTH {
        let c = match chars.next() {
            Some(c) if c.is_ascii() && !c.is_ascii_control() => c,
            Some(_) => '?',
            None => ' ',
        };
        // capacity is LINE_WIDTH
        let _ = line.push(c);
    }
    line
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::RefCell;
    use std::vec::Vec;

    const RS: u8 = 0x01;
    const ENABLE: u8 = 0x04;

    /// Records every byte sent to the backpack
    struct MockI2c<'a> {
        log: &'a RefCell<Vec<(u8, u8)>>,
    }

    impl Write for MockI2c<'_> {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
            self.log
                .borrow_mut()
                .extend(bytes.iter().map(|b| (address, *b)));
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayUs<u16> for NoDelay {
        fn delay_us(&mut self, _us: u16) {}
    }

    impl DelayMs<u8> for NoDelay {
        fn delay_ms(&mut self, _ms: u8) {}
    }

    /// Bytes the controller latched on each falling edge of E, tagged
    /// with RS
    fn latched(log: &[(u8, u8)]) -> Vec<(bool, u8)> {
        let nibbles: Vec<u8> = log
            .windows(2)
            .filter(|pair| pair[0].1 & ENABLE != 0 && pair[1].1 & ENABLE == 0)
            .map(|pair| pair[0].1)
            .collect();
        nibbles
            .chunks_exact(2)
            .map(|pair| (pair[0] & RS != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    /// Render one frame on a fresh display, returning the commands and
    /// characters it produced
    fn rendered(line1: &str, line2: &str) -> (Vec<u8>, Vec<u8>) {
        let log = RefCell::new(Vec::new());
        let mut lcd = Lcd1602::new(MockI2c { log: &log }, NoDelay, DEFAULT_ADDRESS).unwrap();
        log.borrow_mut().clear();
        lcd.render(line1, line2).unwrap();

        let log = log.borrow();
        assert!(log.iter().all(|(address, _)| *address == DEFAULT_ADDRESS));
        let latched = latched(&log);
        let commands = latched.iter().filter(|(rs, _)| !rs).map(|(_, b)| *b).collect();
        let text = latched.iter().filter(|(rs, _)| *rs).map(|(_, b)| *b).collect();
        (commands, text)
    }

    #[test]
    fn test_render_pads_lines() {
        let (commands, text) = rendered("Set Moisture", "   New: 40%");
        assert_eq!(commands, [0x80, 0xC0]);
        assert_eq!(&text[..16], b"Set Moisture    ");
        assert_eq!(&text[16..], b"   New: 40%     ");
    }

    #[test]
    fn test_render_truncates_long_line() {
        let (_, text) = rendered("Chamaedorea: Day 123", "");
        assert_eq!(text.len(), 2 * LINE_WIDTH);
        assert_eq!(&text[..16], b"Chamaedorea: Day");
    }

    #[test]
    fn test_padded_replaces_non_ascii() {
        assert_eq!(padded("21°C").as_str(), "21?C            ");
        assert_eq!(padded("").len(), LINE_WIDTH);
    }

    #[test]
    fn test_error_maps_to_bus() {
        assert_eq!(DisplayError::from(LcdError::I2c), DisplayError::Bus);
    }
}
