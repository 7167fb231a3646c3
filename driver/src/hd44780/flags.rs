//! The three register groups the driver keeps a copy of.
//!
//! The controller cannot be read back, so the driver mirrors each group and always sends the
//! whole group after changing any bit of it.
use crate::config::CharSize;
use crate::hd44780::commands::*;

/// Function set flags: bus width, line count, font.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FunctionFlags(u8);

impl FunctionFlags {
    /// Computes the flags for a display with `rows` rows. The 5x10 font is only honored on
    /// single-line displays. The bus width is always 4 bits.
    pub fn for_geometry(rows: u8, char_size: CharSize) -> Self {
        let mut bits = MODE_4BIT | LINES_1 | DOTS_5X8;
        if rows > 1 {
            bits |= LINES_2;
        }
        if char_size == CharSize::Dots5x10 && rows == 1 {
            bits |= DOTS_5X10;
        }
        FunctionFlags(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn two_lines(&self) -> bool {
        self.0 & LINES_2 != 0
    }

    pub fn tall_font(&self) -> bool {
        self.0 & DOTS_5X10 != 0
    }
}

/// Display on/off control flags.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ControlFlags(u8);

impl ControlFlags {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn display(&self) -> bool {
        self.0 & DISPLAY_ON != 0
    }

    pub fn cursor(&self) -> bool {
        self.0 & CURSOR_ON != 0
    }

    pub fn blink(&self) -> bool {
        self.0 & BLINK_ON != 0
    }

    pub fn set_display(&mut self, on: bool) {
        set_bit(&mut self.0, DISPLAY_ON, on);
    }

    pub fn set_cursor(&mut self, on: bool) {
        set_bit(&mut self.0, CURSOR_ON, on);
    }

    pub fn set_blink(&mut self, on: bool) {
        set_bit(&mut self.0, BLINK_ON, on);
    }
}

/// Entry mode flags: text direction and autoscroll.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EntryModeFlags(u8);

impl EntryModeFlags {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn left_to_right(&self) -> bool {
        self.0 & ENTRY_LEFT != 0
    }

    pub fn autoscroll(&self) -> bool {
        self.0 & ENTRY_SHIFT_INCREMENT != 0
    }

    pub fn set_left_to_right(&mut self, left_to_right: bool) {
        set_bit(&mut self.0, ENTRY_LEFT, left_to_right);
    }

    pub fn set_autoscroll(&mut self, on: bool) {
        set_bit(&mut self.0, ENTRY_SHIFT_INCREMENT, on);
    }
}

fn set_bit(bits: &mut u8, mask: u8, on: bool) {
    if on {
        *bits |= mask;
    } else {
        *bits &= !mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_flags_follow_geometry() {
        assert_eq!(FunctionFlags::for_geometry(1, CharSize::Dots5x8).bits(), 0x00);
        assert_eq!(FunctionFlags::for_geometry(2, CharSize::Dots5x8).bits(), 0x08);
        assert_eq!(FunctionFlags::for_geometry(4, CharSize::Dots5x8).bits(), 0x08);
        assert_eq!(FunctionFlags::for_geometry(1, CharSize::Dots5x10).bits(), 0x04);
        // The tall font is dropped on multi-line displays.
        let flags = FunctionFlags::for_geometry(2, CharSize::Dots5x10);
        assert!(flags.two_lines());
        assert!(!flags.tall_font());
    }

    #[test]
    fn control_bits_are_independent() {
        let mut flags = ControlFlags::default();
        flags.set_display(true);
        flags.set_blink(true);
        assert_eq!(flags.bits(), DISPLAY_ON | BLINK_ON);
        flags.set_display(false);
        assert_eq!(flags.bits(), BLINK_ON);
        assert!(!flags.display());
        assert!(!flags.cursor());
        assert!(flags.blink());
    }

    #[test]
    fn entry_mode_bits() {
        let mut flags = EntryModeFlags::default();
        flags.set_left_to_right(true);
        flags.set_autoscroll(true);
        assert_eq!(flags.bits(), 0x03);
        flags.set_left_to_right(false);
        assert!(!flags.left_to_right());
        assert!(flags.autoscroll());
    }
}
