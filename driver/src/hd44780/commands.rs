//! HD44780 instruction bytes and PCF8574 pin assignments.
//!
//! These values go on the wire as-is and must match the hardware bit for bit.

// Instructions
pub const CLEAR_DISPLAY: u8 = 0x01;
pub const RETURN_HOME: u8 = 0x02;
/// Entry mode set. The base already carries the increment bit (`0x02`), as on the reference
/// board firmware, so the text direction flag cannot clear it on the wire.
pub const ENTRY_MODE_SET: u8 = 0x06;
pub const DISPLAY_CONTROL: u8 = 0x08;
pub const CURSOR_SHIFT: u8 = 0x10;
pub const FUNCTION_SET: u8 = 0x20;
pub const SET_CGRAM_ADDR: u8 = 0x40;
pub const SET_DDRAM_ADDR: u8 = 0x80;

// Entry mode flags
pub const ENTRY_RIGHT: u8 = 0x00;
pub const ENTRY_LEFT: u8 = 0x02;
pub const ENTRY_SHIFT_INCREMENT: u8 = 0x01;
pub const ENTRY_SHIFT_DECREMENT: u8 = 0x00;

// Display control flags
pub const DISPLAY_ON: u8 = 0x04;
pub const CURSOR_ON: u8 = 0x02;
pub const BLINK_ON: u8 = 0x01;

// Cursor/display shift flags
pub const DISPLAY_MOVE: u8 = 0x08;
pub const CURSOR_MOVE: u8 = 0x00;
pub const MOVE_RIGHT: u8 = 0x04;
pub const MOVE_LEFT: u8 = 0x00;

// Function set flags
pub const MODE_8BIT: u8 = 0x10;
pub const MODE_4BIT: u8 = 0x00;
pub const LINES_2: u8 = 0x08;
pub const LINES_1: u8 = 0x00;
pub const DOTS_5X10: u8 = 0x04;
pub const DOTS_5X8: u8 = 0x00;

// Expander register bits. D4..D7 sit on P4..P7.
pub const BACKLIGHT: u8 = 0x08;
pub const NO_BACKLIGHT: u8 = 0x00;
/// Enable strobe.
pub const EN: u8 = 0x04;
/// Read/write select. Always low, the driver never reads.
pub const RW: u8 = 0x02;
/// Register select. High for data, low for instructions.
pub const RS: u8 = 0x01;

/// DDRAM address of the first column of each row.
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];
