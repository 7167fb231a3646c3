//! HD44780 character LCD controller.
//!
//! [HD44780Driver] is the raw instruction set, built on top of two primitives: sending an
//! instruction byte and sending a data byte. [Pcf8574Lcd] implements those primitives over a
//! PCF8574 I²C expander in 4-bit mode and adds the stateful, high-level operations on top.
//!
//! # Sources
//!
//! - Hitachi, “HD44780U (LCD-II) Dot Matrix Liquid Crystal Display Controller/Driver,” see
//!   figure 24 on page 46 for the 4-bit initialization sequence.
//! - NXP Semiconductors, “PCF8574; PCF8574A Remote 8-bit I/O expander for I²C-bus with interrupt.”
pub mod commands;
pub mod flags;
mod pcf8574;

use crate::transport::TransportResult;
use commands::*;
pub use flags::*;
pub use pcf8574::*;
use std::fmt::Debug;

/// Implementors that mirror the controller's registers must override the register setters
/// ([Self::set_entry_mode], [Self::set_display_control], [Self::function_set]) so that the
/// mirror follows what was sent.
pub trait HD44780Driver: Debug {
    /// Clears the display and sets the cursor to the home position.
    ///
    /// The controller needs up to 1.52 ms to execute this.
    fn clear_display(&mut self) -> TransportResult<()> {
        self.send_command(CLEAR_DISPLAY)
    }

    /// Sets the cursor to the home position and undoes any display shift.
    ///
    /// The controller needs up to 1.52 ms to execute this.
    fn return_home(&mut self) -> TransportResult<()> {
        self.send_command(RETURN_HOME)
    }

    /// Sets the cursor direction and whether the display shifts on write.
    fn set_entry_mode(&mut self, flags: EntryModeFlags) -> TransportResult<()> {
        self.send_command(ENTRY_MODE_SET | flags.bits())
    }

    /// Turns the display on or off, and controls the cursor and its blinking.
    fn set_display_control(&mut self, flags: ControlFlags) -> TransportResult<()> {
        self.send_command(DISPLAY_CONTROL | flags.bits())
    }

    /// Moves the cursor or shifts the whole display by one position, without touching DDRAM.
    fn cursor_shift(&mut self, display_shift: bool, direction: ScrollDirection) -> TransportResult<()> {
        let mut command = CURSOR_SHIFT;
        command |= if display_shift { DISPLAY_MOVE } else { CURSOR_MOVE };
        command |= match direction {
            ScrollDirection::Left => MOVE_LEFT,
            ScrollDirection::Right => MOVE_RIGHT,
        };
        self.send_command(command)
    }

    /// Sets the interface width, number of lines and font.
    fn function_set(&mut self, flags: FunctionFlags) -> TransportResult<()> {
        self.send_command(FUNCTION_SET | flags.bits())
    }

    /// Sets the CGRAM address. Only the low 6 bits are used.
    fn set_cgram_address(&mut self, address: u8) -> TransportResult<()> {
        self.send_command(SET_CGRAM_ADDR | (address & 0b00111111))
    }

    /// Sets the DDRAM address.
    fn set_ddram_address(&mut self, address: u8) -> TransportResult<()> {
        self.send_command(SET_DDRAM_ADDR | address)
    }

    // Low-level commands, implemented by the bus-specific driver.

    /// Sends an instruction byte (RS low).
    fn send_command(&mut self, command: u8) -> TransportResult<()>;

    /// Sends a data byte (RS high), written to CGRAM or DDRAM at the current address.
    fn send_data(&mut self, data: u8) -> TransportResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextDirection {
    /// Text flows from left to right, as for Latin scripts.
    #[default]
    LeftToRight,
    RightToLeft,
}
