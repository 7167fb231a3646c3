use crate::config::{CharSize, ConfigError, DisplayConfig};
use crate::hd44780::commands::*;
use crate::hd44780::flags::{ControlFlags, EntryModeFlags, FunctionFlags};
use crate::hd44780::{HD44780Driver, ScrollDirection, TextDirection};
use crate::transport::{TransportError, TransportResult};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, trace, warn};
use std::fmt::{self, Debug, Formatter};

/// Worst-case time for the supply to rise after power-on. The datasheet asks for 40 ms.
const POWER_UP_DELAY_MS: u32 = 50;
/// Settle time after forcing the expander lines low, before the first nibble.
const EXPANDER_SETTLE_DELAY_MS: u32 = 1000;
/// Waits after the first two, and the third, `0x3` nibbles of the 4-bit reset sequence.
const RESET_RETRY_DELAY_US: u32 = 4500;
const RESET_FINAL_DELAY_US: u32 = 150;
/// Enable pulse width, the controller needs 450 ns.
const ENABLE_PULSE_US: u32 = 1;
/// Instructions need 37 µs to execute after enable falls.
const COMMAND_SETTLE_US: u32 = 50;
/// Clear display and return home need 1.52 ms.
const LONG_COMMAND_DELAY_US: u32 = 2000;

/// HD44780 display driven through a PCF8574 I²C expander.
///
/// The expander's 8-bit output register carries everything at once: the upper nibble is the
/// controller's D4..D7 data bus, and the lower nibble holds the backlight, enable, read/write
/// and register select lines. Each byte sent to the controller therefore costs two nibble
/// transfers, and each nibble transfer three expander writes (setup, enable high, enable low).
///
/// The controller's state cannot be read back, so the driver keeps its own copy of the
/// function set, display control and entry mode registers, and resends a whole register every
/// time one of its bits changes.
///
/// Creating the driver does not touch the hardware. [Self::begin] must be called once before
/// anything else, and again after any transport error, since a failed transfer can leave the
/// controller halfway through a byte.
///
/// The driver assumes it is the only one talking to the expander between [Self::begin] and
/// the last operation. The bus is taken as acquired once it is handed to [Self::new].
pub struct Pcf8574Lcd<I: I2c, D: DelayNs> {
    i2c: I,
    delay: D,
    config: DisplayConfig,

    function: FunctionFlags,
    control: ControlFlags,
    entry_mode: EntryModeFlags,
    backlight: u8,
}

impl<I: I2c, D: DelayNs> Pcf8574Lcd<I, D> {
    /// Creates a new driver for the display described by `config`.
    ///
    /// The backlight is on by default.
    ///
    /// # Errors
    /// - Any [ConfigError] from [DisplayConfig::validate].
    pub fn new(config: DisplayConfig, i2c: I, delay: D) -> Result<Self, ConfigError> {
        config.validate()?;

        if config.char_size == CharSize::Dots5x10 && config.rows > 1 {
            warn!("5x10 font is only available on single-line displays, using 5x8");
        }

        Ok(Pcf8574Lcd {
            i2c,
            delay,
            config,
            function: FunctionFlags::for_geometry(config.rows, config.char_size),
            control: ControlFlags::default(),
            entry_mode: EntryModeFlags::default(),
            backlight: BACKLIGHT,
        })
    }

    /// Runs the power-up sequence and puts the display into a known state: 4-bit interface,
    /// display on, no cursor, no blinking, cleared, left-to-right text without autoscroll,
    /// cursor at home.
    ///
    /// The controller may have been left in either 8-bit or 4-bit mode, possibly halfway
    /// through a byte, so the reset follows the datasheet's recovery path: three `0x3` nibbles
    /// with the retry delays in between, then a `0x2` nibble to switch to 4 bits.
    ///
    /// Takes a little over a second.
    pub fn begin(&mut self) -> TransportResult<()> {
        debug!(
            "Initializing {}x{} display at {:#04x}",
            self.config.cols, self.config.rows, self.config.address
        );

        self.delay.delay_ms(POWER_UP_DELAY_MS);

        // Pull RS, RW and E low
        self.expander_write(self.backlight)?;
        self.delay.delay_ms(EXPANDER_SETTLE_DELAY_MS);

        // Synchronize
        self.write_nibble(0x03 << 4)?;
        self.delay.delay_us(RESET_RETRY_DELAY_US);
        self.write_nibble(0x03 << 4)?;
        self.delay.delay_us(RESET_RETRY_DELAY_US);
        self.write_nibble(0x03 << 4)?;
        self.delay.delay_us(RESET_FINAL_DELAY_US);
        self.write_nibble(0x02 << 4)?;
        debug!("Controller is in 4-bit mode");

        self.function_set(self.function)?;

        self.control = ControlFlags::default();
        self.control.set_display(true);
        self.set_display_control(self.control)?;

        self.clear()?;

        self.entry_mode = EntryModeFlags::default();
        self.entry_mode.set_left_to_right(true);
        self.entry_mode.set_autoscroll(false);
        self.set_entry_mode(self.entry_mode)?;

        self.home()?;

        debug!("Display initialized");
        Ok(())
    }

    /// Clears the display and moves the cursor home.
    pub fn clear(&mut self) -> TransportResult<()> {
        self.clear_display()?;
        self.delay.delay_us(LONG_COMMAND_DELAY_US);
        Ok(())
    }

    /// Moves the cursor home and undoes any scrolling.
    pub fn home(&mut self) -> TransportResult<()> {
        self.return_home()?;
        self.delay.delay_us(LONG_COMMAND_DELAY_US);
        Ok(())
    }

    /// Shows or hides the display contents. DDRAM and the backlight are left untouched.
    pub fn set_display(&mut self, on: bool) -> TransportResult<()> {
        self.control.set_display(on);
        self.set_display_control(self.control)
    }

    /// Shows or hides the underline cursor.
    pub fn set_cursor(&mut self, on: bool) -> TransportResult<()> {
        self.control.set_cursor(on);
        self.set_display_control(self.control)
    }

    /// Turns blinking of the cursor position on or off.
    pub fn set_blink(&mut self, on: bool) -> TransportResult<()> {
        self.control.set_blink(on);
        self.set_display_control(self.control)
    }

    pub fn set_entry_direction(&mut self, direction: TextDirection) -> TransportResult<()> {
        self.entry_mode
            .set_left_to_right(direction == TextDirection::LeftToRight);
        self.set_entry_mode(self.entry_mode)
    }

    /// With autoscroll on, the display shifts on every write, so text appears to be
    /// right-justified at the cursor.
    pub fn set_autoscroll(&mut self, on: bool) -> TransportResult<()> {
        self.entry_mode.set_autoscroll(on);
        self.set_entry_mode(self.entry_mode)
    }

    /// Shifts the whole display one position without changing DDRAM.
    pub fn scroll(&mut self, direction: ScrollDirection) -> TransportResult<()> {
        self.cursor_shift(true, direction)
    }

    /// Moves the cursor one position without writing anything.
    pub fn move_cursor(&mut self, direction: ScrollDirection) -> TransportResult<()> {
        self.cursor_shift(false, direction)
    }

    /// Turns the backlight on or off. Takes effect immediately, with a bare expander write.
    pub fn set_backlight(&mut self, on: bool) -> TransportResult<()> {
        self.backlight = if on { BACKLIGHT } else { NO_BACKLIGHT };
        self.expander_write(0)
    }

    /// Moves the cursor to `col` on `row`, both zero-based.
    ///
    /// A row past the configured row count is moved to the last row. Note the comparison is
    /// `row > rows`, so `row == rows` is passed through unchanged and lands on the DDRAM row
    /// that follows the last configured one.
    pub fn set_cursor_position(&mut self, col: u8, row: u8) -> TransportResult<()> {
        let mut row = row;
        if row > self.config.rows {
            row = self.config.rows - 1;
        }
        let row = usize::from(row).min(ROW_OFFSETS.len() - 1);
        self.set_ddram_address(col.wrapping_add(ROW_OFFSETS[row]))
    }

    /// Stores a custom 5x8 glyph in CGRAM `slot` (0 to 7). Each pattern byte is one pixel row,
    /// top to bottom, using the low 5 bits. Write the slot number as a character to show it.
    ///
    /// The cursor is left in CGRAM, so set a position or clear before writing text again.
    pub fn define_glyph(&mut self, slot: u8, pattern: &[u8; 8]) -> TransportResult<()> {
        if slot > 7 {
            warn!("Glyph slot {} out of range, using {}", slot, slot & 0x7);
        }
        let slot = slot & 0x7;
        self.set_cgram_address(slot << 3)?;
        for &row in pattern {
            self.send_data(row)?;
        }
        Ok(())
    }

    /// Writes one character code at the cursor.
    pub fn write_char(&mut self, char: u8) -> TransportResult<()> {
        self.send_data(char)
    }

    /// Writes the bytes of `text` at the cursor.
    ///
    /// The controller's character ROM only matches ASCII in the printable range, so other
    /// characters come out as whatever the ROM has at their UTF-8 byte values.
    pub fn write_text(&mut self, text: &str) -> TransportResult<()> {
        for byte in text.bytes() {
            self.write_char(byte)?;
        }
        Ok(())
    }

    /// Sends a raw instruction byte. The mirrored registers are not updated, so use the
    /// [HD44780Driver] setters for register changes that later operations should build on.
    pub fn command(&mut self, command: u8) -> TransportResult<()> {
        self.send_command(command)
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn backlight(&self) -> bool {
        self.backlight == BACKLIGHT
    }

    pub fn function_flags(&self) -> FunctionFlags {
        self.function
    }

    pub fn control_flags(&self) -> ControlFlags {
        self.control
    }

    pub fn entry_mode_flags(&self) -> EntryModeFlags {
        self.entry_mode
    }

    /// Gives back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn send(&mut self, value: u8, mode: u8) -> TransportResult<()> {
        trace!("Sending data: {:08b}, RS: {}", value, mode & RS != 0);

        let high_nibble = value & 0xF0;
        let low_nibble = (value << 4) & 0xF0;
        self.write_nibble(high_nibble | mode)?;
        self.write_nibble(low_nibble | mode)?;
        Ok(())
    }

    /// Puts a nibble (in the upper 4 bits) on the bus and latches it.
    fn write_nibble(&mut self, value: u8) -> TransportResult<()> {
        trace!("Writing nibble: {:04b}", value >> 4);
        self.expander_write(value)?;
        self.pulse_enable(value)
    }

    fn pulse_enable(&mut self, value: u8) -> TransportResult<()> {
        self.expander_write(value | EN)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.expander_write(value & !EN)?;
        self.delay.delay_us(COMMAND_SETTLE_US);
        Ok(())
    }

    /// Every write carries the backlight bit, as it shares the register with the bus lines.
    fn expander_write(&mut self, data: u8) -> TransportResult<()> {
        self.i2c
            .write(self.config.address, &[data | self.backlight])
            .map_err(TransportError::from_i2c)
    }
}

impl<I: I2c, D: DelayNs> Debug for Pcf8574Lcd<I, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pcf8574Lcd")
            .field("config", &self.config)
            .field("function", &self.function)
            .field("control", &self.control)
            .field("entry_mode", &self.entry_mode)
            .field("backlight", &self.backlight())
            .finish()
    }
}

/// The register-level setters keep the mirrored registers in sync, so the high-level setters
/// never resend stale bits.
impl<I: I2c, D: DelayNs> HD44780Driver for Pcf8574Lcd<I, D> {
    fn set_entry_mode(&mut self, flags: EntryModeFlags) -> TransportResult<()> {
        self.entry_mode = flags;
        self.send_command(ENTRY_MODE_SET | flags.bits())
    }

    fn set_display_control(&mut self, flags: ControlFlags) -> TransportResult<()> {
        self.control = flags;
        self.send_command(DISPLAY_CONTROL | flags.bits())
    }

    fn function_set(&mut self, flags: FunctionFlags) -> TransportResult<()> {
        self.function = flags;
        self.send_command(FUNCTION_SET | flags.bits())
    }

    fn send_command(&mut self, command: u8) -> TransportResult<()> {
        self.send(command, 0)
    }

    fn send_data(&mut self, data: u8) -> TransportResult<()> {
        self.send(data, RS)
    }
}

impl<I: I2c, D: DelayNs> fmt::Write for Pcf8574Lcd<I, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map_err(|err| {
            warn!("Failed to write text: {}", err);
            fmt::Error
        })
    }
}
