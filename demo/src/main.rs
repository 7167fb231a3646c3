mod config;

use std::env::var;
use std::thread::sleep;
use std::time::Duration;
use dotenv::dotenv;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};
use sysinfo::System;
use time::OffsetDateTime;
use i2clcd::{DisplayConfig, LcdResult, Pcf8574Lcd, Recorder};
use crate::config::Config;

const UNKNOWN_STR: &str = "???";

const HEART: [u8; 8] = [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x00];

/// How long the greeting stays up when the host name has to replace it.
const GREETING_PAUSE: Duration = Duration::from_secs(2);

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("i2clcd demo starting...");

    debug!("Trying to load config...");
    let mut config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using environment");
        Config::from_env()?
    };
    if var("I2CLCD_DRY_RUN").is_ok_and(|v| v == "1") {
        config.dry_run = true;
    }

    info!(
        "LCD @ {} address {:#04x}, {}x{}",
        config.bus, config.display.address, config.display.cols, config.display.rows
    );

    if config.dry_run {
        info!("Dry run, recording bus traffic");
        let recorder = Recorder::new();
        let mut lcd = open(config.display, recorder.clone(), recorder.clone())?;
        run(&mut lcd, Some(1))?;
        info!(
            "{} expander writes, {} bytes transferred, {} ms of delays",
            recorder.writes().len(),
            recorder.transfers().len(),
            recorder.delays().iter().map(|&us| u64::from(us)).sum::<u64>() / 1000
        );
        return Ok(());
    }

    run_on_bus(&config)
}

#[cfg(target_os = "linux")]
fn run_on_bus(config: &Config) -> eyre::Result<()> {
    use linux_embedded_hal::{Delay, I2cdev};

    let i2c = I2cdev::new(&config.bus)?;
    let mut lcd = open(config.display, i2c, Delay)?;
    run(&mut lcd, None)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run_on_bus(_config: &Config) -> eyre::Result<()> {
    Err(eyre::eyre!("I2C bus access is only supported on Linux, set I2CLCD_DRY_RUN=1"))
}

/// Validates the configuration and initializes the display.
fn open<I: I2c, D: DelayNs>(display: DisplayConfig, i2c: I, delay: D) -> LcdResult<Pcf8574Lcd<I, D>> {
    let mut lcd = Pcf8574Lcd::new(display, i2c, delay)?;
    debug!("Initializing LCD...");
    lcd.begin()?;
    Ok(lcd)
}

/// Which rows the demo uses on a display with a given number of rows.
#[derive(Debug, Eq, PartialEq)]
struct Layout {
    /// `None` when the display has no row to spare.
    host: Option<u8>,
    /// Always the last row.
    clock: u8,
}

impl Layout {
    fn for_rows(rows: u8) -> Self {
        let host = match rows {
            0 | 1 => None,
            // Replaces the greeting
            2 => Some(0),
            _ => Some(1),
        };
        Layout { host, clock: rows.saturating_sub(1) }
    }
}

/// Shows the greeting with a heart under it, then the host name, then keeps a clock running on
/// the last row. Runs `frames` clock updates, or forever.
fn run<I: I2c, D: DelayNs>(lcd: &mut Pcf8574Lcd<I, D>, frames: Option<usize>) -> LcdResult<()> {
    lcd.define_glyph(0, &HEART)?;
    lcd.clear()?;
    lcd.write_text("Hello World!")?;
    if lcd.config().rows > 1 {
        lcd.set_cursor_position(0, 1)?;
        lcd.write_char(0)?;
    }

    let cols = usize::from(lcd.config().cols);
    let layout = Layout::for_rows(lcd.config().rows);
    debug!("{:?} initialized, layout {:?}", lcd, layout);

    if let Some(row) = layout.host {
        if row == 0 {
            sleep(GREETING_PAUSE);
        }
        let host = System::host_name();
        let host = host.as_deref().unwrap_or(UNKNOWN_STR);
        // Blank the rest of the row so no greeting is left over
        let line: String = format!("{:<cols$}", host).chars().take(cols).collect();
        lcd.set_cursor_position(0, row)?;
        lcd.write_text(&line)?;
    }

    let mut frame = 0;
    loop {
        if frames.is_some_and(|frames| frame >= frames) {
            break;
        }
        if frame > 0 {
            sleep(Duration::from_secs(1));
        }

        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        lcd.set_cursor_position(0, layout.clock)?;
        lcd.write_char(0)?;
        lcd.write_text(&format!(" {:02}:{:02}:{:02}", now.hour(), now.minute(), now.second()))?;

        frame += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2clcd::recording::Transfer;
    use i2clcd::{CharSize, ConfigError, LcdError, TransportError};

    #[test]
    fn clock_always_takes_the_last_row() {
        assert_eq!(Layout::for_rows(1), Layout { host: None, clock: 0 });
        assert_eq!(Layout::for_rows(2), Layout { host: Some(0), clock: 1 });
        assert_eq!(Layout::for_rows(4), Layout { host: Some(1), clock: 3 });
    }

    #[test]
    fn dry_run_on_four_rows() {
        let recorder = Recorder::new();
        let display = DisplayConfig::new(0x27, 20, 4, CharSize::Dots5x8).unwrap();
        let mut lcd = open(display, recorder.clone(), recorder.clone()).unwrap();
        recorder.clear();
        run(&mut lcd, Some(1)).unwrap();

        let transfers = recorder.transfers();
        // Heart glyph in CGRAM slot 0
        assert_eq!(transfers[0], Transfer::Command(0x40));
        // Host name on row 1, clock on row 3
        assert!(transfers.contains(&Transfer::Command(0x80 | 0x40)));
        assert!(transfers.contains(&Transfer::Command(0x80 | 0x54)));
        let clock_at = transfers
            .iter()
            .position(|t| *t == Transfer::Command(0x80 | 0x54))
            .unwrap();
        // Heart, space, then hh:mm:ss
        assert_eq!(transfers.len() - clock_at - 1, 10);
        assert_eq!(transfers[clock_at + 1], Transfer::Data(0));
    }

    #[test]
    fn open_reports_both_error_kinds() {
        let recorder = Recorder::new();
        let display = DisplayConfig { address: 0x80, cols: 16, rows: 2, char_size: CharSize::Dots5x8 };
        assert_eq!(
            open(display, recorder.clone(), recorder.clone()).err(),
            Some(LcdError::Config(ConfigError::InvalidAddress(0x80)))
        );

        recorder.fail_write(0, embedded_hal::i2c::ErrorKind::Bus);
        let display = DisplayConfig { address: 0x27, ..display };
        assert_eq!(
            open(display, recorder.clone(), recorder.clone()).err(),
            Some(LcdError::Transport(TransportError::Bus(embedded_hal::i2c::ErrorKind::Bus)))
        );
    }
}
