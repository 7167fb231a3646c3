//! Driver for HD44780 character LCDs attached through a PCF8574 I²C expander.
//!
//! The [`Pcf8574Lcd`](hd44780::Pcf8574Lcd) type owns the display state and turns high-level
//! operations into nibble transfers on the expander. It works with any
//! [`embedded_hal::i2c::I2c`] bus and [`embedded_hal::delay::DelayNs`] delay, e.g. the ones
//! from `linux-embedded-hal` on a Raspberry Pi.
pub mod config;
pub mod hd44780;
pub mod recording;
pub mod transport;

use thiserror::Error;

pub use config::{CharSize, ConfigError, DisplayConfig};
pub use hd44780::{Pcf8574Lcd, ScrollDirection, TextDirection};
pub use recording::{BusEvent, Recorder};
pub use transport::{TransportError, TransportResult};

/// Any error the driver can produce, for callers that want a single error type.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type LcdResult<T> = Result<T, LcdError>;
