//! Display geometry and addressing.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest row count the DDRAM row table covers.
pub const MAX_ROWS: u8 = 4;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum ConfigError {
    #[error("display must have at least one column")]
    ZeroColumns,
    #[error("display must have at least one row")]
    ZeroRows,
    #[error("{0} rows requested, at most 4 are supported")]
    TooManyRows(u8),
    #[error("{0:#04x} is not a 7-bit peripheral address")]
    InvalidAddress(u8),
}

/// Character cell size in dots.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum CharSize {
    #[default]
    #[serde(rename = "5x8")]
    Dots5x8,
    /// Only available on single-line displays.
    #[serde(rename = "5x10")]
    Dots5x10,
}

/// Static description of one display, fixed for the lifetime of a driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 7-bit I²C address of the PCF8574, commonly `0x27` or `0x3F`.
    pub address: u8,
    pub cols: u8,
    pub rows: u8,
    #[serde(default)]
    pub char_size: CharSize,
}

impl DisplayConfig {
    /// Creates and validates a new configuration.
    pub fn new(address: u8, cols: u8, rows: u8, char_size: CharSize) -> Result<Self, ConfigError> {
        let config = DisplayConfig {
            address,
            cols,
            rows,
            char_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the geometry and address. Configurations that were deserialized or built by
    /// hand should go through this before use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address > 0x7F {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.rows > MAX_ROWS {
            return Err(ConfigError::TooManyRows(self.rows));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_geometries() {
        assert!(DisplayConfig::new(0x27, 16, 2, CharSize::Dots5x8).is_ok());
        assert!(DisplayConfig::new(0x3F, 20, 4, CharSize::Dots5x8).is_ok());
        assert!(DisplayConfig::new(0x20, 8, 1, CharSize::Dots5x10).is_ok());
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert_eq!(DisplayConfig::new(0x27, 0, 2, CharSize::Dots5x8), Err(ConfigError::ZeroColumns));
        assert_eq!(DisplayConfig::new(0x27, 16, 0, CharSize::Dots5x8), Err(ConfigError::ZeroRows));
        assert_eq!(DisplayConfig::new(0x27, 16, 5, CharSize::Dots5x8), Err(ConfigError::TooManyRows(5)));
        assert_eq!(DisplayConfig::new(0x80, 16, 2, CharSize::Dots5x8), Err(ConfigError::InvalidAddress(0x80)));
    }

    #[test]
    fn deserializes_with_default_font() {
        let config: DisplayConfig = serde_json::from_str(r#"{"address": 39, "cols": 20, "rows": 4}"#).unwrap();
        assert_eq!(config.char_size, CharSize::Dots5x8);
        assert_eq!(config.address, 0x27);

        let config: DisplayConfig =
            serde_json::from_str(r#"{"address": 39, "cols": 8, "rows": 1, "char_size": "5x10"}"#).unwrap();
        assert_eq!(config.char_size, CharSize::Dots5x10);
    }
}
