use std::env::var_os;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use dotenv::var;
use eyre::eyre;
use log::warn;
use i2clcd::{CharSize, DisplayConfig};
use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    /// Path of the I²C character device.
    pub bus: String,
    pub display: DisplayConfig,
    /// Record the traffic instead of talking to the bus.
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Loads the file named by `I2CLCD_CONFIG_FILE`, or `lcd.json`, if there is one.
    pub fn try_load() -> Option<Self> {
        let path = var_os("I2CLCD_CONFIG_FILE").map_or_else(|| PathBuf::from("lcd.json"), PathBuf::from);
        if !path.exists() {
            return None;
        }
        Self::load_from(&path)
    }

    /// A file that cannot be read or parsed is reported and skipped, so the environment is
    /// used instead.
    fn load_from(path: &Path) -> Option<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Cannot open {}: {}", path.display(), err);
                return None;
            }
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("Ignoring malformed config {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn from_env() -> eyre::Result<Self> {
        let bus = var("I2CLCD_BUS").unwrap_or_else(|_| "/dev/i2c-1".to_string());
        let address = match var("I2CLCD_ADDRESS") {
            Ok(address) => parse_address(&address)?,
            Err(_) => 0x27,
        };
        let cols = var("I2CLCD_COLS").map_or(Ok(16), |cols| cols.parse::<u8>())?;
        let rows = var("I2CLCD_ROWS").map_or(Ok(2), |rows| rows.parse::<u8>())?;
        let char_size = match var("I2CLCD_FONT").as_deref() {
            Ok("5x10") => CharSize::Dots5x10,
            Ok("5x8") | Err(_) => CharSize::Dots5x8,
            Ok(other) => return Err(eyre!("Unknown font size {:?}", other)),
        };

        Ok(Config {
            bus,
            display: DisplayConfig::new(address, cols, rows, char_size)?,
            dry_run: false,
        })
    }
}

fn parse_address(address: &str) -> eyre::Result<u8> {
    let address = address.trim();
    let parsed = match address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16)?,
        None => address.parse()?,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_decimal_addresses() {
        assert_eq!(parse_address("0x27").unwrap(), 0x27);
        assert_eq!(parse_address("0X3F").unwrap(), 0x3F);
        assert_eq!(parse_address(" 39 ").unwrap(), 39);
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn parses_config_file() {
        let json = r#"{
            "bus": "/dev/i2c-0",
            "display": { "address": 63, "cols": 20, "rows": 4, "char_size": "5x8" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.bus, "/dev/i2c-0");
        assert_eq!(config.display.rows, 4);
        assert!(!config.dry_run);
    }

    #[test]
    fn malformed_config_file_is_skipped() {
        let path = std::env::temp_dir().join(format!("i2clcd-malformed-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "bus": "/dev/i2c-0", "display": "#).unwrap();
        let loaded = Config::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.is_none());

        assert!(Config::load_from(Path::new("/nonexistent/lcd.json")).is_none());
    }
}
