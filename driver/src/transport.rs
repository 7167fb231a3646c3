//! Errors coming from the I²C bus.
//!
//! The driver talks to the expander through any [embedded_hal::i2c::I2c] implementation, one
//! single-byte write per expander update. Bus errors are reduced to the few cases the display
//! cares about.
use embedded_hal::i2c::{self, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum TransportError {
    /// The expander did not acknowledge its address or the data byte. Usually a wrong
    /// address or a disconnected display.
    #[error("peripheral did not acknowledge")]
    Nack,
    /// Any other bus failure, including timeouts reported by the bus implementation.
    #[error("bus error: {0}")]
    Bus(ErrorKind),
}

impl TransportError {
    /// Classifies an error returned by an [embedded_hal::i2c::I2c] implementation.
    pub fn from_i2c(err: impl i2c::Error) -> Self {
        match err.kind() {
            ErrorKind::NoAcknowledge(_) => TransportError::Nack,
            kind => TransportError::Bus(kind),
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
