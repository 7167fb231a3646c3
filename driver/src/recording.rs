//! In-memory I²C bus and delay that record everything sent to them.
//!
//! A [Recorder] is cheap to clone, and all clones share one ordered event log, so the same
//! recorder can be handed to the driver as both its bus and its delay. Nothing is actually
//! sent anywhere and no time passes.
use crate::hd44780::commands::{EN, RS};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BusEvent {
    /// One byte was written to the expander at the given address.
    Write { address: u8, data: u8 },
    /// The driver waited for the given number of microseconds.
    Delay(u32),
}

/// A logical byte reassembled from two latched nibbles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transfer {
    Command(u8),
    Data(u8),
}

#[derive(Debug, Default)]
struct RecorderState {
    events: Vec<BusEvent>,
    write_count: usize,
    fail_at: Option<(usize, ErrorKind)>,
}

#[derive(Debug, Default, Clone)]
pub struct Recorder {
    state: Rc<RefCell<RecorderState>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the byte write with the given zero-based index (counted since creation) fail
    /// with `error`. The failing write is not recorded.
    pub fn fail_write(&self, index: usize, error: ErrorKind) {
        self.state.borrow_mut().fail_at = Some((index, error));
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    /// Forgets all recorded events. The write counter used by [Self::fail_write] keeps running.
    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// All bytes written to the expander, in order.
    pub fn writes(&self) -> Vec<u8> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Write { data, .. } => Some(*data),
                _ => None,
            })
            .collect()
    }

    /// All delays, in microseconds, in order.
    pub fn delays(&self) -> Vec<u32> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Delay(us) => Some(*us),
                _ => None,
            })
            .collect()
    }

    /// Expander bytes that were present while the enable line was high, i.e. the nibbles the
    /// controller latched.
    pub fn latched(&self) -> Vec<u8> {
        self.writes().into_iter().filter(|data| data & EN != 0).collect()
    }

    /// Pairs latched nibbles back into bytes, high nibble first. The register select bit of
    /// the high nibble decides between command and data.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.latched()
            .chunks_exact(2)
            .map(|pair| {
                let byte = (pair[0] & 0xF0) | (pair[1] >> 4);
                if pair[0] & RS != 0 {
                    Transfer::Data(byte)
                } else {
                    Transfer::Command(byte)
                }
            })
            .collect()
    }

    fn record_write(&self, address: u8, data: u8) -> Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        let index = state.write_count;
        state.write_count += 1;
        if let Some((fail_index, error)) = state.fail_at {
            if fail_index == index {
                return Err(error);
            }
        }
        state.events.push(BusEvent::Write { address, data });
        Ok(())
    }

    fn record_delay(&self, us: u32) {
        self.state.borrow_mut().events.push(BusEvent::Delay(us));
    }
}

impl ErrorType for Recorder {
    type Error = ErrorKind;
}

impl I2c for Recorder {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    for &data in bytes.iter() {
                        self.record_write(address, data)?;
                    }
                }
                // The expander is only ever written to
                Operation::Read(_) => return Err(ErrorKind::Other),
            }
        }
        Ok(())
    }
}

impl DelayNs for Recorder {
    fn delay_ns(&mut self, ns: u32) {
        self.record_delay(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.record_delay(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record_delay(ms.saturating_mul(1000));
    }
}
