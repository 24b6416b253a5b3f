//! # commander-core
//!
//! Cycle-accurate state machines for a minimal serial/UART command
//! interface: single-character commands arrive over a serial line,
//! trigger actions (pulse a line, flip a latch) or stream out a text
//! encoding of an observed register or memory, with the just-received
//! byte echoed back.
//!
//! ## Frame format
//!
//! ```text
//! idle(high) | start(low) | 8 data bits, LSB first | stop(high)
//! ```
//!
//! One bit lasts `divisor` clock cycles, where
//! `divisor = round(clock_hz / baud)`.
//!
//! ## Model
//!
//! Everything advances one clock cycle per `tick` call; there are no
//! threads and no blocking inside the core. The single shared resource
//! is the transmitter: at most one sender per cycle, first claimed
//! first served, and a byte that cannot go out immediately is dropped,
//! never queued. All failures (framing error, transmit contention,
//! unmapped command byte) degrade to dropped bytes, never to corrupted
//! framing or state.

mod commander;
pub mod divider;
mod machine;
mod printer;
mod task;
mod toggler;
mod trigger;
mod uart;

pub use commander::Commander;
pub use divider::{divisor_for, BitDivider, MIN_DIVISOR};
pub use machine::SerialCommander;
pub use printer::{
    BinaryMemoryPrinter, BinarySignalPrinter, DecimalSignalPrinter, TextMemoryPrinter,
};
pub use task::{Memory, OutputLine, Register, Task};
pub use toggler::Toggler;
pub use trigger::Trigger;
pub use uart::{UartRx, UartTx};

/// Construction-time configuration errors. Runtime "failures" are
/// signal-level (dropped bytes) and never surface here.
#[derive(Debug)]
pub enum ConfigError {
    /// Divisor below the smallest usable bit period.
    InvalidDivisor(u32),
    /// Two tasks bound to the same command byte.
    DuplicateCommand(u8),
    /// Register width outside 1..=32.
    InvalidRegisterWidth(u32),
    /// Memory word width outside 1..=8.
    InvalidWordWidth(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDivisor(d) => {
                write!(f, "divisor {} is below the minimum of {}", d, MIN_DIVISOR)
            }
            ConfigError::DuplicateCommand(byte) => {
                write!(f, "duplicate command byte 0x{:02X}", byte)
            }
            ConfigError::InvalidRegisterWidth(bits) => {
                write!(f, "register width {} is outside 1..=32", bits)
            }
            ConfigError::InvalidWordWidth(width) => {
                write!(f, "word width {} is outside 1..=8", width)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
