//! Task capability contract and the collaborator types tasks observe
//! or drive.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::ConfigError;

/// A command handler bound to one input byte.
///
/// The commander drives every task once per clock cycle through `tick`
/// and strobes `activate` when the task's command byte arrives. Tasks
/// that respond on the serial line additionally expose a byte cursor
/// through `has_output`/`next_byte`; the commander claims the
/// transmitter on their behalf and feeds one byte per idle-transmitter
/// cycle until the cursor is exhausted.
pub trait Task {
    /// Activation strobe, one per received command byte.
    fn activate(&mut self);

    /// Per-cycle upkeep. Default does nothing.
    fn tick(&mut self) {}

    /// True while the task still holds bytes for the transmit line.
    fn has_output(&self) -> bool {
        false
    }

    /// Hand over the next byte of the response and advance the cursor.
    fn next_byte(&mut self) -> Option<u8> {
        None
    }
}

/// A single output bit driven by a task and visible to the surrounding
/// design (an indicator, a downstream state machine). The core only
/// ever writes it.
#[derive(Clone, Default)]
pub struct OutputLine(Arc<AtomicBool>);

impl OutputLine {
    pub fn new() -> Self {
        OutputLine::default()
    }

    pub fn is_high(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, level: bool) {
        self.0.store(level, Ordering::Relaxed);
    }
}

/// An external register of a declared bit width, observed (never
/// written) by printer tasks. The surrounding design updates it
/// through any clone of the handle.
#[derive(Clone)]
pub struct Register {
    bits: u32,
    value: Arc<AtomicU32>,
}

impl Register {
    /// A register `bits` wide (1..=32), initialized to zero.
    pub fn new(bits: u32) -> Result<Self, ConfigError> {
        if bits < 1 || bits > 32 {
            return Err(ConfigError::InvalidRegisterWidth(bits));
        }
        Ok(Register {
            bits,
            value: Arc::new(AtomicU32::new(0)),
        })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    fn mask(&self) -> u32 {
        if self.bits == 32 {
            u32::MAX
        } else {
            (1 << self.bits) - 1
        }
    }

    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Store a value, truncated to the register width.
    pub fn set(&self, value: u32) {
        self.value.store(value & self.mask(), Ordering::Relaxed);
    }
}

/// An external byte-addressed memory sampled by the memory printers.
#[derive(Clone)]
pub struct Memory {
    words: Arc<Mutex<Vec<u8>>>,
}

impl Memory {
    /// A memory of `len` zeroed words.
    pub fn new(len: usize) -> Self {
        Memory {
            words: Arc::new(Mutex::new(vec![0; len])),
        }
    }

    /// A memory pre-loaded with `contents`.
    pub fn from_bytes(contents: &[u8]) -> Self {
        Memory {
            words: Arc::new(Mutex::new(contents.to_vec())),
        }
    }

    pub fn len(&self) -> usize {
        self.words.lock().map(|w| w.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write(&self, addr: usize, word: u8) {
        if let Ok(mut words) = self.words.lock() {
            if let Some(slot) = words.get_mut(addr) {
                *slot = word;
            }
        }
    }

    pub fn read(&self, addr: usize) -> u8 {
        self.words
            .lock()
            .ok()
            .and_then(|w| w.get(addr).copied())
            .unwrap_or(0)
    }

    /// Copy of the whole contents, used by printers to capture the
    /// memory at the moment of activation.
    pub fn snapshot(&self) -> Vec<u8> {
        self.words.lock().map(|w| w.clone()).unwrap_or_default()
    }
}
