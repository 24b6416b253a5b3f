//! Producer tasks: text encodings of an observed register or memory,
//! streamed out one byte per idle-transmitter cycle.
//!
//! All printers follow the same contract: activation captures the
//! source value once and renders the full byte sequence into a cursor,
//! so a source that keeps changing cannot corrupt an in-flight print.
//! An activation arriving while bytes are still pending is ignored;
//! once the cursor is drained the task idles and accepts the next
//! activation.

use std::collections::VecDeque;

use crate::task::{Memory, Register, Task};
use crate::ConfigError;

/// Number of ASCII digits needed for the largest value a register of
/// `bits` width can hold.
fn decimal_digits(bits: u32) -> usize {
    let max: u64 = (1u64 << bits) - 1;
    let mut digits = 1;
    let mut rest = max / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Prints a register as fixed-width, zero-padded ASCII decimal.
///
/// An 8-bit register holding 5 prints as `005`.
pub struct DecimalSignalPrinter {
    source: Register,
    digits: usize,
    cursor: VecDeque<u8>,
}

impl DecimalSignalPrinter {
    pub fn new(source: Register) -> Self {
        let digits = decimal_digits(source.bits());
        DecimalSignalPrinter {
            source,
            digits,
            cursor: VecDeque::new(),
        }
    }
}

impl Task for DecimalSignalPrinter {
    fn activate(&mut self) {
        if !self.cursor.is_empty() {
            return;
        }
        let value = self.source.get();
        self.cursor
            .extend(format!("{:01$}", value, self.digits).bytes());
    }

    fn has_output(&self) -> bool {
        !self.cursor.is_empty()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.cursor.pop_front()
    }
}

/// Prints a register as one ASCII '0'/'1' per bit, MSB first.
pub struct BinarySignalPrinter {
    source: Register,
    cursor: VecDeque<u8>,
}

impl BinarySignalPrinter {
    pub fn new(source: Register) -> Self {
        BinarySignalPrinter {
            source,
            cursor: VecDeque::new(),
        }
    }
}

impl Task for BinarySignalPrinter {
    fn activate(&mut self) {
        if !self.cursor.is_empty() {
            return;
        }
        let value = self.source.get();
        for bit in (0..self.source.bits()).rev() {
            self.cursor.push_back(if value & (1 << bit) != 0 {
                b'1'
            } else {
                b'0'
            });
        }
    }

    fn has_output(&self) -> bool {
        !self.cursor.is_empty()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.cursor.pop_front()
    }
}

/// Prints memory contents as a C-style string: bytes up to the first
/// zero word (or the whole memory if none), then a newline.
pub struct TextMemoryPrinter {
    source: Memory,
    cursor: VecDeque<u8>,
}

impl TextMemoryPrinter {
    pub fn new(source: Memory) -> Self {
        TextMemoryPrinter {
            source,
            cursor: VecDeque::new(),
        }
    }
}

impl Task for TextMemoryPrinter {
    fn activate(&mut self) {
        if !self.cursor.is_empty() {
            return;
        }
        for word in self.source.snapshot() {
            if word == 0 {
                break;
            }
            self.cursor.push_back(word);
        }
        self.cursor.push_back(b'\n');
    }

    fn has_output(&self) -> bool {
        !self.cursor.is_empty()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.cursor.pop_front()
    }
}

/// Dumps every memory word as ASCII binary, `width` bits per word,
/// MSB first. The dump runs the full memory length; zero words are
/// printed, not treated as a terminator.
pub struct BinaryMemoryPrinter {
    source: Memory,
    width: u32,
    cursor: VecDeque<u8>,
}

impl BinaryMemoryPrinter {
    /// `width` is the number of bits to print per word (1..=8).
    pub fn new(source: Memory, width: u32) -> Result<Self, ConfigError> {
        if width < 1 || width > 8 {
            return Err(ConfigError::InvalidWordWidth(width));
        }
        Ok(BinaryMemoryPrinter {
            source,
            width,
            cursor: VecDeque::new(),
        })
    }
}

impl Task for BinaryMemoryPrinter {
    fn activate(&mut self) {
        if !self.cursor.is_empty() {
            return;
        }
        for word in self.source.snapshot() {
            for bit in (0..self.width).rev() {
                self.cursor.push_back(if word & (1 << bit) != 0 {
                    b'1'
                } else {
                    b'0'
                });
            }
        }
    }

    fn has_output(&self) -> bool {
        !self.cursor.is_empty()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.cursor.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(task: &mut dyn Task) -> Vec<u8> {
        let mut out = vec![];
        while let Some(byte) = task.next_byte() {
            out.push(byte);
        }
        out
    }

    #[test]
    fn test_decimal_digits_per_width() {
        assert_eq!(decimal_digits(1), 1);
        assert_eq!(decimal_digits(4), 2);
        assert_eq!(decimal_digits(8), 3);
        assert_eq!(decimal_digits(10), 4);
        assert_eq!(decimal_digits(16), 5);
        assert_eq!(decimal_digits(32), 10);
    }

    #[test]
    fn test_decimal_zero_padded() {
        let reg = Register::new(8).unwrap();
        reg.set(5);
        let mut printer = DecimalSignalPrinter::new(reg.clone());
        printer.activate();
        assert_eq!(drain(&mut printer), b"005");

        // Re-activation picks up the new value.
        reg.set(255);
        printer.activate();
        assert_eq!(drain(&mut printer), b"255");
    }

    #[test]
    fn test_decimal_captures_value_at_activation() {
        let reg = Register::new(8).unwrap();
        reg.set(5);
        let mut printer = DecimalSignalPrinter::new(reg.clone());
        printer.activate();
        assert_eq!(printer.next_byte(), Some(b'0'));
        // Source changes mid-print; the captured rendering is not
        // re-sampled.
        reg.set(200);
        assert_eq!(drain(&mut printer), b"05");
    }

    #[test]
    fn test_activation_ignored_while_printing() {
        let reg = Register::new(4).unwrap();
        reg.set(9);
        let mut printer = DecimalSignalPrinter::new(reg.clone());
        printer.activate();
        assert_eq!(printer.next_byte(), Some(b'0'));
        printer.activate();
        assert_eq!(drain(&mut printer), b"9");
    }

    #[test]
    fn test_binary_msb_first() {
        let reg = Register::new(5).unwrap();
        reg.set(0b10101);
        let mut printer = BinarySignalPrinter::new(reg);
        printer.activate();
        assert_eq!(drain(&mut printer), b"10101");
    }

    #[test]
    fn test_text_memory_stops_at_zero() {
        let mem = Memory::from_bytes(b"hi\0junk");
        let mut printer = TextMemoryPrinter::new(mem);
        printer.activate();
        assert_eq!(drain(&mut printer), b"hi\n");
    }

    #[test]
    fn test_text_memory_without_terminator_prints_all() {
        let mem = Memory::from_bytes(b"abc");
        let mut printer = TextMemoryPrinter::new(mem);
        printer.activate();
        assert_eq!(drain(&mut printer), b"abc\n");
    }

    #[test]
    fn test_binary_memory_dumps_full_length() {
        let mem = Memory::from_bytes(&[0b1010, 0b0000, 0b0111]);
        let mut printer = BinaryMemoryPrinter::new(mem, 4).unwrap();
        printer.activate();
        assert_eq!(drain(&mut printer), b"101000000111");
    }

    #[test]
    fn test_binary_memory_rejects_bad_width() {
        assert!(matches!(
            BinaryMemoryPrinter::new(Memory::new(1), 0),
            Err(ConfigError::InvalidWordWidth(0))
        ));
        assert!(matches!(
            BinaryMemoryPrinter::new(Memory::new(1), 9),
            Err(ConfigError::InvalidWordWidth(9))
        ));
    }
}
