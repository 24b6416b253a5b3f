//! Byte-level serial transceiver.
//!
//! Both halves are synchronous state machines advanced one clock cycle
//! per `tick` call. Framing is fixed: 1 start bit (low), 8 data bits
//! LSB first, 1 stop bit (high); one bit lasts `divisor` clock cycles.

use crate::divider::BitDivider;
use crate::ConfigError;

/// Bits in a frame: start + 8 data + stop.
const FRAME_BITS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxPhase {
    /// Line idle (high), watching for a start edge.
    Idle,
    /// Start edge seen; waiting for the mid-cell re-check.
    Start,
    /// Sampling data bit n at each divider event.
    Data(u8),
    /// Waiting for the stop-bit sample.
    Stop,
    /// Stop sampled high; running out the rest of the stop cell before
    /// committing the byte.
    Tail,
}

/// Receive half of the transceiver.
///
/// Call `tick` once per clock cycle with the current level of the
/// serial input line. A committed byte is the return value of exactly
/// one tick; a caller that does not consume it there has lost it,
/// matching the no-buffering contract of the design.
pub struct UartRx {
    divider: BitDivider,
    phase: RxPhase,
    shift: u8,
}

impl UartRx {
    pub fn new(divisor: u32) -> Result<Self, ConfigError> {
        Ok(UartRx {
            divider: BitDivider::new(divisor)?,
            phase: RxPhase::Idle,
            shift: 0,
        })
    }

    pub fn divisor(&self) -> u32 {
        self.divider.divisor()
    }

    /// True while a frame is being assembled.
    pub fn receiving(&self) -> bool {
        self.phase != RxPhase::Idle
    }

    /// Advance one clock cycle.
    ///
    /// With the start edge observed on cycle `t`, samples land at
    /// `t + D/2 + k*D` and a good frame is reported on exactly cycle
    /// `t + 10*D`. The commit cycle doubles as the edge watch, so a
    /// back-to-back start bit landing on it starts the next frame
    /// without slipping a cycle. A low stop-bit sample discards the
    /// byte silently.
    pub fn tick(&mut self, line: bool) -> Option<u8> {
        match self.phase {
            RxPhase::Idle => {
                if !line {
                    self.phase = RxPhase::Start;
                    self.divider.arm(self.divider.divisor() / 2);
                }
                None
            }
            RxPhase::Start => {
                if self.divider.tick() {
                    if !line {
                        self.phase = RxPhase::Data(0);
                        self.shift = 0;
                    } else {
                        // Line bounced back high before the cell
                        // center: a glitch, not a start bit.
                        self.phase = RxPhase::Idle;
                    }
                }
                None
            }
            RxPhase::Data(bit) => {
                if self.divider.tick() {
                    if line {
                        self.shift |= 1 << bit;
                    }
                    self.phase = if bit == 7 {
                        RxPhase::Stop
                    } else {
                        RxPhase::Data(bit + 1)
                    };
                }
                None
            }
            RxPhase::Stop => {
                if self.divider.tick() {
                    if line {
                        let d = self.divider.divisor();
                        self.phase = RxPhase::Tail;
                        self.divider.arm(d - d / 2);
                    } else {
                        // Framing error: discard, no report surfaced.
                        self.phase = RxPhase::Idle;
                    }
                }
                None
            }
            RxPhase::Tail => {
                if self.divider.tick() {
                    // The commit cycle is also the first cycle a
                    // back-to-back start bit can appear on, so the
                    // edge watch happens here too. Returning to idle
                    // first would slip one cycle per frame and the
                    // skew would walk the samples out of their cells.
                    if line {
                        self.phase = RxPhase::Idle;
                    } else {
                        self.phase = RxPhase::Start;
                        self.divider.arm(self.divider.divisor() / 2);
                    }
                    Some(self.shift)
                } else {
                    None
                }
            }
        }
    }
}

/// Transmit half of the transceiver.
///
/// `send` loads a framed byte into the shift register; the line shows
/// the start bit immediately and `busy` holds for exactly
/// `10 * divisor` cycles. A send while busy is rejected, never queued.
pub struct UartTx {
    divider: BitDivider,
    /// 10-bit frame, bit 0 on the line; idle state is all ones.
    shreg: u16,
    remaining: u8,
}

impl UartTx {
    pub fn new(divisor: u32) -> Result<Self, ConfigError> {
        Ok(UartTx {
            divider: BitDivider::new(divisor)?,
            shreg: 0x3ff,
            remaining: 0,
        })
    }

    pub fn divisor(&self) -> u32 {
        self.divider.divisor()
    }

    /// Current level of the serial output line.
    pub fn line(&self) -> bool {
        self.shreg & 1 != 0
    }

    /// True from send acceptance until the stop bit has been held for
    /// a full bit period.
    pub fn busy(&self) -> bool {
        self.remaining != 0
    }

    /// Load a byte for transmission. Returns false (byte dropped) if a
    /// frame is still in flight.
    pub fn send(&mut self, byte: u8) -> bool {
        if self.busy() {
            return false;
        }
        // Stop bit, data LSB first, start bit at the line end.
        self.shreg = 0x200 | ((byte as u16) << 1);
        self.remaining = FRAME_BITS;
        self.divider.arm(self.divider.divisor());
        true
    }

    /// Advance one clock cycle.
    pub fn tick(&mut self) {
        if self.remaining == 0 {
            return;
        }
        if self.divider.tick() {
            // Shift the next bit onto the line, refilling with the
            // idle-high level.
            self.shreg = (self.shreg >> 1) | 0x200;
            self.remaining -= 1;
        }
    }
}
