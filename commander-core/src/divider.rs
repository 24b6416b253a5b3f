//! Bit-period timebase shared by both transceiver halves.

use crate::ConfigError;

/// Smallest usable divisor. Below this the mid-bit sample point
/// collapses into the bit edge and the receiver cannot reject glitches.
pub const MIN_DIVISOR: u32 = 4;

/// Compute the divisor for a clock/baud pair, e.g. 12 MHz at 115200
/// baud gives 104.
pub fn divisor_for(clock_hz: u32, baud: u32) -> u32 {
    (clock_hz + baud / 2) / baud
}

/// Free-running countdown that fires an event once every `divisor`
/// clock cycles.
///
/// The receiver re-phases it (`arm`) on a detected start edge so that
/// sample events land at bit-cell centers; the transmitter re-phases
/// it when a send is accepted.
pub struct BitDivider {
    divisor: u32,
    remaining: u32,
}

impl BitDivider {
    pub fn new(divisor: u32) -> Result<Self, ConfigError> {
        if divisor < MIN_DIVISOR {
            return Err(ConfigError::InvalidDivisor(divisor));
        }
        Ok(BitDivider {
            divisor,
            remaining: divisor,
        })
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Re-phase so the next event fires after `cycles` further ticks.
    pub fn arm(&mut self, cycles: u32) {
        debug_assert!(cycles >= 1 && cycles <= self.divisor);
        self.remaining = cycles;
    }

    /// Advance one clock cycle. Returns true on the event cycle, after
    /// which the countdown reloads with the full divisor.
    pub fn tick(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.divisor;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisor_for_rounds() {
        assert_eq!(divisor_for(12_000_000, 115200), 104);
        assert_eq!(divisor_for(1_000_000, 9600), 104);
        assert_eq!(divisor_for(16_000_000, 115200), 139);
    }

    #[test]
    fn test_event_every_divisor_cycles() {
        let mut div = BitDivider::new(5).unwrap();
        let mut events = vec![];
        for cycle in 0..20 {
            if div.tick() {
                events.push(cycle);
            }
        }
        assert_eq!(events, vec![4, 9, 14, 19]);
    }

    #[test]
    fn test_arm_rephases() {
        let mut div = BitDivider::new(8).unwrap();
        div.tick();
        div.tick();
        div.arm(4);
        let mut events = vec![];
        for cycle in 0..16 {
            if div.tick() {
                events.push(cycle);
            }
        }
        // First event 4 cycles after arm, then every 8.
        assert_eq!(events, vec![3, 11]);
    }

    #[test]
    fn test_rejects_tiny_divisor() {
        assert!(matches!(
            BitDivider::new(3),
            Err(ConfigError::InvalidDivisor(3))
        ));
    }
}
