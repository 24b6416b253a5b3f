//! Top-level machine: transceiver plus dispatcher behind a single
//! per-cycle tick.

use crate::commander::Commander;
use crate::task::Task;
use crate::uart::{UartRx, UartTx};
use crate::ConfigError;

/// A complete serial command interface.
///
/// One `tick` call is one clock cycle. Within a cycle the order is
/// transmitter shift, receiver sample, dispatcher — so the receiver's
/// byte-ready and the dispatcher's reaction to it happen in the same
/// cycle, as the synchronous design requires.
pub struct SerialCommander {
    rx: UartRx,
    tx: UartTx,
    commander: Commander,
}

impl SerialCommander {
    /// Build a machine with the given bit-period divisor and command
    /// table. See [`crate::divider::divisor_for`] for deriving the
    /// divisor from a clock/baud pair.
    pub fn new(divisor: u32, commands: Vec<(u8, Box<dyn Task>)>) -> Result<Self, ConfigError> {
        Ok(SerialCommander {
            rx: UartRx::new(divisor)?,
            tx: UartTx::new(divisor)?,
            commander: Commander::new(commands)?,
        })
    }

    pub fn divisor(&self) -> u32 {
        self.tx.divisor()
    }

    /// True while the machine is mid-frame in either direction or a
    /// task still holds the transmit line.
    pub fn busy(&self) -> bool {
        self.rx.receiving() || self.tx.busy() || self.commander.task_holds_line()
    }

    /// Advance one clock cycle. `rx_line` is the level on the serial
    /// input; the return value is the level on the serial output.
    pub fn tick(&mut self, rx_line: bool) -> bool {
        self.tx.tick();
        let received = self.rx.tick(rx_line);
        self.commander.tick(received, &mut self.tx);
        self.tx.line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::Trigger;

    #[test]
    fn test_machine_echoes_over_the_wire() {
        let divisor = 5;
        let mut machine = SerialCommander::new(divisor, vec![]).unwrap();
        let mut host_tx = UartTx::new(divisor).unwrap();
        let mut probe = UartRx::new(divisor).unwrap();

        host_tx.send(b'x');
        let mut echoed = vec![];
        for _ in 0..30 * divisor as usize {
            host_tx.tick();
            let line_out = machine.tick(host_tx.line());
            if let Some(byte) = probe.tick(line_out) {
                echoed.push(byte);
            }
        }
        assert_eq!(echoed, b"x");
        assert!(!machine.busy());
    }

    #[test]
    fn test_trigger_fires_over_the_wire() {
        let divisor = 4;
        let trigger = Trigger::new();
        let line = trigger.line();
        let mut machine =
            SerialCommander::new(divisor, vec![(b'1', Box::new(trigger) as Box<dyn Task>)])
                .unwrap();
        let mut host_tx = UartTx::new(divisor).unwrap();

        host_tx.send(b'1');
        let mut pulses = 0;
        for _ in 0..30 * divisor as usize {
            host_tx.tick();
            machine.tick(host_tx.line());
            if line.is_high() {
                pulses += 1;
            }
        }
        assert_eq!(pulses, 1, "one activation, one single-cycle pulse");
    }
}
