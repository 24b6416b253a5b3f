//! Command dispatcher and transmit-line arbitration.

use crate::task::Task;
use crate::uart::UartTx;
use crate::ConfigError;

/// Routes received bytes to tasks and serializes task output and
/// echoes onto the single transmitter.
///
/// The command table is fixed at construction; its order is also the
/// arbitration priority when more than one task has pending output.
/// The policy throughout is "accept new input only when idle": a byte
/// that cannot go out immediately is dropped, never queued.
pub struct Commander {
    commands: Vec<(u8, Box<dyn Task>)>,
    /// Index of the task currently holding the transmit line.
    active: Option<usize>,
}

impl Commander {
    /// Build a dispatcher from (command byte, task) pairs. Keys must
    /// be unique; there is no wildcard entry.
    pub fn new(commands: Vec<(u8, Box<dyn Task>)>) -> Result<Self, ConfigError> {
        for (i, (key, _)) in commands.iter().enumerate() {
            if commands[..i].iter().any(|(k, _)| k == key) {
                return Err(ConfigError::DuplicateCommand(*key));
            }
        }
        Ok(Commander {
            commands,
            active: None,
        })
    }

    /// True while some task holds the transmit line.
    pub fn task_holds_line(&self) -> bool {
        self.active.is_some()
    }

    /// Advance one clock cycle.
    ///
    /// `received` is the receiver's byte-ready output for this same
    /// cycle; it is consumed here and never stored, so a byte arriving
    /// while the line is contended degrades to a dropped echo rather
    /// than stale state.
    pub fn tick(&mut self, received: Option<u8>, tx: &mut UartTx) {
        for (_, task) in self.commands.iter_mut() {
            task.tick();
        }

        if let Some(byte) = received {
            // Echo before any task claims the line, so a command
            // character appears ahead of its own output. Dropped when
            // the transmitter is mid-frame or a task holds the line.
            if self.active.is_none() && !tx.busy() {
                tx.send(byte);
            }
            if let Some(idx) = self.commands.iter().position(|(key, _)| *key == byte) {
                self.commands[idx].1.activate();
            }
        }

        // Release the line once the holder's cursor is exhausted, then
        // grant it to the first task (in table order) with output.
        if let Some(idx) = self.active {
            if !self.commands[idx].1.has_output() {
                self.active = None;
            }
        }
        if self.active.is_none() {
            self.active = self.commands.iter().position(|(_, task)| task.has_output());
        }

        // The holder advances its cursor on every cycle the
        // transmitter reports not-busy.
        if let Some(idx) = self.active {
            if !tx.busy() {
                if let Some(byte) = self.commands[idx].1.next_byte() {
                    tx.send(byte);
                }
                if !self.commands[idx].1.has_output() {
                    self.active = None;
                }
            }
        }
    }
}
