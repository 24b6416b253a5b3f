//! One-shot pulse task.

use crate::task::{OutputLine, Task};

/// Pulses its output line high for exactly one clock cycle after each
/// activation. Re-activation while the pulse is pending re-arms it
/// rather than stacking. No transmit interaction.
pub struct Trigger {
    line: OutputLine,
    armed: bool,
}

impl Trigger {
    pub fn new() -> Self {
        Trigger {
            line: OutputLine::new(),
            armed: false,
        }
    }

    /// Handle to the output bit for the surrounding design.
    pub fn line(&self) -> OutputLine {
        self.line.clone()
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for Trigger {
    fn activate(&mut self) {
        self.armed = true;
    }

    fn tick(&mut self) {
        self.line.set(self.armed);
        self.armed = false;
    }
}
