//! Latch-flip task.

use crate::task::{OutputLine, Task};

/// Flips a persistent output bit on each activation. The bit is
/// visible to the surrounding design but never appears on the serial
/// line.
pub struct Toggler {
    line: OutputLine,
}

impl Toggler {
    pub fn new() -> Self {
        Toggler {
            line: OutputLine::new(),
        }
    }

    /// Handle to the output bit for the surrounding design.
    pub fn line(&self) -> OutputLine {
        self.line.clone()
    }
}

impl Default for Toggler {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for Toggler {
    fn activate(&mut self) {
        self.line.set(!self.line.is_high());
    }
}
