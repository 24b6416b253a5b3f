//! Leveled debug output to stderr or a file.

use crate::parse_args::Verbosity;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

enum Output {
    Stderr,
    File(BufWriter<File>),
}

pub struct Logger {
    output: Mutex<Output>,
    verbosity: Verbosity,
}

impl Logger {
    pub fn stderr(verbosity: Verbosity) -> Self {
        Logger {
            output: Mutex::new(Output::Stderr),
            verbosity,
        }
    }

    pub fn file(path: &str, verbosity: Verbosity) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Logger {
            output: Mutex::new(Output::File(BufWriter::new(file))),
            verbosity,
        })
    }

    fn write(&self, msg: &str) {
        if let Ok(mut output) = self.output.lock() {
            match &mut *output {
                Output::Stderr => eprintln!("{}", msg),
                Output::File(f) => {
                    let _ = writeln!(f, "{}", msg);
                    let _ = f.flush();
                }
            }
        }
    }

    /// Log a message if the verbosity level is met
    pub fn log(&self, level: Verbosity, msg: &str) {
        if self.verbosity >= level {
            self.write(msg);
        }
    }

    pub fn verbose(&self, msg: &str) {
        self.log(Verbosity::Verbose, msg);
    }

    pub fn trace(&self, msg: &str) {
        self.log(Verbosity::Trace, msg);
    }
}
