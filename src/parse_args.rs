const HELP: &str = "\
serial-commander - cycle-accurate serial command interface simulator

Feeds a command string onto the simulated receive line, runs the
machine, and prints everything that comes back on the transmit line.

USAGE:
  serial-commander [OPTIONS] <commands>

COMMANDS (demo machine):
  +   pulse the increment trigger (counter += 1)
  -   pulse the decrement trigger (counter -= 1)
  t   flip the indicator latch
  p   print the counter in decimal
  b   print the counter in binary
  s   print the banner string

OPTIONS:
  -h, --help            Prints help information
  --divisor <n>         Clock cycles per bit period (default: 16)
  --counter <n>         Initial counter value (default: 0)
  --banner <text>       Banner string for the 's' command
  -v, --verbose         Show machine configuration and run summary
  -vv, --trace          Show every byte on the line
  --log <file>          Write trace output to file instead of stderr
";

/// Verbosity level for debug output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No debug output
    #[default]
    Quiet = 0,
    /// Configuration and run summary
    Verbose = 1,
    /// Individual bytes on the line
    Trace = 2,
}

#[derive(Debug)]
pub struct AppArgs {
    pub divisor: u32,
    pub counter: u32,
    pub banner: Option<String>,
    pub commands: String,
    pub verbosity: Verbosity,
    pub log_file: Option<String>,
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let verbosity = if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let args = AppArgs {
        divisor: pargs.opt_value_from_str("--divisor")?.unwrap_or(16),
        counter: pargs.opt_value_from_str("--counter")?.unwrap_or(0),
        banner: pargs.opt_value_from_str("--banner")?,
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
        commands: pargs.free_from_str()?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(args)
}
