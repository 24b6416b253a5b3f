mod logger;
mod parse_args;

use commander_core::{
    BinarySignalPrinter, ConfigError, DecimalSignalPrinter, Memory, OutputLine, Register,
    SerialCommander, Task, TextMemoryPrinter, Toggler, Trigger, UartRx, UartTx,
};
use logger::Logger;
use parse_args::parse_args;

use std::collections::VecDeque;
use std::io::Write;

const DEFAULT_BANNER: &str = "serial-commander";

/// Printable rendering of a byte for trace output
fn fmt_byte(byte: u8) -> String {
    if (0x20..0x7f).contains(&byte) {
        format!("'{}'", byte as char)
    } else {
        format!("0x{:02X}", byte)
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Set up logger
    let logger = match &args.log_file {
        Some(path) => match Logger::file(path, args.verbosity) {
            Ok(l) => {
                eprintln!("Logging to: {}", path);
                l
            }
            Err(e) => {
                eprintln!("Failed to open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Logger::stderr(args.verbosity),
    };

    let banner = args.banner.as_deref().unwrap_or(DEFAULT_BANNER);
    let (mut machine, host_tx, probe, wires) = match build_rig(args.divisor, args.counter, banner)
    {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("Bad machine configuration: {}", e);
            std::process::exit(1);
        }
    };

    logger.verbose(&format!(
        "[SIM] divisor={} counter={} banner={:?}",
        args.divisor, args.counter, banner
    ));

    if let Err(e) = run_simulation(&mut machine, host_tx, probe, &args.commands, &logger, || {
        // External circuitry: the counter reacts to the trigger lines.
        if wires.inc_line.is_high() {
            wires.counter.set(wires.counter.get().wrapping_add(1));
        } else if wires.dec_line.is_high() {
            wires.counter.set(wires.counter.get().wrapping_sub(1));
        }
    }) {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    }

    logger.verbose(&format!(
        "[SIM] final counter={} indicator={}",
        wires.counter.get(),
        if wires.indicator_line.is_high() {
            "on"
        } else {
            "off"
        }
    ));
}

/// Shared handles the simulation loop observes: the counter driven by
/// the trigger lines and the indicator latch.
struct DemoWires {
    counter: Register,
    inc_line: OutputLine,
    dec_line: OutputLine,
    indicator_line: OutputLine,
}

/// The demo machine under simulation plus the host side of the wire: a
/// transmitter to drive its receive line and a receiver model to
/// decode its transmit line.
///
/// The machine is a counter register with increment/decrement
/// triggers, an indicator latch, and printers for the counter and a
/// banner string.
fn build_rig(
    divisor: u32,
    initial_counter: u32,
    banner: &str,
) -> Result<(SerialCommander, UartTx, UartRx, DemoWires), ConfigError> {
    let counter = Register::new(8)?;
    counter.set(initial_counter);
    let increment = Trigger::new();
    let decrement = Trigger::new();
    let indicator = Toggler::new();
    let wires = DemoWires {
        counter: counter.clone(),
        inc_line: increment.line(),
        dec_line: decrement.line(),
        indicator_line: indicator.line(),
    };

    let mut banner_bytes = banner.as_bytes().to_vec();
    banner_bytes.push(0);
    let banner_mem = Memory::from_bytes(&banner_bytes);

    let commands: Vec<(u8, Box<dyn Task>)> = vec![
        (b'+', Box::new(increment)),
        (b'-', Box::new(decrement)),
        (b't', Box::new(indicator)),
        (b'p', Box::new(DecimalSignalPrinter::new(counter.clone()))),
        (b'b', Box::new(BinarySignalPrinter::new(counter))),
        (b's', Box::new(TextMemoryPrinter::new(banner_mem))),
    ];

    Ok((
        SerialCommander::new(divisor, commands)?,
        UartTx::new(divisor)?,
        UartRx::new(divisor)?,
        wires,
    ))
}

/// Drive the machine's receive line from `commands` one frame at a
/// time, decode the transmit line, and write the decoded bytes to
/// stdout.
fn run_simulation(
    machine: &mut SerialCommander,
    mut host_tx: UartTx,
    mut probe: UartRx,
    commands: &str,
    logger: &Logger,
    mut per_cycle: impl FnMut(),
) -> std::io::Result<()> {
    let divisor = machine.divisor();
    let mut pending: VecDeque<u8> = commands.bytes().collect();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Stop after the input is exhausted and the line has stayed quiet
    // for a generous number of frame times.
    let frame_cycles = (10 * divisor) as u64;
    let quiet_limit = 30 * frame_cycles;
    let mut quiet: u64 = 0;
    let mut cycle: u64 = 0;

    while quiet < quiet_limit {
        if !host_tx.busy() {
            if let Some(byte) = pending.pop_front() {
                logger.trace(&format!("[LINE] -> {} @ cycle {}", fmt_byte(byte), cycle));
                host_tx.send(byte);
            }
        }
        host_tx.tick();
        let line_out = machine.tick(host_tx.line());
        per_cycle();
        if let Some(byte) = probe.tick(line_out) {
            logger.trace(&format!("[LINE] <- {} @ cycle {}", fmt_byte(byte), cycle));
            out.write_all(&[byte])?;
            out.flush()?;
        }
        if pending.is_empty() && !host_tx.busy() && !machine.busy() {
            quiet += 1;
        } else {
            quiet = 0;
        }
        cycle += 1;
    }

    logger.verbose(&format!("[SIM] done after {} cycles", cycle));
    Ok(())
}
