//! Rewindable virtual machine CLI.
//!
//! This binary loads a program and runs it under the stepping debugger. It performs:
//! 1. **Bootstrap:** Picks the program file (argument or prompt), loads the config,
//!    and collects values for externally supplied cells.
//! 2. **Interactive run:** Drives the controller from the keyboard in raw mode.
//! 3. **Batch run:** Runs to completion without a terminal and reports the outcome.

mod render;
mod terminal;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stepvm_core::common::Addr;
use stepvm_core::debugger::session::FrontierStatus;
use stepvm_core::debugger::{Command, Flow};
use stepvm_core::program::{InputSource, Inputs, loader};
use stepvm_core::{Config, Controller};

use render::Renderer;
use terminal::{KeyConfirm, TerminalGuard};

/// Exit code for a run that stopped on a fault, loop or step budget.
const EXIT_RUN_STOPPED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "stepvm",
    author,
    version,
    about = "Rewindable three-address virtual machine",
    long_about = "Load a program and step through it: <enter> advances, <backspace> rewinds, \
                  'v' toggles the full view, 'r' runs to completion, 't' resets, 'e' exits.\n\n\
                  Examples:\n  stepvm programs/sum.txt\n  stepvm --batch --input 0020=7 programs/fact.txt"
)]
struct Cli {
    /// Program file; prompted for when omitted.
    file: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run to completion without the interactive debugger.
    #[arg(long)]
    batch: bool,

    /// Print run statistics on exit.
    #[arg(long)]
    stats: bool,

    /// Value for an input cell, as ADDR=VALUE (ADDR in hex). May be repeated.
    #[arg(short, long = "input", value_name = "ADDR=VALUE", value_parser = parse_input)]
    inputs: Vec<(Addr, i32)>,

    /// Log filter (e.g. `debug`, `stepvm_core=trace`); overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let path = match cli.file {
        Some(path) => path,
        None => select_file()?,
    };
    let program = Arc::new(loader::load_file(&path)?);
    println!("Successfully loaded\n");
    info!(path = %path.display(), "program loaded");

    let mut source = PromptInputs::new(cli.inputs);
    let inputs = program.gather_inputs(&mut source, &Inputs::new())?;
    let mut vm = Controller::new(program, inputs, config)?;

    let code = if cli.batch {
        ExitCode::from(cmd_batch(&mut vm, &mut io::stdout().lock())?)
    } else {
        cmd_interactive(&mut vm, &mut source)?;
        ExitCode::SUCCESS
    };

    if cli.stats {
        vm.session().stats().print();
    }
    Ok(code)
}

/// Installs the global tracing subscriber.
///
/// Logging is off unless `level` or `RUST_LOG` asks for it, so the raw-mode
/// screen is not garbled by default.
fn init_logging(level: Option<&str>, file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = match file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(io::stderr).try_init(),
    };
    installed.map_err(|e| e as Box<dyn Error>)
}

/// Asks for the program path on stdin.
fn select_file() -> Result<PathBuf, Box<dyn Error>> {
    let line = prompt_line("Select file: ")?.ok_or("no file selected")?;
    Ok(PathBuf::from(line.trim()))
}

/// Prints `prompt` and reads one line; `None` at end of input.
fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Parses an `ADDR=VALUE` argument.
fn parse_input(arg: &str) -> Result<(Addr, i32), String> {
    let (addr, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got `{arg}`"))?;
    let addr = addr.trim();
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u16::from_str_radix(digits, 16)
        .map(Addr)
        .map_err(|e| format!("invalid address `{addr}`: {e}"))?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid value `{}`: {e}", value.trim()))?;
    Ok((addr, value))
}

/// Input values from `--input`, with a terminal prompt for the rest.
///
/// Asked again on every reset, so a cell given on the command line keeps its
/// value while a prompted cell is prompted for anew.
#[derive(Debug)]
struct PromptInputs {
    given: Vec<(Addr, i32)>,
    raw_mode: bool,
}

impl PromptInputs {
    const fn new(given: Vec<(Addr, i32)>) -> Self {
        Self {
            given,
            raw_mode: false,
        }
    }

    fn given(&self, addr: Addr) -> Option<i32> {
        self.given
            .iter()
            .rev()
            .find(|(a, _)| *a == addr)
            .map(|&(_, value)| value)
    }
}

impl InputSource for PromptInputs {
    fn value_for(&mut self, addr: Addr) -> Option<i32> {
        if let Some(value) = self.given(addr) {
            return Some(value);
        }
        if !self.raw_mode {
            return read_value(addr);
        }
        terminal::with_line_mode(|| read_value(addr)).unwrap_or_else(|err| {
            warn!(%err, "couldn't leave raw mode for input");
            None
        })
    }
}

/// Prompts `Input to ADDR:` until a number is entered; `None` at end of input.
fn read_value(addr: Addr) -> Option<i32> {
    loop {
        match prompt_line(&format!("Input to {addr}: ")) {
            Ok(Some(line)) => match line.trim().parse::<i32>() {
                Ok(value) => return Some(value),
                Err(_) => eprintln!("not a number: `{}`", line.trim()),
            },
            Ok(None) => return None,
            Err(err) => {
                warn!(%err, "input prompt failed");
                return None;
            }
        }
    }
}

/// Runs to completion and writes the outcome and the final cell values.
///
/// Returns the process exit code: 0 after a halt, [`EXIT_RUN_STOPPED`] otherwise.
fn cmd_batch(vm: &mut Controller, out: &mut impl Write) -> io::Result<u8> {
    vm.run_to_completion();

    let message = vm.status_message().map(|m| m.text).unwrap_or_default();
    writeln!(out, "Debugging: {message}")?;
    writeln!(out, "Rows: {}", vm.session().history().len())?;
    if let Some(row) = vm.row(vm.cursor()) {
        writeln!(out, "Last row: {}", row.pc)?;
        for (cell, value) in vm.program().cells().iter().zip(row.values) {
            writeln!(out, "  {} = {value}", cell.addr)?;
        }
    }

    Ok(match vm.status() {
        FrontierStatus::HaltedOk => 0,
        _ => EXIT_RUN_STOPPED,
    })
}

/// Drives the controller from the keyboard until the user exits.
///
/// A reset asks `inputs` for the input cells again.
fn cmd_interactive(vm: &mut Controller, inputs: &mut PromptInputs) -> Result<(), Box<dyn Error>> {
    let mut renderer = Renderer::default();
    let mut confirm = KeyConfirm;
    {
        let _guard = TerminalGuard::enter()?;
        inputs.raw_mode = true;
        renderer.draw(vm, None)?;
        loop {
            let command = terminal::read_command()?;
            if command == Command::RunToCompletion && vm.session().is_running() {
                renderer.draw(vm, Some("   running..."))?;
            }
            if command == Command::Reset {
                vm.reset_with(&mut confirm, inputs);
            } else if vm.handle(command, &mut confirm) == Flow::Exit {
                renderer.draw_stopped(vm)?;
                break;
            }
            renderer.draw(vm, None)?;
        }
        inputs.raw_mode = false;
    }
    println!("\nexit");
    Ok(())
}
