//! Intcode program runner.
//!
//! Loads a program file and runs it on a fresh machine.
//!
//! # Usage
//! ```text
//! intcode <program-file> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program-file`: Comma-separated program text
//!
//! # Options
//! - `-i, --input <v1,v2,...>`: Values queued as input before the run
//! - `-p, --poke <addr=value>`: Patch a memory word before the run (repeatable)
//! - `-t, --trace`: Log every executed instruction
//! - `--profile`: Print executed instructions per category
//! - `--interactive`: Prompt on stdin whenever the machine waits for input
//! - `--max-steps <n>`: Step budget per run
//! - `-d, --disasm`: Print a listing instead of running
//!
//! # Examples
//! ```text
//! intcode day05.txt --input 5
//! intcode day02.txt --poke 1=12 --poke 2=2
//! intcode day13.txt --poke 0=2 --interactive
//! ```

use intcode::pipeline::{Driver, drive};
use intcode::utils::log::{self, Level};
use intcode::virtual_machine::disasm::listing;
use intcode::virtual_machine::errors::VMError;
use intcode::virtual_machine::program::Program;
use intcode::virtual_machine::vm::{ExecState, Limits, StepProfile, VM};
use intcode::{error, info, warn};
use std::env;
use std::io::{self, BufRead, Write};
use std::process;

/// Upper bound on prompts in interactive mode.
const MAX_PROMPTS: usize = 1_000_000;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let program_path = &args[1];
    let mut inputs: Vec<i64> = Vec::new();
    let mut pokes: Vec<(usize, i64)> = Vec::new();
    let mut trace = false;
    let mut profile = false;
    let mut interactive = false;
    let mut disasm = false;
    let mut limits = Limits::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--input" | "-i") => {
                let value = flag_value(&args, i, k);
                inputs.extend(parse_values(value).unwrap_or_else(|e| {
                    error!("{k}: {e}");
                    process::exit(1);
                }));
                i += 2;
            }
            k @ ("--poke" | "-p") => {
                let value = flag_value(&args, i, k);
                pokes.push(parse_poke(value).unwrap_or_else(|e| {
                    error!("{k}: {e}");
                    process::exit(1);
                }));
                i += 2;
            }
            k @ "--max-steps" => {
                let value = flag_value(&args, i, k);
                limits.max_steps = value.parse::<u64>().unwrap_or_else(|_| {
                    error!("Invalid step budget: '{}' is not a valid number", value);
                    process::exit(1);
                });
                if limits.max_steps == 0 {
                    error!("Step budget must be greater than 0");
                    process::exit(1);
                }
                i += 2;
            }
            "--trace" | "-t" => {
                trace = true;
                i += 1;
            }
            "--profile" => {
                profile = true;
                i += 1;
            }
            "--interactive" => {
                interactive = true;
                i += 1;
            }
            "--disasm" | "-d" => {
                disasm = true;
                i += 1;
            }
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let program = Program::load_file(program_path).unwrap_or_else(|e| {
        error!("Failed to load {}: {}", program_path, e);
        process::exit(1);
    });

    if disasm {
        print!("{}", listing(&program));
        return;
    }

    let mut vm = VM::with_limits(&program, limits);
    for &(address, value) in &pokes {
        vm.poke(address, value);
    }
    vm.feed(inputs);
    if trace {
        log::set_min_level(Level::Debug);
        vm.set_trace(true);
    }

    let result = if interactive {
        run_interactive(&mut vm)
    } else {
        run_batch(&mut vm)
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }

    info!("Halted after {} steps", vm.steps());
    if profile {
        print_profile(vm.profile());
    }
}

/// Runs with all input supplied up front and prints every output.
fn run_batch(vm: &mut VM) -> Result<(), VMError> {
    let budget = vm.limits().max_steps;
    let state = vm.run_bounded(budget)?;
    for value in vm.drain_outputs() {
        println!("{value}");
    }
    match state {
        ExecState::Halted => Ok(()),
        ExecState::Suspended => Err(VMError::UnexpectedSuspend { offset: vm.ip() }),
        ExecState::Running => Err(VMError::StepBudgetExhausted { budget }),
    }
}

/// Runs with input read from stdin on every suspension.
fn run_interactive(vm: &mut VM) -> Result<(), VMError> {
    let mut console = Console { shown: 0 };
    let prompts = drive(vm, &mut console, MAX_PROMPTS)?;
    console.flush(vm.outputs());
    info!("Answered {} prompts", prompts);
    Ok(())
}

/// Prints new outputs and reads the next inputs from stdin.
struct Console {
    shown: usize,
}

impl Console {
    fn flush(&mut self, outputs: &[i64]) {
        for value in &outputs[self.shown..] {
            println!("{value}");
        }
        self.shown = outputs.len();
    }
}

impl Driver for Console {
    fn respond(&mut self, outputs: &[i64]) -> Vec<i64> {
        self.flush(outputs);

        let stdin = io::stdin();
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => return Vec::new(),
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    return Vec::new();
                }
            }

            match parse_values(&line) {
                Ok(values) if !values.is_empty() => return values,
                Ok(_) => warn!("Machine is waiting for input"),
                Err(e) => warn!("{e}"),
            }
        }
    }
}

/// Parses integers separated by commas or whitespace.
fn parse_values(text: &str) -> Result<Vec<i64>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("'{token}' is not a valid integer"))
        })
        .collect()
}

/// Parses `addr=value`.
fn parse_poke(text: &str) -> Result<(usize, i64), String> {
    let (address, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected addr=value, got '{text}'"))?;
    let address = address
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{address}' is not a valid address"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{value}' is not a valid integer"))?;
    Ok((address, value))
}

/// Returns the argument following flag `k`, or exits.
fn flag_value<'a>(args: &'a [String], i: usize, k: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            error!("{k} requires an argument");
            process::exit(1);
        }
    }
}

fn print_profile(profile: &StepProfile) {
    let total_u = profile.total();
    let total = total_u as f64;

    let cat_w = 2 + profile
        .iter()
        .map(|(c, _)| c.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("total".chars().count());

    let amt_w = profile
        .iter()
        .map(|(_, a)| format_with_commas(a).chars().count())
        .max()
        .unwrap_or(0)
        .max(format_with_commas(total_u).chars().count());

    let dash_w = cat_w + 1 + amt_w + 2 + "( 100.0%)".len();

    println!("Step Profile:");
    println!("{}", "-".repeat(dash_w));

    for (category, amount) in profile.iter() {
        if amount == 0 {
            continue;
        }

        let percent = if total > 0.0 {
            (amount as f64 / total) * 100.0
        } else {
            0.0
        };

        println!(
            "{:<cat_w$} {:>amt_w$} ({:>5.1}%)",
            category.as_str(),
            format_with_commas(amount),
            percent,
        );
    }

    println!("{}", "-".repeat(dash_w));
    println!(
        "{:<cat_w$} {:>amt_w$} ({:>5.1}%)",
        "total",
        format_with_commas(total_u),
        100.0,
    );
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

const USAGE: &str = "\
Intcode Runner

USAGE:
    {program} <program-file> [OPTIONS]

ARGS:
    <program-file>    Comma-separated program text

OPTIONS:
    -i, --input <v1,v2,...>   Values queued as input before the run
    -p, --poke <addr=value>   Patch a memory word before the run (repeatable)
    -t, --trace               Log every executed instruction
        --profile             Print executed instructions per category
        --interactive         Prompt on stdin whenever the machine waits for input
        --max-steps <n>       Step budget per run
    -d, --disasm              Print a listing instead of running
    -h, --help                Print this help message

EXAMPLES:
    # Run with a single input value
    {program} day05.txt --input 5

    # Patch two words, then run
    {program} day02.txt --poke 1=12 --poke 2=2

    # Play interactively
    {program} day13.txt --poke 0=2 --interactive
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
