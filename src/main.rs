mod io;
mod kernel;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::io::{loader, logger};
use crate::kernel::Driver;

/// Interactive round-robin process management simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Ticks a process may run before preemption.
    #[arg(long, default_value_t = kernel::TIME_SLICE, value_parser = clap::value_parser!(u32).range(1..))]
    quantum: u32,

    /// Instruction listing every created process runs, replacing the
    /// built-in demo program.
    #[arg(long, value_name = "FILE")]
    program: Option<PathBuf>,

    /// Log kernel diagnostics at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let program = match cli.program {
        Some(path) => match loader::load_program_file(&path) {
            Ok(program) => program,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => loader::demo_program(),
    };

    let mut driver = Driver::new(cli.quantum, program);
    driver.run();

    ExitCode::SUCCESS
}
