//! 6502 runner binary.
//!
//! Loads a binary image, runs it and prints the final register state.

use std::process;

use emu_core::Cpu;
use log::error;
use mos_6502::Mos6502;
use run_6502::cli::USAGE;
use run_6502::{Cli, format_registers, load_image, logging, parse_args, run};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(Cli::Run(config)) => config,
        Ok(Cli::Help) => {
            eprintln!("{USAGE}");
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::setup_logger(config.verbosity, config.trace_memory) {
        eprintln!("Logger error: {e}");
    }

    let mut bus = match load_image(&config) {
        Ok(bus) => bus,
        Err(e) => {
            error!("failed to load {}: {e}", config.image.display());
            process::exit(1);
        }
    };

    let mut cpu = Mos6502::new();
    cpu.regs.pc = config.start_pc;

    let summary = run(&config, &mut cpu, &mut bus);

    println!("{}", format_registers(&cpu.registers()));
    println!(
        "{} instructions, {} cycles, {} skipped: {}",
        summary.instructions, summary.cycles, summary.skipped, summary.stop
    );

    if summary.stop.is_failure() {
        process::exit(1);
    }
}
