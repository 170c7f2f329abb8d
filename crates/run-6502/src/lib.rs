//! Host program for the 6502 interpreter.
//!
//! Loads a binary image into a flat address space, points the CPU at it
//! and steps until the program traps, faults or runs out of budget.

pub mod cli;
pub mod config;
pub mod logging;
pub mod runner;

pub use cli::{Cli, parse_args};
pub use config::{RunConfig, UnknownOpcodePolicy};
pub use runner::{RunSummary, StopReason, format_registers, load_image, run};
