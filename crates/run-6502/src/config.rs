//! Run configuration.

use std::path::PathBuf;

/// What to do when the CPU meets a byte that is not an official opcode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Stop the run and report the fault.
    #[default]
    Halt,
    /// Log the fault and carry on with the next byte.
    Skip,
}

/// Settings for one run of a binary image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Binary image to load.
    pub image: PathBuf,
    /// Address the image's first byte is loaded at.
    pub load_offset: usize,
    /// Initial program counter.
    pub start_pc: u16,
    /// Stop after this many steps, faults included.
    pub max_instructions: u64,
    /// Unknown opcode handling.
    pub on_unknown: UnknownOpcodePolicy,
    /// Log every memory access at trace level.
    pub trace_memory: bool,
    /// Log verbosity, one step per `-v`.
    pub verbosity: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::new(),
            load_offset: 0,
            start_pc: 0,
            max_instructions: 1_000_000,
            on_unknown: UnknownOpcodePolicy::Halt,
            trace_memory: false,
            verbosity: 0,
        }
    }
}
