//! Image loading and the step loop.

use std::fmt;
use std::io;

use emu_core::{AddressSpace, Bus, Cpu};
use log::{debug, info, warn};
use mos_6502::{CpuError, Mos6502, Registers, flags};

use crate::config::{RunConfig, UnknownOpcodePolicy};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The step budget ran out.
    InstructionLimit,
    /// An unknown opcode was met under [`UnknownOpcodePolicy::Halt`].
    UnknownOpcode { opcode: u8, address: u16 },
    /// An instruction jumped or branched to itself.
    Trapped { pc: u16 },
}

impl StopReason {
    /// True if the run ended on a fault.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::UnknownOpcode { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionLimit => write!(f, "instruction limit reached"),
            Self::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode ${opcode:02X} at ${address:04X}")
            }
            Self::Trapped { pc } => write!(f, "trapped at ${pc:04X}"),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed.
    pub instructions: u64,
    /// Cycles spent.
    pub cycles: u64,
    /// Unknown opcodes skipped.
    pub skipped: u64,
    pub stop: StopReason,
}

/// Build the address space described by `config`.
pub fn load_image(config: &RunConfig) -> io::Result<AddressSpace> {
    let mut bus = AddressSpace::new();
    bus.set_trace(config.trace_memory);
    bus.load_file_at(&config.image, config.load_offset)?;
    info!(
        "loaded {} at ${:04X}",
        config.image.display(),
        config.load_offset
    );
    Ok(bus)
}

/// Step `cpu` until it traps, faults or exhausts the step budget.
pub fn run<B: Bus>(config: &RunConfig, cpu: &mut Mos6502, bus: &mut B) -> RunSummary {
    let mut summary = RunSummary {
        instructions: 0,
        cycles: 0,
        skipped: 0,
        stop: StopReason::InstructionLimit,
    };

    while summary.instructions + summary.skipped < config.max_instructions {
        let start_pc = cpu.pc();
        match cpu.step(bus) {
            Ok(cycles) => {
                summary.instructions += 1;
                summary.cycles += u64::from(cycles);
                if cpu.pc() == start_pc {
                    summary.stop = StopReason::Trapped { pc: start_pc };
                    break;
                }
            }
            Err(CpuError::UnknownOpcode { opcode, address }) => match config.on_unknown {
                UnknownOpcodePolicy::Halt => {
                    summary.stop = StopReason::UnknownOpcode { opcode, address };
                    break;
                }
                UnknownOpcodePolicy::Skip => {
                    debug!("skipping ${opcode:02X} at ${address:04X}");
                    summary.skipped += 1;
                }
            },
        }
    }

    if summary.stop.is_failure() {
        warn!("run halted: {}", summary.stop);
    } else {
        info!("run finished: {}", summary.stop);
    }
    summary
}

/// One-line register dump, e.g. `PC=$0402 A=$00 X=$00 Y=$00 S=$FD P=$26 [--1--IZ-]`.
#[must_use]
pub fn format_registers(regs: &Registers) -> String {
    const NAMES: [(u8, char); 8] = [
        (flags::N, 'N'),
        (flags::V, 'V'),
        (flags::U, '1'),
        (flags::B, 'B'),
        (flags::D, 'D'),
        (flags::I, 'I'),
        (flags::Z, 'Z'),
        (flags::C, 'C'),
    ];
    let p = regs.p.to_byte();
    let flag_str: String = NAMES
        .iter()
        .map(|&(bit, name)| if p & bit != 0 { name } else { '-' })
        .collect();
    format!(
        "PC=${:04X} A=${:02X} X=${:02X} Y=${:02X} S=${:02X} P=${p:02X} [{flag_str}]",
        regs.pc, regs.a, regs.x, regs.y, regs.s
    )
}
