//! Klaus Dormann's 6502 functional test harness.
//!
//! The functional test exercises all documented 6502 opcodes.
//! Test binary should be assembled with load address $0000.
//!
//! Test structure:
//! - $0400: Test entry point
//! - Test completes when PC gets stuck (trap - branches to itself)
//! - Success: PC reaches $3469
//! - Failure: PC reaches any other trap address

use emu_core::{AddressSpace, Cpu};
use mos_6502::Mos6502;

/// Outcome of running a test image until it traps.
struct Trap {
    pc: u16,
    instructions: u64,
    cycles: u64,
}

/// Step until an instruction jumps to itself. Returns `None` on a fault
/// or when `limit` instructions pass without a trap.
fn run_until_trap(cpu: &mut Mos6502, bus: &mut AddressSpace, limit: u64) -> Option<Trap> {
    let mut cycles: u64 = 0;
    let mut instructions: u64 = 0;

    while instructions < limit {
        let start_pc = cpu.pc();
        match cpu.step(bus) {
            Ok(spent) => cycles += u64::from(spent),
            Err(e) => {
                eprintln!("\n{e} after {instructions} instructions");
                return None;
            }
        }
        instructions += 1;

        if cpu.pc() == start_pc {
            eprintln!(
                "\nTrapped at ${start_pc:04X} after {instructions} instructions ({cycles} cycles)"
            );
            return Some(Trap {
                pc: start_pc,
                instructions,
                cycles,
            });
        }

        // Progress every 100K instructions
        if instructions % 100_000 == 0 {
            eprint!("\r[{instructions} instructions, PC=${:04X}]", cpu.pc());
        }
    }

    eprintln!("\nTest exceeded {limit} instructions");
    None
}

fn load(path: &str, entry: u16) -> (Mos6502, AddressSpace) {
    let mut bus = AddressSpace::new();
    bus.load_file(path)
        .unwrap_or_else(|e| panic!("{path} not found ({e}); download from Klaus Dormann's repository"));
    let mut cpu = Mos6502::new();
    cpu.regs.pc = entry;
    (cpu, bus)
}

#[test]
#[ignore = "requires tests/data/6502_functional_test.bin"]
fn dormann_functional() {
    let (mut cpu, mut bus) = load("tests/data/6502_functional_test.bin", 0x0400);

    let trap = run_until_trap(&mut cpu, &mut bus, 100_000_000).expect("test did not trap");
    assert!(trap.instructions > 0 && trap.cycles > trap.instructions);
    assert_eq!(trap.pc, 0x3469, "Klaus Dormann 6502 functional test failed");
}

#[test]
#[ignore = "requires tests/data/6502_decimal_test.bin"]
fn dormann_decimal() {
    // Zero-page layout from test:
    // $00=N1, $01=N2, $02=HA, $03=HNVZC, $04=DA, $05=DNVZC
    // $06=AR, $07=NF, $08=VF, $09=ZF, $0A=CF, $0B=ERROR
    let (mut cpu, mut bus) = load("tests/data/6502_decimal_test.bin", 0x0200);

    run_until_trap(&mut cpu, &mut bus, 50_000_000).expect("test did not trap");

    let error = bus.peek(0x000B);
    if error != 0 {
        eprintln!("Test state at failure:");
        eprintln!(
            "  N1=${:02X}, N2=${:02X}, Y(carry_in)={}",
            bus.peek(0x00),
            bus.peek(0x01),
            cpu.regs.y
        );
        eprintln!(
            "  Actual: A=${:02X}, Flags=${:02X}",
            bus.peek(0x04),
            bus.peek(0x05)
        );
        eprintln!(
            "  Predicted: A=${:02X}, C_flag=${:02X}",
            bus.peek(0x06),
            bus.peek(0x0A)
        );
    }
    assert_eq!(error, 0, "Klaus Dormann decimal test failed");
}
