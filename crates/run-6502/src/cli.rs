//! Command-line argument parsing.

use std::path::PathBuf;

use crate::config::{RunConfig, UnknownOpcodePolicy};

/// Usage text printed for `--help` and after argument errors.
pub const USAGE: &str = "\
Usage: run-6502 [OPTIONS] <image>

Options:
  --image <file>     Binary image to load (may also be given positionally)
  --offset <addr>    Load address for the image [default: 0]
  --pc <addr>        Initial program counter [default: 0]
  --max <n>          Stop after n instructions [default: 1000000]
  --skip-unknown     Skip unknown opcodes instead of halting
  --trace-memory     Log every memory access (needs -vvv)
  -v                 Increase log verbosity (repeatable)
  -h, --help         Print this help

Numbers are decimal, or hex with a `$` or `0x` prefix.";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cli {
    /// Run an image.
    Run(RunConfig),
    /// Print usage and exit.
    Help,
}

/// Parse a number written in decimal, `$FF` or `0xFF` form.
pub fn parse_number(text: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u64::from_str_radix(hex, 16)
    } else if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("invalid number '{text}': {e}"))
}

fn parse_address(flag: &str, text: &str) -> Result<u16, String> {
    let value = parse_number(text)?;
    u16::try_from(value).map_err(|_| format!("{flag}: ${value:X} is outside the 64K address space"))
}

/// Parse arguments, not including the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Cli, String> {
    let mut config = RunConfig::default();
    let mut image: Option<PathBuf> = None;

    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg {
            "--image" => image = Some(PathBuf::from(value(arg)?)),
            "--offset" => {
                let offset = parse_address(arg, value(arg)?)?;
                config.load_offset = usize::from(offset);
            }
            "--pc" => config.start_pc = parse_address(arg, value(arg)?)?,
            "--max" => config.max_instructions = parse_number(value(arg)?)?,
            "--skip-unknown" => config.on_unknown = UnknownOpcodePolicy::Skip,
            "--trace-memory" => config.trace_memory = true,
            "--help" | "-h" => return Ok(Cli::Help),
            flag if flag.len() > 1 && flag.starts_with('-') && flag[1..].bytes().all(|b| b == b'v') => {
                let count = u8::try_from(flag.len() - 1).unwrap_or(u8::MAX);
                config.verbosity = config.verbosity.saturating_add(count);
            }
            other if other.starts_with('-') => return Err(format!("unknown argument: {other}")),
            path => {
                if image.is_some() {
                    return Err(format!("unexpected argument: {path}"));
                }
                image = Some(PathBuf::from(path));
            }
        }
    }

    config.image = image.ok_or("no image given")?;
    Ok(Cli::Run(config))
}
