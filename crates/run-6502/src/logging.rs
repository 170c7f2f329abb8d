//! Logger setup for the binary.

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Level for a `-v` count. Warnings are always shown.
#[must_use]
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a stderr logger. Memory access records stay off unless
/// `trace_memory` is set.
pub fn setup_logger(verbosity: u8, trace_memory: bool) -> Result<(), fern::InitError> {
    let level = level_for(verbosity);
    let memory_level = if trace_memory { level } else { LevelFilter::Off };

    let colors_line = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::Green)
        .trace(Color::Magenta);

    fern::Dispatch::new()
        .level(level)
        .level_for("emu_core::memory", memory_level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{target}:{level}] {message}\x1B[0m",
                color_line = format_args!(
                    "\x1B[{}m",
                    colors_line.get_color(&record.level()).to_fg_str()
                ),
                target = record.target(),
                level = record.level(),
            ));
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(3), LevelFilter::Trace);
        assert_eq!(level_for(200), LevelFilter::Trace);
    }
}
