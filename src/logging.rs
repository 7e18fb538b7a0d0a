use std::io::Write;

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};

/// Map `-v` occurrences to a level for commitmuse's own records.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. Warnings and errors are shown by default.
///
/// Call once per process.
pub fn init_logger(verbosity: u8) {
    let level = level_for(verbosity);

    let mut builder = Builder::new();
    // reqwest and hyper are capped at info
    builder
        .filter_level(level.min(LevelFilter::Info))
        .filter_module("commitmuse", level);

    builder.format(|buf, record| {
        let label = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        if record.level() >= Level::Debug {
            let target = record.target().trim_start_matches("commitmuse::");
            writeln!(buf, "{label} {} {}", format!("[{target}]").dimmed(), record.args())
        } else {
            writeln!(buf, "{label} {}", record.args())
        }
    });

    builder.init();
}
