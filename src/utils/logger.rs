use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

/// Last segment of the record's module path (`dupwalk::pipeline::walk` → `walk`).
fn short_target<'a>(record: &'a Record<'_>) -> &'a str {
    let target = record.module_path().unwrap_or(record.target());
    target.rsplit("::").next().unwrap_or(target)
}

/// Install the stderr logger. Crate level is Info, Debug with `verbose`; dependencies Warn.
/// Debug and trace lines name the module they came from, since pipeline tasks interleave.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", name.cyan(), "ERROR".red(), record.args()),
                Level::Warn => format!("[{} {}] {}", name.cyan(), "WARN".yellow(), record.args()),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
                Level::Debug | Level::Trace => format!(
                    "[{}:{}] {}",
                    name.cyan(),
                    short_target(record).dimmed(),
                    record.args()
                ),
            };
            writeln!(buf, "{}", line)
        })
        .init();
}
