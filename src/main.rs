//! Dupwalk CLI: duplicates within one tree; files shared with or missing from a second tree.

use clap::Parser;
use dupwalk::engine::arg_parser::Cli;
use dupwalk::engine::handle_run;
use std::time::Instant;

fn main() {
    let start_time = Instant::now();
    let cli = Cli::parse();
    if let Err(e) = handle_run(&cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    log::debug!("Total time: {:?}", start_time.elapsed());
}
