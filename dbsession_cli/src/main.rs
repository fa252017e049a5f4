mod ui;

use std::error::Error;

use clap::Parser;
use crate::ui::cli;
use dbsession_core::utils::logging::init_logging;

fn main() {
    init_logging();
    let args = cli::Args::parse();
    if let Err(e) = cli::run_cli(args) {
        eprintln!("dbsession error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
