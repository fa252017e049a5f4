use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dbsession_core::connections::ConnectionError;
use dbsession_core::drivers::registered_driver_names;
use dbsession_core::{JdbcSessionManager, SessionError, SessionManager};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "dbsession", version, subcommand_required = true)]
pub struct Args {
    /// Extra directory to look in for relative config file names (repeatable)
    #[arg(long = "search-dir", global = true)]
    pub search_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize from a config file and open one connection
    Check {
        /// Config file (default: jdbc.cfg.xml)
        config: Option<String>,
    },
    /// Print the connection properties passed to the driver
    Props {
        /// Config file (default: jdbc.cfg.xml)
        config: Option<String>,
        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },
    /// List driver names that configs can refer to
    Drivers,
}

pub fn run_cli(args: Args) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match args.command {
        Command::Check { config } => run_check(&args.search_dirs, config.as_deref(), &mut out),
        Command::Props { config, json } => {
            run_props(&args.search_dirs, config.as_deref(), json, &mut out)
        }
        Command::Drivers => {
            for name in registered_driver_names() {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
    }
}

fn initialized_manager(
    search_dirs: &[PathBuf],
    config: Option<&str>,
) -> Result<JdbcSessionManager, SessionError> {
    let mut manager = search_dirs
        .iter()
        .fold(JdbcSessionManager::new(), |m, dir| m.with_search_dir(dir));
    let args: Vec<&str> = config.into_iter().collect();
    manager.initialize(&args)?;
    Ok(manager)
}

fn run_check(
    search_dirs: &[PathBuf],
    config: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut manager = initialized_manager(search_dirs, config)?;

    let mut conn = manager.get_connection()?;
    info!("Opened connection to '{}'", conn.url());
    if let Some(path) = manager.config_file() {
        writeln!(out, "config:     {}", path.display())?;
    }
    writeln!(out, "url:        {}", conn.url())?;
    writeln!(out, "isolation:  {}", conn.transaction_isolation()?)?;
    writeln!(out, "properties: {}", conn.info().len())?;
    conn.close()?;

    manager.un_initialize()?;
    Ok(())
}

fn run_props(
    search_dirs: &[PathBuf],
    config: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut manager = initialized_manager(search_dirs, config)?;

    if let Some(info) = manager.info() {
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(info)?)?;
        } else {
            for (key, value) in info.iter() {
                writeln!(out, "{key}={value}")?;
            }
        }
    }

    manager.un_initialize()?;
    Ok(())
}
