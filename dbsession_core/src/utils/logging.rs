use log::LevelFilter;

/// Initialize logging using env_logger.
/// Defaults to `info`; `RUST_LOG` overrides it,
/// e.g. `RUST_LOG=dbsession_core=debug dbsession check jdbc.cfg.xml`.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}
