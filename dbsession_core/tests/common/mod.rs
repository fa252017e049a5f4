#![allow(dead_code)]

pub mod fake_driver;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dbsession_core::drivers::DriverManager;
use log::LevelFilter;

/// Logs appear only when run with `-- --nocapture` or when the test fails.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A driver manager private to one test, so loaded drivers don't leak between tests.
pub fn private_driver_manager() -> Arc<DriverManager> {
    Arc::new(DriverManager::new())
}

pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("writing the config file should succeed");
    path
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}
