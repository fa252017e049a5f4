use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use super::errors::SessionError;
use super::manager::SessionManager;
use crate::config::{load_config, resolve_config_file, ConfigError, PropertyMap};
use crate::connections::{Connection, ConnectionError, TransactionIsolation};
use crate::drivers::DriverManager;

/// Config file read when `initialize` is called without arguments.
pub const DEFAULT_CONFIG_FILE: &str = "jdbc.cfg.xml";

const PROP_DRIVER: &str = "driver";
const PROP_URL: &str = "url";

/// Where and how to connect: the configured URL plus every non-reserved property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    url: String,
    info: PropertyMap,
}

impl ConnectionProfile {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn info(&self) -> &PropertyMap {
        &self.info
    }
}

/// Session manager configured from a property file.
///
/// The `driver` property names a driver to load through the driver registries,
/// `url` is the connection URL, and everything else is passed to the driver as
/// connection properties.
pub struct JdbcSessionManager {
    drivers: Arc<DriverManager>,
    search_dirs: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    profile: Option<ConnectionProfile>,
    default_isolation: Option<TransactionIsolation>,
}

impl Default for JdbcSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl JdbcSessionManager {
    pub fn new() -> Self {
        Self {
            drivers: DriverManager::global(),
            search_dirs: Vec::new(),
            config_file: None,
            profile: None,
            default_isolation: None,
        }
    }

    /// Use `drivers` instead of the process-wide driver manager.
    pub fn with_driver_manager(mut self, drivers: Arc<DriverManager>) -> Self {
        self.drivers = drivers;
        self
    }

    /// Also look for relative config file names under `dir`.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// The resolved config file, once initialization got that far.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn profile(&self) -> Option<&ConnectionProfile> {
        self.profile.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.profile.as_ref().map(ConnectionProfile::url)
    }

    pub fn info(&self) -> Option<&PropertyMap> {
        self.profile.as_ref().map(ConnectionProfile::info)
    }

    /// Isolation level a fresh connection reported during initialization.
    pub fn default_transaction_isolation(&self) -> Option<TransactionIsolation> {
        self.default_isolation
    }

    fn try_initialize(&mut self, config_file: &str) -> Result<(), SessionError> {
        let path = resolve_config_file(config_file, &self.search_dirs)?;
        self.config_file = Some(path.clone());

        let props = load_config(&path)?;
        let profile = self.filtrate(props, &path)?;
        let isolation = self.read_default_isolation(&profile)?;

        self.profile = Some(profile);
        self.default_isolation = Some(isolation);
        Ok(())
    }

    /// Splits the reserved keys off `props`, loading the named driver on the way.
    fn filtrate(&self, mut props: PropertyMap, path: &Path) -> Result<ConnectionProfile, SessionError> {
        if let Some(driver) = props.remove(PROP_DRIVER) {
            self.load_driver(&driver)?;
        }

        let url = props.remove(PROP_URL).ok_or_else(|| ConfigError::MissingUrl {
            path: path.to_path_buf(),
        })?;

        Ok(ConnectionProfile { url, info: props })
    }

    fn load_driver(&self, name: &str) -> Result<(), SessionError> {
        debug!("Loading driver '{}'", name);
        self.drivers
            .load(name)
            .map(|_| ())
            .ok_or_else(|| SessionError::DriverNotFound {
                name: name.to_string(),
            })
    }

    fn read_default_isolation(&self, profile: &ConnectionProfile) -> Result<TransactionIsolation, SessionError> {
        let mut conn = self.drivers.connect(&profile.url, &profile.info)?;
        let level = conn.transaction_isolation();
        if let Err(e) = conn.close() {
            warn!("Failed to close isolation check connection to '{}': {}", profile.url, e);
        }
        Ok(level?)
    }
}

impl SessionManager for JdbcSessionManager {
    fn default_config_file(&self) -> &str {
        DEFAULT_CONFIG_FILE
    }

    fn initialize_with(&mut self, config_file: &str) -> Result<(), SessionError> {
        info!("Initializing session manager from '{}'", config_file);
        match self.try_initialize(config_file) {
            Ok(()) => {
                info!(
                    "Session manager ready for '{}'",
                    self.url().unwrap_or_default()
                );
                Ok(())
            }
            Err(cause) => {
                // report the original failure, not a teardown one
                if let Err(e) = self.un_initialize() {
                    warn!("Teardown after failed initialization also failed: {}", e);
                }
                Err(SessionError::Initialization(Box::new(cause)))
            }
        }
    }

    fn un_initialize(&mut self) -> Result<(), SessionError> {
        if self.profile.is_some() || self.config_file.is_some() {
            info!("Releasing session manager state");
        }
        self.config_file = None;
        self.profile = None;
        self.default_isolation = None;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.profile.is_some()
    }

    fn get_connection(&self) -> Result<Box<dyn Connection>, ConnectionError> {
        let profile = self.profile.as_ref().ok_or(ConnectionError::NotInitialized)?;
        self.drivers.connect(&profile.url, &profile.info)
    }
}
