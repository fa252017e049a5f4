use super::errors::SessionError;
use crate::connections::{Connection, ConnectionError};

/// Lifecycle shared by session managers: initialize once from a config file,
/// hand out connections, tear down.
///
/// `initialize` and `un_initialize` take `&mut self`, so callers cannot run
/// them concurrently; `get_connection` takes `&self` and may be called from
/// many threads at once.
pub trait SessionManager {
    /// Config file used when `initialize` gets no arguments.
    fn default_config_file(&self) -> &str;

    /// Initializes from the default config file (no args) or from `args[0]`.
    /// More than one argument fails immediately with
    /// [`SessionError::InvalidParameter`], before any file is touched.
    fn initialize(&mut self, args: &[&str]) -> Result<(), SessionError> {
        match args {
            [] => {
                let default = self.default_config_file().to_string();
                self.initialize_with(&default)
            }
            [config_file] => self.initialize_with(config_file),
            _ => Err(SessionError::InvalidParameter(format!(
                "initialize takes at most one config file, got {}",
                args.len()
            ))),
        }
    }

    fn initialize_with(&mut self, config_file: &str) -> Result<(), SessionError>;

    /// Releases everything `initialize` set up. Safe to call more than once,
    /// and after a failed `initialize`.
    fn un_initialize(&mut self) -> Result<(), SessionError>;

    fn is_initialized(&self) -> bool;

    /// Opens a new, independent connection. Driver errors are returned as-is.
    fn get_connection(&self) -> Result<Box<dyn Connection>, ConnectionError>;
}
