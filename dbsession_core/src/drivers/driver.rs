use std::sync::Arc;

use crate::config::PropertyMap;
use crate::connections::{Connection, ConnectionError};

/// A loadable implementation providing connectivity to one kind of backend.
pub trait Driver: Send + Sync {
    /// The name the driver is registered and loaded under.
    fn name(&self) -> &str;

    /// Whether this driver understands `url`. The driver manager asks every
    /// registered driver in turn and uses the first that says yes.
    fn accepts_url(&self, url: &str) -> bool;

    fn connect(&self, url: &str, info: &PropertyMap)
        -> Result<Box<dyn Connection>, ConnectionError>;
}

/// Builds a driver instance when a configuration names it.
pub type DriverFactory = Arc<dyn Fn() -> Arc<dyn Driver> + Send + Sync>;
