use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{debug, info};

use super::driver::Driver;
use super::registry::find_driver;
use crate::config::PropertyMap;
use crate::connections::{Connection, ConnectionError};

/// The set of loaded drivers, asked in registration order for a URL.
///
/// `connect` only takes a read lock, so many threads can open connections at
/// once; registration is rare and takes the write lock.
#[derive(Default)]
pub struct DriverManager {
    drivers: RwLock<Vec<Arc<dyn Driver>>>,
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide manager session managers use unless given their own.
    pub fn global() -> Arc<DriverManager> {
        static GLOBAL: OnceLock<Arc<DriverManager>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(DriverManager::new())))
    }

    /// Adds `driver` unless one with the same name is already loaded.
    /// Returns whether it was added.
    pub fn register(&self, driver: Arc<dyn Driver>) -> bool {
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);
        if drivers.iter().any(|d| d.name() == driver.name()) {
            debug!("Driver '{}' already loaded", driver.name());
            return false;
        }
        info!("Loaded driver '{}'", driver.name());
        drivers.push(driver);
        true
    }

    pub fn deregister(&self, name: &str) -> bool {
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);
        let before = drivers.len();
        drivers.retain(|d| d.name() != name);
        drivers.len() != before
    }

    /// Names of the loaded drivers in lookup order.
    pub fn drivers(&self) -> Vec<String> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    pub fn driver_for(&self, url: &str) -> Option<Arc<dyn Driver>> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.accepts_url(url))
            .cloned()
    }

    /// Opens a new connection with the first driver that accepts `url`.
    pub fn connect(
        &self,
        url: &str,
        info: &PropertyMap,
    ) -> Result<Box<dyn Connection>, ConnectionError> {
        let driver = self
            .driver_for(url)
            .ok_or_else(|| ConnectionError::NoSuitableDriver {
                url: url.to_string(),
            })?;
        debug!("Connecting to '{}' with driver '{}'", url, driver.name());
        driver.connect(url, info)
    }

    /// Resolves `name` through the driver registries and loads it here.
    /// `None` if no registry knows the name.
    pub fn load(&self, name: &str) -> Option<Arc<dyn Driver>> {
        let driver = find_driver(name)?;
        self.register(Arc::clone(&driver));
        Some(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::memory::{MemoryDriver, MEMORY_DRIVER};

    #[test]
    fn connect_without_matching_driver_fails() {
        let manager = DriverManager::new();
        let err = manager
            .connect("mem:orders", &PropertyMap::new())
            .expect_err("no drivers loaded yet");
        assert!(matches!(err, ConnectionError::NoSuitableDriver { .. }));
    }

    #[test]
    fn load_registers_once() {
        let manager = DriverManager::new();
        assert!(manager.load(MEMORY_DRIVER).is_some());
        assert!(manager.load(MEMORY_DRIVER).is_some());
        assert_eq!(manager.drivers(), [MEMORY_DRIVER]);

        let conn = manager
            .connect("mem:orders", &PropertyMap::new())
            .expect("memory driver accepts mem: urls");
        assert_eq!(conn.url(), "mem:orders");
    }

    #[test]
    fn global_is_one_shared_instance() {
        assert!(Arc::ptr_eq(&DriverManager::global(), &DriverManager::global()));
    }

    #[test]
    fn deregister_removes_driver() {
        let manager = DriverManager::new();
        assert!(manager.register(Arc::new(MemoryDriver)));
        assert!(manager.deregister(MEMORY_DRIVER));
        assert!(!manager.deregister(MEMORY_DRIVER));
        assert!(manager.driver_for("mem:orders").is_none());
    }
}
