//! A deterministic **in‑process stand‑in** for a database driver.
//!
//! *  **From the test’s perspective**
//!    * Register it under a unique name with `FakeDriver::register(name)`.
//!    * Inspect how many connections were opened via the returned `FakeDriverHandle`.
//!
//! *  **Why this exists**: It lets integration tests exercise the *real*
//!    initialization path (config file, registry lookup, driver manager)
//!    without a database server.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dbsession_core::config::PropertyMap;
use dbsession_core::connections::{Connection, ConnectionError, TransactionIsolation};
use dbsession_core::drivers::{self, Driver};

pub const TEST_URL_PREFIX: &str = "jdbc:test:";

/// Shared counters between the test and every driver instance the registry builds.
#[derive(Clone, Default)]
pub struct FakeDriverHandle {
    opened: Arc<AtomicUsize>,
    refuse: Arc<AtomicBool>,
}

impl FakeDriverHandle {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Make every following `connect` fail.
    pub fn refuse_connections(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

pub struct FakeDriver {
    name: String,
    handle: FakeDriverHandle,
}

impl FakeDriver {
    /// Registers a fake driver in the process-wide registry under `name`.
    pub fn register(name: &str) -> FakeDriverHandle {
        let handle = FakeDriverHandle::default();
        let for_factory = handle.clone();
        let driver_name = name.to_string();
        drivers::register_driver(name, move || {
            Arc::new(FakeDriver {
                name: driver_name.clone(),
                handle: for_factory.clone(),
            }) as Arc<dyn Driver>
        });
        handle
    }

    /// Same as `register`, but only visible on the calling thread.
    pub fn register_in_context(name: &str) -> FakeDriverHandle {
        let handle = FakeDriverHandle::default();
        let for_factory = handle.clone();
        let driver_name = name.to_string();
        drivers::register_context_driver(name, move || {
            Arc::new(FakeDriver {
                name: driver_name.clone(),
                handle: for_factory.clone(),
            }) as Arc<dyn Driver>
        });
        handle
    }
}

impl Driver for FakeDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts_url(&self, url: &str) -> bool {
        url.starts_with(TEST_URL_PREFIX)
    }

    fn connect(
        &self,
        url: &str,
        info: &PropertyMap,
    ) -> Result<Box<dyn Connection>, ConnectionError> {
        if self.handle.refuse.load(Ordering::SeqCst) {
            return Err(ConnectionError::Refused(format!("{url} is down")));
        }
        self.handle.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            url: url.to_string(),
            info: info.clone(),
            closed: false,
        }))
    }
}

#[derive(Debug)]
pub struct FakeConnection {
    url: String,
    info: PropertyMap,
    closed: bool,
}

impl Connection for FakeConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn info(&self) -> &PropertyMap {
        &self.info
    }

    fn transaction_isolation(&self) -> Result<TransactionIsolation, ConnectionError> {
        Ok(TransactionIsolation::RepeatableRead)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<(), ConnectionError> {
        self.closed = true;
        Ok(())
    }
}
