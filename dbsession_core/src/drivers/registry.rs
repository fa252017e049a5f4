//! Name → factory lookup used instead of loading driver code by symbol name.
//!
//! Two registries are consulted, in order: the process-wide one (pre-populated
//! with the built-in drivers) and the calling thread's context registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::debug;

use super::driver::{Driver, DriverFactory};
use super::memory::{MemoryDriver, MEMORY_DRIVER};

#[derive(Clone, Default)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that already knows every driver shipped with this crate.
    pub fn with_builtin_drivers() -> Self {
        let mut registry = Self::new();
        registry.register(MEMORY_DRIVER, || Arc::new(MemoryDriver) as Arc<dyn Driver>);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Driver> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiates the driver registered under `name`.
    pub fn instantiate(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

fn global() -> &'static RwLock<DriverRegistry> {
    static GLOBAL: OnceLock<RwLock<DriverRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(DriverRegistry::with_builtin_drivers()))
}

thread_local! {
    static CONTEXT: RefCell<DriverRegistry> = RefCell::new(DriverRegistry::new());
}

/// Makes `name` loadable from any thread.
pub fn register_driver<F>(name: &str, factory: F)
where
    F: Fn() -> Arc<dyn Driver> + Send + Sync + 'static,
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, factory);
}

/// Makes `name` loadable from the current thread only.
pub fn register_context_driver<F>(name: &str, factory: F)
where
    F: Fn() -> Arc<dyn Driver> + Send + Sync + 'static,
{
    CONTEXT.with(|ctx| ctx.borrow_mut().register(name, factory));
}

pub fn clear_context_drivers() {
    CONTEXT.with(|ctx| *ctx.borrow_mut() = DriverRegistry::new());
}

/// Names known to the process-wide registry.
pub fn registered_driver_names() -> Vec<String> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names()
}

/// Instantiates `name` from the process-wide registry, falling back to the
/// current thread's context registry.
pub fn find_driver(name: &str) -> Option<Arc<dyn Driver>> {
    let from_global = global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .instantiate(name);

    if from_global.is_some() {
        debug!("Driver '{}' found in process registry", name);
        return from_global;
    }

    let from_context = CONTEXT.with(|ctx| ctx.borrow().instantiate(name));
    if from_context.is_some() {
        debug!("Driver '{}' found in thread context registry", name);
    }
    from_context
}
