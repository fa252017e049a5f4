pub mod driver;
pub mod manager;
pub mod memory;
pub mod registry;

pub use driver::*;
pub use manager::DriverManager;
pub use memory::{MemoryDriver, MEMORY_DRIVER};
pub use registry::{
    clear_context_drivers, find_driver, register_context_driver, register_driver,
    registered_driver_names, DriverRegistry,
};
