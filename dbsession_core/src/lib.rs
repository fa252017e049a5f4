pub mod config;
pub mod connections;
pub mod drivers;
pub mod mvc;
pub mod session;
pub mod utils;

// re‑export ergonomic entry points
pub use config::{load_config, PropertyMap};
pub use connections::{Connection, ConnectionError, TransactionIsolation};
pub use drivers::{Driver, DriverManager};
pub use session::{JdbcSessionManager, SessionError, SessionManager, DEFAULT_CONFIG_FILE};
