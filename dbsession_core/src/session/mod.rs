pub mod errors;
pub mod jdbc;
pub mod manager;

pub use errors::SessionError;
pub use jdbc::{ConnectionProfile, JdbcSessionManager, DEFAULT_CONFIG_FILE};
pub use manager::SessionManager;
