use std::fmt;
use std::str::FromStr;

use super::errors::ConnectionError;
use crate::config::PropertyMap;

/// Transaction isolation levels a connection may report as its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionIsolation {
    None,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl fmt::Display for TransactionIsolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionIsolation::None => "none",
            TransactionIsolation::ReadUncommitted => "read-uncommitted",
            TransactionIsolation::ReadCommitted => "read-committed",
            TransactionIsolation::RepeatableRead => "repeatable-read",
            TransactionIsolation::Serializable => "serializable",
        };
        f.write_str(name)
    }
}

impl FromStr for TransactionIsolation {
    type Err = String;

    /// Accepts the display names, case-insensitively, with `_` or `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(TransactionIsolation::None),
            "read-uncommitted" => Ok(TransactionIsolation::ReadUncommitted),
            "read-committed" => Ok(TransactionIsolation::ReadCommitted),
            "repeatable-read" => Ok(TransactionIsolation::RepeatableRead),
            "serializable" => Ok(TransactionIsolation::Serializable),
            other => Err(format!("unknown transaction isolation level '{other}'")),
        }
    }
}

/// An open connection handed out by a [`Driver`](crate::drivers::Driver).
///
/// Every call to `connect` yields an independent connection, so implementations
/// only need to be `Send`, not `Sync`.
pub trait Connection: Send + fmt::Debug {
    /// The URL this connection was opened against.
    fn url(&self) -> &str;
    /// The connection properties the driver was given.
    fn info(&self) -> &PropertyMap;
    fn transaction_isolation(&self) -> Result<TransactionIsolation, ConnectionError>;
    fn is_closed(&self) -> bool;
    fn close(&mut self) -> Result<(), ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolation_parse_is_lenient_about_case_and_underscores() {
        assert_eq!(
            "READ_COMMITTED".parse::<TransactionIsolation>(),
            Ok(TransactionIsolation::ReadCommitted)
        );
        assert!("chaos".parse::<TransactionIsolation>().is_err());
    }
}
