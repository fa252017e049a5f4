use log::debug;

use super::driver::Driver;
use crate::config::PropertyMap;
use crate::connections::{Connection, ConnectionError, TransactionIsolation};

/// Registry name of the built-in in-process driver.
pub const MEMORY_DRIVER: &str = "memory";

const URL_PREFIX: &str = "mem:";
const ISOLATION_PROPERTY: &str = "isolation";

/// In-process driver for `mem:<name>` URLs.
///
/// Opens nothing external; useful for checking a configuration end to end.
/// The default isolation level can be set with the `isolation` property.
#[derive(Debug, Default)]
pub struct MemoryDriver;

impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        MEMORY_DRIVER
    }

    fn accepts_url(&self, url: &str) -> bool {
        url.starts_with(URL_PREFIX)
    }

    fn connect(
        &self,
        url: &str,
        info: &PropertyMap,
    ) -> Result<Box<dyn Connection>, ConnectionError> {
        let database = url.strip_prefix(URL_PREFIX).unwrap_or_default();
        if database.trim().is_empty() {
            return Err(ConnectionError::Refused(format!(
                "'{url}' does not name a database"
            )));
        }

        let isolation = match info.get(ISOLATION_PROPERTY) {
            Some(level) => level.parse().map_err(ConnectionError::Refused)?,
            None => TransactionIsolation::ReadCommitted,
        };

        debug!("Opened in-memory connection to '{}'", database);
        Ok(Box::new(MemoryConnection {
            url: url.to_string(),
            info: info.clone(),
            isolation,
            closed: false,
        }))
    }
}

#[derive(Debug)]
pub struct MemoryConnection {
    url: String,
    info: PropertyMap,
    isolation: TransactionIsolation,
    closed: bool,
}

impl Connection for MemoryConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn info(&self) -> &PropertyMap {
        &self.info
    }

    fn transaction_isolation(&self) -> Result<TransactionIsolation, ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        Ok(self.isolation)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<(), ConnectionError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_mem_urls() {
        let driver = MemoryDriver;
        assert!(driver.accepts_url("mem:orders"));
        assert!(!driver.accepts_url("jdbc:test://host/db"));
    }

    #[test]
    fn connection_reports_configured_isolation_until_closed() {
        let info: PropertyMap = vec![("isolation", "serializable")].into_iter().collect();
        let mut conn = MemoryDriver
            .connect("mem:orders", &info)
            .expect("memory connect should succeed");

        assert_eq!(conn.url(), "mem:orders");
        assert_eq!(
            conn.transaction_isolation().expect("open connection"),
            TransactionIsolation::Serializable
        );

        conn.close().expect("close should succeed");
        assert!(conn.is_closed());
        assert!(matches!(
            conn.transaction_isolation(),
            Err(ConnectionError::Closed)
        ));
    }

    #[test]
    fn refuses_url_without_database_name() {
        let err = MemoryDriver
            .connect("mem:", &PropertyMap::new())
            .expect_err("empty database name must be refused");
        assert!(matches!(err, ConnectionError::Refused(_)));
    }

    #[test]
    fn refuses_unknown_isolation_level() {
        let info: PropertyMap = vec![("isolation", "chaos")].into_iter().collect();
        assert!(MemoryDriver.connect("mem:orders", &info).is_err());
    }
}
