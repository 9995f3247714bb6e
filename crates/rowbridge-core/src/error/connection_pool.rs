use super::Error;

/// No connection could be built or checked out.
#[derive(Debug)]
pub(super) struct ConnectionPoolError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ConnectionPoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl core::fmt::Display for ConnectionPoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection pool: {}", self.source)
    }
}

impl Error {
    pub fn connection_pool(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::ConnectionPool(ConnectionPoolError {
            source: Box::new(err),
        }))
    }

    pub fn is_connection_pool(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::ConnectionPool(_)))
    }
}
