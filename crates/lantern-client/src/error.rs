//! Error types for client, pool, and migration operations.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::Error as QueryError;

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Specialized [`Result`] type for client operations.
pub type ClientResult<T, E = ClientError> = Result<T, E>;

pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Error type covering all client operations.
///
/// Only configuration validation originates here; everything else wraps
/// a failure surfaced by the driver stack or the database, passed
/// through without retries or recovery.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A pool operation timed out while waiting for, creating, or
    /// recycling a connection.
    #[error("database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Extension installation failed.
    #[error("extension installation error: {0}")]
    Migration(BoxError),

    /// Query execution failed.
    #[error("database query error: {0}")]
    Query(#[from] QueryError),

    /// Failure outside the expected taxonomy.
    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl ClientError {
    /// Returns whether this error indicates a transient failure that
    /// might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Connection(ConnectionError::BadConnection(_))
        )
    }

    /// Returns whether this error indicates a permanent failure that
    /// won't succeed on retry.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

impl From<DeadpoolError> for ClientError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => Self::Unexpected(err.to_string().into()),
            DeadpoolError::NoRuntimeSpecified => {
                Self::Unexpected("no async runtime specified for the connection pool".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "connection pool is closed".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_transient() {
        let error = ClientError::Timeout(TimeoutType::Wait);
        assert!(error.is_transient());
        assert!(!error.is_permanent());
    }

    #[test]
    fn config_errors_are_permanent() {
        let error = ClientError::Config("bad url".into());
        assert!(error.is_permanent());
    }

    #[test]
    fn query_errors_are_permanent() {
        let error = ClientError::Query(QueryError::NotFound);
        assert!(error.is_permanent());
    }

    #[test]
    fn pool_timeout_maps_to_timeout() {
        let error = ClientError::from(DeadpoolError::Timeout(TimeoutType::Create));
        assert!(matches!(error, ClientError::Timeout(TimeoutType::Create)));
    }

    #[test]
    fn closed_pool_maps_to_connection_error() {
        let error = ClientError::from(DeadpoolError::Closed);
        assert!(matches!(error, ClientError::Connection(_)));
        assert!(error.is_permanent());
    }
}
