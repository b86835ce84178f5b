//! Pooled client over `diesel-async` connections.

use std::sync::Arc;

use deadpool::managed::{Hook, Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use lantern::Extension;

use crate::{
    ClientError, ClientResult, LanternConfig, TRACING_TARGET_CONNECTION, hooks, migrate,
};

/// Type alias for the connection pool used by the client.
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Type alias for a connection checked out from the pool.
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Connection pool status information.
#[derive(Debug, Clone)]
pub struct PoolStatus {
    /// Maximum number of connections in the pool.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Number of available connections.
    pub available: usize,
    /// Number of requests waiting for a connection.
    pub waiting: usize,
}

impl PoolStatus {
    /// Returns the utilization of the pool (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.size - self.available) as f64 / self.max_size as f64
        }
    }

    /// Returns whether the pool is under pressure.
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// Pooled database client for a server running the extension.
///
/// Cheap to clone; all clones share the same pool. Connections checked
/// out of the client are plain [`AsyncPgConnection`] objects, usable
/// with the query DSL from the `lantern` crate.
#[derive(Clone)]
pub struct LanternClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for LanternClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanternClient").finish_non_exhaustive()
    }
}

struct ClientInner {
    pool: ConnectionPool,
    config: LanternConfig,
}

impl LanternClient {
    /// Creates a client and its connection pool without touching the
    /// database. No connection is established until the first checkout.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: LanternConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(hooks::setup_callback);
        let manager = AsyncDieselConnectionManager::new_with_config(
            &config.database_url,
            manager_config,
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections as usize)
            .wait_timeout(config.connect_timeout())
            .create_timeout(config.connect_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(hooks::post_create))
            .pre_recycle(Hook::sync_fn(hooks::pre_recycle))
            .build()
            .map_err(|err| {
                ClientError::Unexpected(format!("failed to build connection pool: {}", err).into())
            })?;

        Ok(Self {
            inner: Arc::new(ClientInner { pool, config }),
        })
    }

    /// Creates a client and installs the extension.
    ///
    /// Runs `CREATE EXTENSION IF NOT EXISTS lantern` (and
    /// `lantern_extras` when configured) on a checked-out connection
    /// before returning, so distance operators and the index access
    /// method are available to every query issued through the client.
    pub async fn connect(config: LanternConfig) -> ClientResult<Self> {
        let client = Self::new(config)?;

        let mut conn = client.conn().await?;
        migrate::install_extension(&mut conn, Extension::Lantern).await?;
        if client.config().install_extras {
            migrate::install_extension(&mut conn, Extension::LanternExtras).await?;
        }

        Ok(client)
    }

    /// Checks a connection out of the pool.
    pub async fn conn(&self) -> ClientResult<PooledConnection> {
        self.inner.pool.get().await.map_err(ClientError::from)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LanternConfig {
        &self.inner.config
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.inner.pool
    }

    /// Returns a snapshot of the pool state.
    pub fn status(&self) -> PoolStatus {
        let status = self.inner.pool.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available as usize,
            waiting: status.waiting,
        }
    }

    /// Closes the pool; subsequent checkouts fail.
    pub fn close(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            "Closing connection pool"
        );
        self.inner.pool.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_status_utilization() {
        let status = PoolStatus {
            max_size: 10,
            size: 8,
            available: 3,
            waiting: 0,
        };
        assert_eq!(status.utilization(), 0.5);
        assert!(!status.is_under_pressure());
    }

    #[test]
    fn waiting_requests_mean_pressure() {
        let status = PoolStatus {
            max_size: 10,
            size: 10,
            available: 0,
            waiting: 4,
        };
        assert!(status.is_under_pressure());
    }

    #[test]
    fn empty_pool_has_zero_utilization() {
        let status = PoolStatus {
            max_size: 0,
            size: 0,
            available: 0,
            waiting: 0,
        };
        assert_eq!(status.utilization(), 0.0);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = LanternClient::new(LanternConfig::new("")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
