#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for connection and pool lifecycle events.
pub const TRACING_TARGET_CONNECTION: &str = "lantern_client::connection";

/// Tracing target for extension installation.
pub const TRACING_TARGET_MIGRATE: &str = "lantern_client::migrate";

mod client;
mod config;
mod error;
mod hooks;
pub mod migrate;

pub use diesel_async::AsyncPgConnection as LanternConnection;

pub use crate::client::{ConnectionPool, LanternClient, PoolStatus, PooledConnection};
pub use crate::config::LanternConfig;
pub use crate::error::{BoxError, ClientError, ClientResult};
pub use crate::migrate::{
    extension_installed, install_extension, install_extensions, installed_extension_version,
};

pub mod prelude {
    //! Re-exports of the types and traits most queries need.
    //!
    //! ```rust,no_run
    //! use lantern_client::prelude::*;
    //!
    //! # async fn example() -> ClientResult<()> {
    //! let config = LanternConfig::new("postgresql://localhost/postgres");
    //! let client = LanternClient::connect(config).await?;
    //! # Ok(())
    //! # }
    //! ```

    pub use diesel::prelude::*;
    pub use diesel_async::RunQueryDsl;
    pub use lantern::{Extension, HnswIndex, LanternExpressionMethods, Vector};

    pub use crate::client::{LanternClient, PoolStatus};
    pub use crate::config::LanternConfig;
    pub use crate::error::{ClientError, ClientResult};
}
