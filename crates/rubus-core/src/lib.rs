//! Shared data cache and polling layer over [`rubus_api`].
//!
//! One [`DataCache`] per router serves every consumer: each
//! [`DataCategory`] carries a freshness interval, concurrent requests for
//! a stale category coalesce into a single RPC, and failed refreshes fall
//! back to the last known value. Clients are pooled per purpose and
//! connected lazily.
//!
//! ```no_run
//! use rubus_core::{DataCache, DataCategory, RouterConfig};
//!
//! # async fn example() -> Result<(), rubus_core::CoreError> {
//! let cache = DataCache::new(RouterConfig::new(
//!     "192.168.1.1",
//!     "root",
//!     "secret".into(),
//! ));
//! let info = cache.get_data(DataCategory::SystemInfo).await?;
//! println!("uptime: {:?}", info.get("uptime"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod category;
pub mod config;
pub mod error;
mod fetch;
pub mod pool;

pub use cache::DataCache;
pub use category::DataCategory;
pub use config::RouterConfig;
pub use error::CoreError;
pub use pool::ClientKind;

pub use rubus_api::{self, Error as ApiError, UbusClient, UbusConfig};
pub use rubus_api::parse::WirelessBackend;
