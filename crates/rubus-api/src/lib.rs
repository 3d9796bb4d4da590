//! Async Rust client for OpenWrt's ubus JSON-RPC-over-HTTP bridge.
//!
//! - **[`UbusClient`]** — session-aware RPC client: login with
//!   expiry-margin renewal, single and batched calls, and normalization of
//!   ubus's status-prefixed result arrays.
//! - **Typed operations** — system/UCI/file/service/wireless/modem
//!   wrappers as inherent methods, one module per subsystem.
//! - **[`parse`]** — pure payload parsers: station lists for both
//!   wireless backends, DHCP leases, MAC canonicalization, vendor-string
//!   numerics.
//!
//! The crate performs no retries and stores nothing beyond in-memory
//! session state; polling cadence and caching live in `rubus-core`.

pub mod client;
pub mod error;
pub mod parse;
pub mod rpc;
pub mod session;
mod subsystems;
pub mod transport;

pub use client::{UbusClient, UbusConfig};
pub use error::Error;
pub use rpc::{RpcCall, RpcMethod, RpcResponse, UbusStatus};
pub use session::RENEWAL_MARGIN;
pub use subsystems::ServiceAction;
pub use transport::{Transport, TransportConfig};
