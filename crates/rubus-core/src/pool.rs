// Per-purpose client pool.
//
// Routers tend to scope ubus ACLs narrowly, so the session that may call
// `hostapd.*` is usually not the one that may call `system` or `file`.
// Rather than juggling one over-privileged login, the cache keeps one
// lazily connected client per purpose and reuses it across refreshes.

use std::collections::HashMap;
use std::sync::Arc;

use strum::Display;
use tokio::sync::Mutex;
use tracing::debug;

use rubus_api::{Error as ApiError, UbusClient};

use crate::config::RouterConfig;
use crate::error::CoreError;

/// The purpose a pooled client serves.
///
/// All kinds currently share one set of credentials; the split still
/// isolates session renewal churn per subsystem family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClientKind {
    /// General system, network, and file calls.
    Default,
    /// Station lists via `hostapd.*`.
    Hostapd,
    /// Station lists via `iwinfo`.
    Iwinfo,
    /// `modem_ctrl` probing.
    Qmodem,
}

/// Lazily connected [`UbusClient`]s keyed by purpose.
pub(crate) struct ClientPool {
    config: RouterConfig,
    clients: Mutex<HashMap<ClientKind, Arc<UbusClient>>>,
}

impl ClientPool {
    pub(crate) fn new(config: RouterConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Get the client for `kind`, connecting it on first use.
    ///
    /// A rejected login is surfaced as [`CoreError::Connect`] and the
    /// client is not retained, so the next request retries the login.
    pub(crate) async fn get(&self, kind: ClientKind) -> Result<Arc<UbusClient>, CoreError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&kind) {
            return Ok(Arc::clone(client));
        }

        debug!(%kind, host = %self.config.host, "connecting ubus client");
        let client = UbusClient::new(self.config.ubus_config()?)
            .map_err(|source| CoreError::Connect { kind, source })?;
        match client.connect().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(CoreError::Connect {
                    kind,
                    source: ApiError::Authentication {
                        message: "credentials rejected".into(),
                    },
                });
            }
            Err(source) => return Err(CoreError::Connect { kind, source }),
        }

        let client = Arc::new(client);
        clients.insert(kind, Arc::clone(&client));
        Ok(client)
    }

    /// Forget every pooled client, dropping their sessions locally.
    pub(crate) async fn close(&self) {
        let mut clients = self.clients.lock().await;
        for client in clients.values() {
            client.logout().await;
        }
        clients.clear();
    }
}
