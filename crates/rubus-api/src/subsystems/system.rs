// `system` subsystem: info, board identification, reboot.

use serde_json::Value;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;

impl UbusClient {
    /// Runtime system stats: uptime, load, memory, swap.
    ///
    /// `call system info`
    pub async fn system_info(&self) -> Result<Option<Value>, Error> {
        self.call("system", "info", None).await
    }

    /// Static board identification: hostname, model, release.
    ///
    /// `call system board`
    pub async fn system_board(&self) -> Result<Option<Value>, Error> {
        self.call("system", "board", None).await
    }

    /// Reboot the router. No acknowledgement beyond RPC success; the
    /// connection will drop shortly after.
    ///
    /// `call system reboot`
    pub async fn system_reboot(&self) -> Result<Option<Value>, Error> {
        debug!("requesting reboot");
        self.call("system", "reboot", None).await
    }
}
