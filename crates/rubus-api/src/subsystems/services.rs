// `rc` subsystem: init script enumeration and control.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;

/// Actions accepted by `rc init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Reload,
    Enable,
    Disable,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Reload => "reload",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl UbusClient {
    /// Enumerate init scripts with their start order and enabled state.
    ///
    /// `call rc list`
    pub async fn list_services(&self) -> Result<Option<Value>, Error> {
        self.call("rc", "list", None).await
    }

    /// Run an init script action (start/stop/restart/...).
    ///
    /// `call rc init {"name": ..., "action": ...}`
    pub async fn service_action(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<Option<Value>, Error> {
        debug!(name, action = action.as_str(), "service action");
        self.call(
            "rc",
            "init",
            Some(json!({ "name": name, "action": action.as_str() })),
        )
        .await
    }
}
