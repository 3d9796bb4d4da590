// `uci` subsystem: read and mutate the Unified Configuration Interface.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;

impl UbusClient {
    /// Read a UCI config, optionally filtered to one section type.
    ///
    /// `call uci get {"config": ..., "type": ...}` -- the payload carries a
    /// `values` map keyed by section name.
    pub async fn uci_get(
        &self,
        config: &str,
        section_type: Option<&str>,
    ) -> Result<Option<Value>, Error> {
        let mut args = json!({ "config": config });
        if let Some(t) = section_type {
            args["type"] = json!(t);
        }
        self.call("uci", "get", Some(args)).await
    }

    /// Stage option values on one section. Changes are not persisted until
    /// [`uci_commit`](Self::uci_commit).
    ///
    /// `call uci set {"config": ..., "section": ..., "values": {...}}`
    pub async fn uci_set(
        &self,
        config: &str,
        section: &str,
        values: Value,
    ) -> Result<Option<Value>, Error> {
        debug!(config, section, "staging uci change");
        self.call(
            "uci",
            "set",
            Some(json!({
                "config": config,
                "section": section,
                "values": values,
            })),
        )
        .await
    }

    /// Commit staged changes for one config.
    ///
    /// `call uci commit {"config": ...}`
    pub async fn uci_commit(&self, config: &str) -> Result<Option<Value>, Error> {
        debug!(config, "committing uci changes");
        self.call("uci", "commit", Some(json!({ "config": config })))
            .await
    }
}
