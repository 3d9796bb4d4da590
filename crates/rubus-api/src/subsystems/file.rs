// `file` subsystem: read files and list directories on the router.

use serde_json::{Value, json};

use crate::client::UbusClient;
use crate::error::Error;

impl UbusClient {
    /// Read a file's contents. The payload is `{"data": "<contents>"}`.
    ///
    /// `call file read {"path": ...}`
    pub async fn file_read(&self, path: &str) -> Result<Option<Value>, Error> {
        self.call("file", "read", Some(json!({ "path": path }))).await
    }

    /// List a directory. The payload is `{"entries": [...]}`.
    ///
    /// `call file list {"path": ...}`
    pub async fn file_list(&self, path: &str) -> Result<Option<Value>, Error> {
        self.call("file", "list", Some(json!({ "path": path }))).await
    }
}
