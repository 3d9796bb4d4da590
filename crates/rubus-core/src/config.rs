// Construction-time configuration for one router connection.
//
// Everything here is plain data supplied by the caller; there is no
// environment, file, or CLI lookup in this layer.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use rubus_api::parse::WirelessBackend;
use rubus_api::{TransportConfig, UbusConfig};

use crate::category::DataCategory;
use crate::error::CoreError;

/// Configuration for a [`crate::DataCache`] serving one router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Host (and optional port) of the router, e.g. `192.168.1.1`.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout for every RPC.
    pub timeout: Duration,
    pub verify_tls: bool,
    /// Which wireless management software the router runs.
    pub wireless_backend: WirelessBackend,
    /// Per-category freshness overrides; unlisted categories keep their
    /// [`DataCategory::default_interval`].
    pub intervals: Vec<(DataCategory, Duration)>,
}

impl RouterConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            timeout: Duration::from_secs(10),
            verify_tls: false,
            wireless_backend: WirelessBackend::default(),
            intervals: Vec::new(),
        }
    }

    pub fn with_wireless_backend(mut self, backend: WirelessBackend) -> Self {
        self.wireless_backend = backend;
        self
    }

    pub fn with_interval(mut self, category: DataCategory, interval: Duration) -> Self {
        self.intervals.push((category, interval));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the API-level client config for this router.
    ///
    /// `host` may carry a scheme already (the tests point it at a local
    /// stub server); otherwise the conventional `http://{host}/ubus`
    /// endpoint is used.
    pub(crate) fn ubus_config(&self) -> Result<UbusConfig, CoreError> {
        let endpoint = if self.host.contains("://") {
            Url::parse(&format!("{}/ubus", self.host.trim_end_matches('/')))
        } else {
            Url::parse(&format!("http://{}/ubus", self.host))
        }
        .map_err(rubus_api::Error::InvalidUrl)?;

        Ok(UbusConfig {
            endpoint,
            username: self.username.clone(),
            password: self.password.clone(),
            transport: TransportConfig {
                timeout: self.timeout,
                verify_tls: self.verify_tls,
            },
        })
    }
}
