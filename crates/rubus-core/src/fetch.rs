// Per-category fetch routines.
//
// Each category maps onto one RPC shape (or one batch) against the pool.
// These run under the category's slot lock in `cache.rs`, so a routine is
// executed at most once per interval no matter how many consumers ask.

use serde_json::{Map, Value, json};
use tracing::debug;

use rubus_api::UbusClient;
use rubus_api::parse::{DhcpLease, WirelessBackend, parse_ipv4_leases, scrub_number};

use crate::cache::DataCache;
use crate::category::DataCategory;
use crate::error::CoreError;
use crate::pool::ClientKind;

const CONNTRACK_COUNT_PATH: &str = "/proc/sys/net/netfilter/nf_conntrack_count";

impl DataCache {
    /// Fetch `category` fresh from the router.
    pub(crate) async fn fetch(&self, category: DataCategory) -> Result<Value, CoreError> {
        match category {
            DataCategory::SystemInfo => {
                let client = self.pool.get(ClientKind::Default).await?;
                Ok(client.system_info().await?.unwrap_or(Value::Null))
            }
            DataCategory::SystemBoard => {
                let client = self.pool.get(ClientKind::Default).await?;
                Ok(client.system_board().await?.unwrap_or(Value::Null))
            }
            DataCategory::NetworkDevices => {
                let client = self.pool.get(ClientKind::Default).await?;
                Ok(client.device_status().await?.unwrap_or(Value::Null))
            }
            DataCategory::DhcpLeases => {
                let client = self.pool.get(ClientKind::Default).await?;
                let payload = client.dhcp_ipv4_leases().await?;
                let leases = parse_ipv4_leases(payload.as_ref());
                to_json(&leases)
            }
            DataCategory::ConntrackCount => self.fetch_conntrack_count().await,
            DataCategory::QmodemInfo => self.fetch_qmodem_info().await,
            DataCategory::DeviceStatistics => self.fetch_device_statistics().await,
        }
    }

    /// Read the kernel's connection-tracking counter via the `file`
    /// subsystem. The payload data is a decimal string with a trailing
    /// newline, hence the scrub.
    async fn fetch_conntrack_count(&self) -> Result<Value, CoreError> {
        let client = self.pool.get(ClientKind::Default).await?;
        let payload = client.file_read(CONNTRACK_COUNT_PATH).await?;

        let count = payload
            .as_ref()
            .and_then(|p| p.get("data"))
            .and_then(Value::as_str)
            .and_then(scrub_number);
        Ok(count.map_or(Value::Null, Value::from))
    }

    /// QModem status. Routers without the `modem_ctrl` subsystem (which
    /// is most of them) report null rather than an error, so the category
    /// can stay enabled everywhere.
    async fn fetch_qmodem_info(&self) -> Result<Value, CoreError> {
        let client = self.pool.get(ClientKind::Qmodem).await?;

        let available = match client.list_modem_ctrl().await {
            Ok(Some(listing)) => listing
                .as_object()
                .is_some_and(|subsystems| !subsystems.is_empty()),
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "modem_ctrl probe failed");
                false
            }
        };
        if !available {
            debug!("modem_ctrl not present on this router");
            return Ok(Value::Null);
        }

        Ok(client.modem_info().await?.unwrap_or(Value::Null))
    }

    /// Wireless station statistics merged with DHCP identity, keyed by
    /// MAC. AP discovery and per-AP station queries go to the backend's
    /// client; lease data is best-effort decoration.
    async fn fetch_device_statistics(&self) -> Result<Value, CoreError> {
        let (kind, hostapd) = match self.backend {
            WirelessBackend::Hostapd => (ClientKind::Hostapd, true),
            WirelessBackend::Iwinfo => (ClientKind::Iwinfo, false),
        };
        let client = self.pool.get(kind).await?;

        let discovery = if hostapd {
            client.list_hostapd().await?
        } else {
            client.iwinfo_devices().await?
        };
        let interfaces = self.backend.parse_ap_devices(discovery.as_ref());
        if interfaces.is_empty() {
            debug!("no wireless interfaces discovered");
            return Ok(Value::Object(Map::new()));
        }

        let calls = UbusClient::station_batch(&interfaces, hostapd);
        let results = client.batch_call(&calls).await?;

        let leases = self.lease_index().await;

        let mut out = Map::new();
        for (interface, result) in interfaces.iter().zip(results) {
            let payload = match result {
                Ok(payload) => payload,
                Err(e) => {
                    debug!(interface, error = %e, "station query failed for interface");
                    continue;
                }
            };
            for station in self.backend.parse_stations(interface, payload.as_ref()) {
                let mac = station.mac.clone();
                let mut entry = match to_json(&station)? {
                    Value::Object(obj) => obj,
                    other => {
                        let mut obj = Map::new();
                        obj.insert("station".into(), other);
                        obj
                    }
                };
                entry.insert("connected".into(), json!(true));
                if let Some(lease) = leases.iter().find(|l| l.mac == mac) {
                    entry.insert("hostname".into(), json!(lease.hostname.clone()));
                    entry.insert("ip_address".into(), json!(lease.ip.clone()));
                }
                out.insert(mac, Value::Object(entry));
            }
        }
        Ok(Value::Object(out))
    }

    /// Current leases for decorating station records. Uses the cached
    /// category so a combined request does not fetch leases twice; any
    /// failure degrades to anonymous stations.
    ///
    /// Boxed because this re-enters `get_data` from inside a fetch,
    /// which would otherwise make the future type recursive.
    async fn lease_index(&self) -> Vec<DhcpLease> {
        match Box::pin(self.get_data(DataCategory::DhcpLeases)).await {
            Ok(value) => serde_json::from_value(value).unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "lease lookup unavailable");
                Vec::new()
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| {
        CoreError::Api(rubus_api::Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })
    })
}
