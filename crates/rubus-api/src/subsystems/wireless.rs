// Wireless subsystems: iwinfo queries, hostapd discovery, station
// listing, and device kick.

use serde_json::{Value, json};
use tracing::info;

use crate::client::UbusClient;
use crate::error::Error;
use crate::rpc::RpcCall;

impl UbusClient {
    /// Wireless interface names known to iwinfo. Payload: `{"devices": [...]}`.
    ///
    /// `call iwinfo devices`
    pub async fn iwinfo_devices(&self) -> Result<Option<Value>, Error> {
        self.call("iwinfo", "devices", None).await
    }

    /// Associated stations on one interface. Payload: `{"results": [...]}`.
    ///
    /// `call iwinfo assoclist {"device": ...}`
    pub async fn iwinfo_assoclist(&self, device: &str) -> Result<Option<Value>, Error> {
        self.call("iwinfo", "assoclist", Some(json!({ "device": device })))
            .await
    }

    /// Radio details (ssid, channel, signal) for one interface.
    ///
    /// `call iwinfo info {"device": ...}`
    pub async fn iwinfo_info(&self, device: &str) -> Result<Option<Value>, Error> {
        self.call("iwinfo", "info", Some(json!({ "device": device })))
            .await
    }

    /// Discover hostapd AP instances. The result object is keyed by full
    /// subsystem path (`hostapd.wlan0`, ...).
    ///
    /// `list hostapd.*`
    pub async fn list_hostapd(&self) -> Result<Option<Value>, Error> {
        self.list("hostapd.*").await
    }

    /// Connected clients of one hostapd instance. `hostapd` is the full
    /// discovered subsystem path (e.g. `hostapd.wlan0`). Payload:
    /// `{"clients": {"<mac>": {...}}}`.
    ///
    /// `call hostapd.<iface> get_clients`
    pub async fn hostapd_clients(&self, hostapd: &str) -> Result<Option<Value>, Error> {
        self.call(hostapd, "get_clients", None).await
    }

    /// One [`RpcCall`] per interface for station data, for use with
    /// [`batch_call`](Self::batch_call) -- N interfaces, one round trip.
    ///
    /// For iwinfo the interfaces are radio device names; for hostapd they
    /// are full `hostapd.*` subsystem paths.
    pub fn station_batch(interfaces: &[String], hostapd: bool) -> Vec<RpcCall> {
        interfaces
            .iter()
            .map(|iface| {
                if hostapd {
                    RpcCall::call(iface.clone(), "get_clients", None)
                } else {
                    RpcCall::call("iwinfo", "assoclist", Some(json!({ "device": iface })))
                }
            })
            .collect()
    }

    /// Deauthenticate and temporarily ban a station.
    ///
    /// `call hostapd.<iface> del_client {"addr", "deauth": true, "reason",
    /// "ban_time"}` -- `ban_time` in milliseconds. There is no
    /// acknowledgement beyond RPC success; callers poll the station list
    /// afterwards to confirm the device left.
    pub async fn kick_device(
        &self,
        ap_interface: &str,
        mac: &str,
        ban_time_ms: u64,
        reason: u32,
    ) -> Result<Option<Value>, Error> {
        let subsystem = format!("hostapd.{ap_interface}");
        info!(mac, ap_interface, ban_time_ms, "kicking device");
        self.call(
            &subsystem,
            "del_client",
            Some(json!({
                "addr": mac,
                "deauth": true,
                "reason": reason,
                "ban_time": ban_time_ms,
            })),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn station_batch_iwinfo_shape() {
        let calls =
            UbusClient::station_batch(&["wlan0".into(), "wlan1".into()], false);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].subsystem, "iwinfo");
        assert_eq!(calls[0].method.as_deref(), Some("assoclist"));
        assert_eq!(calls[1].args, Some(json!({"device": "wlan1"})));
    }

    #[test]
    fn station_batch_hostapd_shape() {
        let calls = UbusClient::station_batch(&["hostapd.wlan0".into()], true);
        assert_eq!(calls[0].subsystem, "hostapd.wlan0");
        assert_eq!(calls[0].method.as_deref(), Some("get_clients"));
        assert!(calls[0].args.is_none());
    }
}
