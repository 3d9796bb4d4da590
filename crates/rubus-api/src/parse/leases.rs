// odhcpd IPv4 lease parsing.
//
// Payload of `dhcp ipv4leases`: `{"device": {"<ifname>": {"leases":
// [...]}}}` with separator-less hex MACs. dnsmasq lease files are a
// different mechanism and are out of scope here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parse::mac::{mac_from_hex, normalize_mac};

/// One active DHCP lease, MAC canonicalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhcpLease {
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    /// Interface the lease was handed out on.
    #[serde(default)]
    pub device: Option<String>,
}

/// Parse the `dhcp ipv4leases` payload. Absent payload or unexpected
/// shapes parse to empty; entries without a usable MAC are skipped.
pub fn parse_ipv4_leases(payload: Option<&Value>) -> Vec<DhcpLease> {
    let Some(devices) = payload.and_then(|p| p.get("device")).and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (device, entry) in devices {
        let Some(leases) = entry.get("leases").and_then(Value::as_array) else {
            continue;
        };
        for lease in leases {
            let Some(raw_mac) = lease.get("mac").and_then(Value::as_str) else {
                continue;
            };
            // odhcpd emits aabbccddeeff; tolerate pre-separated MACs too.
            let Some(mac) = mac_from_hex(raw_mac).or_else(|| {
                raw_mac.contains(':').then(|| normalize_mac(raw_mac))
            }) else {
                continue;
            };

            out.push(DhcpLease {
                mac,
                hostname: lease
                    .get("hostname")
                    .and_then(Value::as_str)
                    .filter(|h| !h.is_empty())
                    .map(str::to_owned),
                ip: lease
                    .get("ip")
                    .or_else(|| lease.get("address"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                device: Some(device.clone()),
            });
        }
    }
    out
}
