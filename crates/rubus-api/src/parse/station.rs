// Station and AP-device parsing for the two wireless backends.
//
// The original integration modeled iwinfo/hostapd as client subclasses;
// here the per-vendor parsing strategy is a capability enum selected by
// configuration, and the RPC client stays backend-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::parse::mac::normalize_mac;

/// Which wireless management software the router runs. Decides both the
/// RPC shapes used for discovery and how their payloads parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WirelessBackend {
    #[default]
    Iwinfo,
    Hostapd,
}

/// A connected wireless client, normalized across backends.
///
/// The two subsystems expose different field sets; this is the superset
/// record with absent fields left unset. `extra` keeps whatever fields
/// the normalization did not consume, firmware being inventive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationRecord {
    /// Canonical uppercase colon-separated MAC.
    pub mac: String,
    /// Owning AP interface (radio device name or hostapd subsystem path).
    #[serde(default)]
    pub ap_device: Option<String>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub authorized: Option<bool>,
    #[serde(default)]
    pub associated: Option<bool>,
    #[serde(default)]
    pub signal_dbm: Option<i64>,
    #[serde(default)]
    pub noise_dbm: Option<i64>,
    #[serde(default)]
    pub connected_time_s: Option<u64>,
    /// Rates in kbit/s as iwinfo reports them.
    #[serde(default)]
    pub rx_rate_kbps: Option<u64>,
    #[serde(default)]
    pub tx_rate_kbps: Option<u64>,
    #[serde(default)]
    pub rx_bytes: Option<u64>,
    #[serde(default)]
    pub tx_bytes: Option<u64>,
    #[serde(default)]
    pub rx_packets: Option<u64>,
    #[serde(default)]
    pub tx_packets: Option<u64>,
    /// Unconsumed backend-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WirelessBackend {
    /// Parse an AP-device discovery payload into interface identifiers.
    ///
    /// iwinfo: `{"devices": ["wlan0", ...]}` from `iwinfo devices`.
    /// hostapd: the `list hostapd.*` result object, whose KEYS are the
    /// per-interface subsystem paths. Absent payload parses to empty.
    pub fn parse_ap_devices(self, payload: Option<&Value>) -> Vec<String> {
        let Some(payload) = payload else {
            return Vec::new();
        };
        match self {
            Self::Iwinfo => payload
                .get("devices")
                .and_then(Value::as_array)
                .map(|devices| {
                    devices
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            Self::Hostapd => match payload {
                Value::Object(map) => map.keys().cloned().collect(),
                // Some firmwares list as a bare array of paths.
                Value::Array(arr) => arr
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
                _ => Vec::new(),
            },
        }
    }

    /// Parse a station payload for one AP interface.
    ///
    /// iwinfo: `{"results": [...]}` (or, on older firmware, a bare list).
    /// hostapd: `{"clients": {"<mac>": {...}}}`; only authorized clients
    /// are reported, matching what the tracker should see. Entries
    /// without a usable MAC are skipped, never fatal.
    pub fn parse_stations(self, ap_device: &str, payload: Option<&Value>) -> Vec<StationRecord> {
        let Some(payload) = payload else {
            return Vec::new();
        };
        match self {
            Self::Iwinfo => {
                let entries = payload
                    .get("results")
                    .and_then(Value::as_array)
                    .or_else(|| payload.as_array());
                entries
                    .map(|entries| {
                        entries
                            .iter()
                            .filter_map(|entry| parse_iwinfo_entry(ap_device, entry))
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Self::Hostapd => payload
                .get("clients")
                .and_then(Value::as_object)
                .map(|clients| {
                    clients
                        .iter()
                        .filter(|(_, entry)| {
                            entry.get("authorized").and_then(Value::as_bool) == Some(true)
                        })
                        .map(|(mac, entry)| parse_hostapd_entry(ap_device, mac, entry))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn parse_iwinfo_entry(ap_device: &str, entry: &Value) -> Option<StationRecord> {
    let mac = entry.get("mac").and_then(Value::as_str)?;
    let consumed = [
        "mac",
        "signal",
        "noise",
        "connected_time",
        "authorized",
        "authenticated",
        "rx",
        "tx",
    ];

    Some(StationRecord {
        mac: normalize_mac(mac),
        ap_device: Some(ap_device.to_owned()),
        authorized: entry.get("authorized").and_then(Value::as_bool),
        associated: entry.get("authenticated").and_then(Value::as_bool),
        signal_dbm: entry.get("signal").and_then(Value::as_i64),
        noise_dbm: entry.get("noise").and_then(Value::as_i64),
        connected_time_s: entry.get("connected_time").and_then(Value::as_u64),
        rx_rate_kbps: nested_u64(entry, "rx", "rate"),
        tx_rate_kbps: nested_u64(entry, "tx", "rate"),
        rx_packets: nested_u64(entry, "rx", "packets"),
        tx_packets: nested_u64(entry, "tx", "packets"),
        extra: leftover(entry, &consumed),
        ..StationRecord::default()
    })
}

fn parse_hostapd_entry(ap_device: &str, mac: &str, entry: &Value) -> StationRecord {
    let consumed = [
        "authorized",
        "assoc",
        "signal",
        "rx_bytes",
        "tx_bytes",
        "rx_packets",
        "tx_packets",
        "connected_time",
    ];

    StationRecord {
        mac: normalize_mac(mac),
        ap_device: Some(ap_device.to_owned()),
        authorized: entry.get("authorized").and_then(Value::as_bool),
        associated: entry.get("assoc").and_then(Value::as_bool),
        signal_dbm: entry.get("signal").and_then(Value::as_i64),
        connected_time_s: entry.get("connected_time").and_then(Value::as_u64),
        rx_bytes: entry.get("rx_bytes").and_then(Value::as_u64),
        tx_bytes: entry.get("tx_bytes").and_then(Value::as_u64),
        rx_packets: entry.get("rx_packets").and_then(Value::as_u64),
        tx_packets: entry.get("tx_packets").and_then(Value::as_u64),
        extra: leftover(entry, &consumed),
        ..StationRecord::default()
    }
}

fn nested_u64(entry: &Value, outer: &str, inner: &str) -> Option<u64> {
    entry.get(outer)?.get(inner)?.as_u64()
}

fn leftover(entry: &Value, consumed: &[&str]) -> Map<String, Value> {
    entry
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, _)| !consumed.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}
