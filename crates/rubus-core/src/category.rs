// Data category registry.
//
// A fixed, known set of categories replaces the original's dynamically
// loaded sensor modules: each category is independently enableable by
// simply not requesting it, and the fetch routine is resolved statically
// in `fetch.rs`.

use std::time::Duration;

use strum::{Display, EnumIter, EnumString};

/// A named router data category served by [`crate::DataCache`].
///
/// String form is snake_case (`system_info`, `device_statistics`, ...),
/// matching the keys consumers see in combined payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DataCategory {
    /// Uptime, load, memory (`system info`).
    SystemInfo,
    /// Hostname, model, firmware release (`system board`).
    SystemBoard,
    /// QModem status via `modem_ctrl`; null on routers without it.
    QmodemInfo,
    /// Per-station wireless statistics merged with DHCP identity.
    DeviceStatistics,
    /// Active odhcpd IPv4 leases.
    DhcpLeases,
    /// Per-interface link state and counters (`network.device status`).
    NetworkDevices,
    /// `nf_conntrack_count`, read via the file subsystem.
    ConntrackCount,
}

impl DataCategory {
    /// Default freshness interval (time-to-live) per category.
    ///
    /// Mirrors the cadence each category's consumers actually need:
    /// station data moves fast, board identification barely ever.
    pub fn default_interval(self) -> Duration {
        match self {
            Self::SystemInfo | Self::ConntrackCount => Duration::from_secs(120),
            Self::SystemBoard => Duration::from_secs(300),
            Self::QmodemInfo => Duration::from_secs(60),
            Self::DeviceStatistics | Self::DhcpLeases | Self::NetworkDevices => {
                Duration::from_secs(30)
            }
        }
    }
}
