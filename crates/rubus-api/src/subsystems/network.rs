// Network state subsystems: wireless status, device counters, DHCP leases.

use serde_json::Value;

use crate::client::UbusClient;
use crate::error::Error;

impl UbusClient {
    /// Radio/interface configuration state as netifd sees it.
    ///
    /// `call network.wireless status`
    pub async fn wireless_status(&self) -> Result<Option<Value>, Error> {
        self.call("network.wireless", "status", None).await
    }

    /// Per-device link state and traffic counters, keyed by device name.
    ///
    /// `call network.device status`
    pub async fn device_status(&self) -> Result<Option<Value>, Error> {
        self.call("network.device", "status", None).await
    }

    /// Active odhcpd IPv4 leases, grouped per device.
    ///
    /// `call dhcp ipv4leases`
    pub async fn dhcp_ipv4_leases(&self) -> Result<Option<Value>, Error> {
        self.call("dhcp", "ipv4leases", None).await
    }
}
