// `modem_ctrl` subsystem (QModem firmware): availability probe and info.
//
// Not every router exposes this; callers probe with `list_modem_ctrl`
// first and treat absence as "no modem", never as a fault.

use serde_json::Value;

use crate::client::UbusClient;
use crate::error::Error;

impl UbusClient {
    /// Probe whether the `modem_ctrl` subsystem exists. A `None`/empty
    /// result means no QModem firmware on this router.
    ///
    /// `list modem_ctrl`
    pub async fn list_modem_ctrl(&self) -> Result<Option<Value>, Error> {
        self.list("modem_ctrl").await
    }

    /// Modem status: carrier, signal, temperature, voltage. Field values
    /// are vendor strings ("45C", "3.85 V"); see `parse::numeric` for the
    /// scrubber.
    ///
    /// `call modem_ctrl info`
    pub async fn modem_info(&self) -> Result<Option<Value>, Error> {
        self.call("modem_ctrl", "info", None).await
    }
}
