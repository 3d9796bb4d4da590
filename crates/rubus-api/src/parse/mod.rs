// Pure response parsers: raw subsystem payloads in, normalized records out.
//
// Everything here is stateless and total: absent payloads parse to empty
// results, malformed entries are skipped, never propagated as failures.

pub mod leases;
pub mod mac;
pub mod numeric;
pub mod station;

pub use leases::{DhcpLease, parse_ipv4_leases};
pub use mac::{mac_from_hex, normalize_mac};
pub use numeric::scrub_number;
pub use station::{StationRecord, WirelessBackend};
