// MAC address canonicalization.
//
// Everything downstream keys stations by MAC; the two wireless backends
// and the DHCP subsystems disagree on casing and separators, so all of
// them are funneled through these two functions.

/// Uppercase a colon-separated MAC: `aa:bb:cc:dd:ee:ff` →
/// `AA:BB:CC:DD:EE:FF`. The input separator style is preserved as-is;
/// only case is normalized.
pub fn normalize_mac(mac: &str) -> String {
    mac.to_ascii_uppercase()
}

/// Convert the separator-less 12-hex-digit form odhcpd emits
/// (`aabbccddeeff`) into canonical `AA:BB:CC:DD:EE:FF`.
///
/// Returns `None` for anything that is not exactly 12 hex digits.
pub fn mac_from_hex(raw: &str) -> Option<String> {
    if raw.len() != 12 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let upper = raw.to_ascii_uppercase();
    let pairs: Vec<&str> = (0..12).step_by(2).filter_map(|i| upper.get(i..i + 2)).collect();
    Some(pairs.join(":"))
}
