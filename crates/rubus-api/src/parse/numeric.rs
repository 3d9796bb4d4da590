// Best-effort numeric extraction from vendor status strings.
//
// QModem firmware reports readings as decorated strings ("45C",
// "3.85 V", "temp: 38.0"). Accepted grammar after scrubbing: optional
// leading minus sign, ASCII digits, at most one decimal point. Locale
// comma separators are NOT accepted -- observed firmware emits C-locale
// strings only. Anything that does not reduce to that grammar yields
// `None`.

/// Strip non-numeric decoration and parse the remainder as `f64`.
pub fn scrub_number(raw: &str) -> Option<f64> {
    let mut out = String::with_capacity(raw.len());
    let mut seen_dot = false;
    let mut seen_digit = false;

    for ch in raw.chars() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                out.push(ch);
            }
            '.' if !seen_dot => {
                seen_dot = true;
                out.push(ch);
            }
            // A second dot means the string is not a single number.
            '.' => return None,
            '-' if out.is_empty() => out.push(ch),
            _ => {}
        }
    }

    if !seen_digit {
        return None;
    }
    out.parse().ok()
}
