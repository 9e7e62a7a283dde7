//! Display formatting shared by every front end.

/// Placeholder shown when a value cannot be computed.
pub const NOT_AVAILABLE: &str = "—";

/// USD amount with two decimals: `5000` → `"$5000.00"`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

/// Token quantity with four decimals.
pub fn format_balance(quantity: f64) -> String {
    if quantity.is_finite() {
        format!("{quantity:.4}")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Allocation percentage with two decimals, or `—` when undefined.
pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) if p.is_finite() => format!("{p:.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Abbreviated address for headers: `0x742d...f44e`. Strings too short to
/// abbreviate are returned unchanged.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Large counters with thousands separators: `1234567` → `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
