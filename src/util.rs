const UNITS: [&str; 4] = ["bytes", "kB", "MB", "GB"];

/// Renders a byte count with decimal unit steps of 1000 and two decimal
/// digits. Values that reach the GB unit are not divided further, so very
/// large trees render as e.g. "1234.56 GB" rather than inventing a unit.
pub fn format_size(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;

    while value >= 1000.0 && unit + 1 < UNITS.len() {
        value /= 1000.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

/// Signed variant for deltas: negative values render as a minus sign in
/// front of the formatted magnitude.
pub fn format_signed_size(size: i64) -> String {
    if size < 0 {
        format!("-{}", format_size(size.unsigned_abs()))
    } else {
        format_size(size as u64)
    }
}
