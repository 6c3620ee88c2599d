/// Parses a submitted or authored value into a finite number.
///
/// Surrounding whitespace is ignored. Anything that is not a finite decimal
/// number (including `inf` and `NaN`) is treated as "no number".
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Rounds `value` to `places` decimal digits, half away from zero.
///
/// Values too large to scale are returned unchanged; they carry no digits at
/// that precision anyway.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Formats a number the way it is shown inside feedback text: shortest
/// round-trip digits, with a trailing `.0` for integral values. Magnitudes
/// below `1e-4` or from `1e16` up switch to exponent form (`1e-05`, `1e+16`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Shortest round-trip mantissa with a signed, two digit exponent.
fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// `%g`-style formatting: six significant digits, trailing zeros dropped.
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if !(-4..6).contains(&exponent) {
        let formatted = format!("{:.5e}", value);
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs());
    }

    let decimals = (5 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value))
}

fn trim_fraction(formatted: &str) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted.to_string()
    }
}
