//! Form field coercions.
//!
//! Submitted fields arrive as text. Numbers are read the way browsers read a
//! leading numeric prefix (`"12 seats"` is 12, `"abc"` is nothing), and
//! optional text fields treat the empty string as absent.

/// Default accepted detour when the form leaves it empty or zero.
pub const DEFAULT_ROUTE_RADIUS_KM: f64 = 5.0;

/// Parse the leading integer of a field.
#[must_use]
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    let s = value?.trim_start();
    let digits_start = usize::from(s.starts_with(['+', '-']));
    let digits_end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);

    if digits_end == digits_start {
        return None;
    }
    s[..digits_end].parse().ok()
}

/// Parse the leading decimal number of a field.
#[must_use]
pub fn parse_float(value: Option<&str>) -> Option<f64> {
    let s = value?.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only if at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].trim_end_matches('.').parse().ok()
}

/// An optional text field; empty means absent.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// The accepted detour, falling back to the default when unparsable or zero.
#[must_use]
pub fn route_radius(value: Option<&str>) -> f64 {
    parse_float(value)
        .filter(|r| *r != 0.0 && !r.is_nan())
        .unwrap_or(DEFAULT_ROUTE_RADIUS_KM)
}
