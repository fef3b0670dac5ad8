//! Escaping helpers for turning token values back into CSS source, and the
//! number formatting used by token dumps.

use core::fmt::Write;

fn hex_escape(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

/// Escape `value` so that it tokenizes back to a single `<ident-token>`.
#[must_use]
pub fn escape_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();
    for (i, c) in value.chars().enumerate() {
        let code = u32::from(c);
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && first == Some('-')));
        if (0x1..=0x1f).contains(&code) || code == 0x7f || leading_digit {
            hex_escape(&mut out, c);
        } else if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Escape the value of an "unrestricted" hash token. The result is not
/// necessarily a valid identifier.
#[must_use]
pub fn escape_hash(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if u32::from(c) >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            hex_escape(&mut out, c);
        }
    }
    out
}

/// Escape `value` for use between double quotes.
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        let code = u32::from(c);
        if (0x1..=0x1f).contains(&code) || code == 0x7f {
            hex_escape(&mut out, c);
        } else if c == '"' || c == '\\' {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Format a numeric token value the way JavaScript's `Number#toString`
/// would: integral values print without a fraction, and very large or
/// very small magnitudes switch to exponent notation.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{value}")
    } else {
        let exp = format!("{value:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    }
}
