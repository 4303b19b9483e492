// src/core/ecl/datatypes.rs

//! Pure syntactic datatype verifiers. Each checks a string form only and
//! reports a reason on rejection; context-dependent checks live in the
//! value-verifier module.

use crate::core::attrs::DatatypeVerifier;

pub(crate) fn verify(kind: DatatypeVerifier, value: &str) -> Result<(), String> {
    match kind {
        DatatypeVerifier::Bool => verify_bool(value),
        DatatypeVerifier::Short => verify_integer(value, i16::MIN as i64, i16::MAX as i64),
        DatatypeVerifier::Long => verify_integer(value, i64::MIN, i64::MAX),
        DatatypeVerifier::LongLong => verify_integer(value, i64::MIN, i64::MAX),
        DatatypeVerifier::Float => verify_float(value),
        DatatypeVerifier::Size => verify_size(value),
        DatatypeVerifier::Time => verify_time(value),
        DatatypeVerifier::Char => verify_char(value),
    }
}

fn verify_bool(value: &str) -> Result<(), String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "false" | "t" | "f" | "y" | "n" | "1" | "0" => Ok(()),
        _ => Err(format!("'{value}' is not a boolean")),
    }
}

fn verify_integer(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v = value.trim();
    if v.is_empty() {
        return Err("empty integer value".to_string());
    }
    match v.parse::<i64>() {
        Ok(n) if n >= min && n <= max => Ok(()),
        Ok(_) => Err(format!("'{value}' is out of range")),
        Err(_) => Err(format!("'{value}' is not an integer")),
    }
}

fn verify_float(value: &str) -> Result<(), String> {
    let v = value.trim();
    if v.is_empty()
        || !v
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return Err(format!("'{value}' is not a number"));
    }
    v.parse::<f64>()
        .map(|_| ())
        .map_err(|_| format!("'{value}' is not a number"))
}

/// `integer[multiplier][b|w]` with multiplier in `k m g t p`, all
/// case-insensitive; a bare integer means bytes.
fn verify_size(value: &str) -> Result<(), String> {
    let v = value.trim();
    let digits_end = v.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_end == 0 {
        return Err(format!("'{value}' is not a size"));
    }
    if v[..digits_end].parse::<u64>().is_err() {
        return Err(format!("size '{value}' overflows"));
    }
    let mut suffix = v[digits_end..].bytes().map(|b| b.to_ascii_lowercase());
    match (suffix.next(), suffix.next(), suffix.next()) {
        (None, _, _) => Ok(()),
        (Some(b'b' | b'w'), None, _) => Ok(()),
        (Some(b'k' | b'm' | b'g' | b't' | b'p'), None, _) => Ok(()),
        (Some(b'k' | b'm' | b'g' | b't' | b'p'), Some(b'b' | b'w'), None) => Ok(()),
        _ => Err(format!("'{value}' is not a size")),
    }
}

/// `[[HH:]MM:]SS[.ms]` or bare seconds. Minutes and seconds must stay
/// below 60 when more than one component is present.
fn verify_time(value: &str) -> Result<(), String> {
    let v = value.trim();
    if v.is_empty() {
        return Err("empty time value".to_string());
    }
    let (main, frac) = match v.split_once('.') {
        Some((m, f)) => (m, Some(f)),
        None => (v, None),
    };
    if let Some(f) = frac {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{value}' is not a time"));
        }
    }
    let parts: Vec<&str> = main.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("'{value}' is not a time"));
    }
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{value}' is not a time"));
        }
        let n: u64 = part
            .parse()
            .map_err(|_| format!("time '{value}' overflows"))?;
        // Trailing components are minutes/seconds and must carry.
        if parts.len() > 1 && i > 0 && n >= 60 {
            return Err(format!("'{value}' is not a time"));
        }
    }
    Ok(())
}

fn verify_char(value: &str) -> Result<(), String> {
    if value.chars().count() == 1 {
        Ok(())
    } else {
        Err(format!("'{value}' is not a single character"))
    }
}
