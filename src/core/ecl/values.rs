// src/core/ecl/values.rs

//! Context-dependent value verifiers. Unlike the datatype layer these may
//! consult the catalogs (the resource verifier re-applies the named
//! resource's own datatype check) and see the request context.

use crate::core::attrs::entlim::parse_entlim;
use crate::core::attrs::{AttrOp, ValueVerifier, catalog};
use crate::core::ecl::datatypes;

pub(crate) fn verify(kind: ValueVerifier, node: &AttrOp) -> Result<(), String> {
    match kind {
        ValueVerifier::Resc => verify_resc(node),
        ValueVerifier::Hold => verify_hold(&node.value),
        ValueVerifier::JoinPath => verify_join_path(&node.value),
        ValueVerifier::KeepFiles => verify_file_disposition(&node.value, b"oed"),
        ValueVerifier::RemoveFiles => verify_file_disposition(&node.value, b"oe"),
        ValueVerifier::MailPoints => verify_file_disposition(&node.value, b"abej"),
        ValueVerifier::Jrange => verify_jrange(&node.value),
        ValueVerifier::PreemptOrder => verify_preempt_order(&node.value),
        ValueVerifier::QueueType => verify_queue_type(&node.value),
        ValueVerifier::MgrOprAcl => verify_mgr_opr_acl(&node.value),
        ValueVerifier::ZeroOrPositive => verify_min(&node.value, 0),
        ValueVerifier::NonZeroPositive => verify_min(&node.value, 1),
        ValueVerifier::Priority => verify_priority(&node.value),
        ValueVerifier::EntLimit => verify_entlim(node),
        ValueVerifier::State => verify_node_state(&node.value),
    }
}

/// Resource-list entries: the sub-name must be present, and when the
/// resource is in the built-in catalog its own datatype verifier applies.
/// Unknown names pass; custom resources are known only to the server.
fn verify_resc(node: &AttrOp) -> Result<(), String> {
    let Some(resc) = node.resource.as_deref() else {
        return Err(format!("attribute '{}' requires a resource name", node.name));
    };
    match catalog::find_resc(resc) {
        Some(def) => match def.datatype {
            Some(dt) => datatypes::verify(dt, &node.value)
                .map_err(|reason| format!("resource '{resc}': {reason}")),
            None => Ok(()),
        },
        None => Ok(()),
    }
}

/// Hold types: `n` alone, or any concatenation of `u`, `o`, `s`, `p`.
fn verify_hold(value: &str) -> Result<(), String> {
    if value == "n" {
        return Ok(());
    }
    if value.is_empty() || !value.bytes().all(|b| matches!(b, b'u' | b'o' | b's' | b'p')) {
        return Err(format!("'{value}' is not a valid hold type"));
    }
    Ok(())
}

fn verify_join_path(value: &str) -> Result<(), String> {
    match value {
        "oe" | "eo" | "o" | "e" | "n" => Ok(()),
        _ => Err(format!("'{value}' is not a valid join path")),
    }
}

/// Shared shape for keep-files / remove-files / mail-points: `n` alone or a
/// duplicate-free combination drawn from `allowed`.
fn verify_file_disposition(value: &str, allowed: &[u8]) -> Result<(), String> {
    if value == "n" {
        return Ok(());
    }
    if value.is_empty() {
        return Err("empty value".to_string());
    }
    let mut seen = [false; 256];
    for b in value.bytes() {
        if !allowed.contains(&b) || seen[b as usize] {
            return Err(format!("'{value}' is not a valid combination"));
        }
        seen[b as usize] = true;
    }
    Ok(())
}

/// Subjob index range: `start-end[:step]` with `start >= 0`, `end > start`,
/// both below the long ceiling, `step >= 1`.
pub fn verify_jrange(value: &str) -> Result<(), String> {
    let (range, step) = match value.split_once(':') {
        Some((r, s)) => (r, Some(s)),
        None => (value, None),
    };
    let (start_s, end_s) = range
        .split_once('-')
        .ok_or_else(|| format!("'{value}' is not a range"))?;
    let start: i64 = parse_range_number(start_s, value)?;
    let end: i64 = parse_range_number(end_s, value)?;
    if start < 0 || start >= end {
        return Err(format!("'{value}' is not an increasing range"));
    }
    if let Some(step_s) = step {
        let step: i64 = parse_range_number(step_s, value)?;
        if step < 1 {
            return Err(format!("step in '{value}' must be at least 1"));
        }
    }
    Ok(())
}

fn parse_range_number(s: &str, whole: &str) -> Result<i64, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{whole}' is not a range"));
    }
    match s.parse::<i64>() {
        Ok(n) if n < i64::MAX => Ok(n),
        _ => Err(format!("number in '{whole}' is too large")),
    }
}

/// Preemption order: letter groups drawn from `SCRD` (each letter at most
/// once per group) alternating with percentage thresholds, starting and
/// ending on a letter group. Thresholds must descend strictly within
/// `(0, 100)`. The scheduler parses the same grammar when the attribute is
/// applied.
pub fn verify_preempt_order(value: &str) -> Result<(), String> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.is_empty() {
        return Err("empty preempt_order".to_string());
    }
    let mut expect_number = false;
    let mut last_threshold = 100i64;
    for tok in &tokens {
        if expect_number {
            let n: i64 = tok
                .parse()
                .map_err(|_| format!("'{tok}' is not a percentage"))?;
            if n <= 0 || n >= 100 || n >= last_threshold {
                return Err(format!("threshold '{tok}' out of order"));
            }
            last_threshold = n;
            expect_number = false;
        } else {
            if tok.bytes().any(|b| b.is_ascii_digit()) {
                return Err(format!("expected preemption methods, got '{tok}'"));
            }
            let mut seen = [false; 4];
            for b in tok.bytes() {
                let slot = match b {
                    b'S' => 0,
                    b'C' => 1,
                    b'R' => 2,
                    b'D' => 3,
                    _ => return Err(format!("'{}' is not a preemption method", b as char)),
                };
                if seen[slot] {
                    return Err(format!("repeated preemption method in '{tok}'"));
                }
                seen[slot] = true;
            }
            if tok.is_empty() {
                return Err("empty method group".to_string());
            }
            expect_number = true;
        }
    }
    if !expect_number {
        // Ended on a bare threshold with no trailing method group.
        return Err("preempt_order must end with a method group".to_string());
    }
    Ok(())
}

/// Queue types: any prefix of `execution` or `route`, case-insensitive.
fn verify_queue_type(value: &str) -> Result<(), String> {
    let v = value.to_ascii_lowercase();
    if !v.is_empty() && ("execution".starts_with(&v) || "route".starts_with(&v)) {
        Ok(())
    } else {
        Err(format!("'{value}' is not a queue type"))
    }
}

/// Manager/operator ACLs: comma-separated `user@host` entries, both parts
/// non-empty.
fn verify_mgr_opr_acl(value: &str) -> Result<(), String> {
    for entry in value.split(',') {
        let entry = entry.trim();
        match entry.split_once('@') {
            Some((user, host)) if !user.is_empty() && !host.is_empty() => {}
            _ => return Err(format!("'{entry}' must be of the form user@host")),
        }
    }
    Ok(())
}

fn verify_min(value: &str, min: i64) -> Result<(), String> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= min => Ok(()),
        Ok(_) => Err(format!("'{value}' must be at least {min}")),
        Err(_) => Err(format!("'{value}' is not an integer")),
    }
}

/// The priority range shared by queues, nodes, and jobs.
fn verify_priority(value: &str) -> Result<(), String> {
    match value.trim().parse::<i64>() {
        Ok(n) if (-1024..=1023).contains(&n) => Ok(()),
        _ => Err(format!("priority '{value}' out of range [-1024, 1023]")),
    }
}

/// Entity-limit values re-parse here; `*_res` attributes defer the limit
/// datatype to the named resource, the rest require a count.
fn verify_entlim(node: &AttrOp) -> Result<(), String> {
    let counts = !node.name.to_ascii_lowercase().ends_with("_res")
        && !node
            .name
            .to_ascii_lowercase()
            .ends_with("_res_soft");
    parse_entlim(&node.value, counts)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Node states an administrator may assign.
fn verify_node_state(value: &str) -> Result<(), String> {
    for state in value.split(',') {
        match state.trim() {
            "free" | "offline" | "down" => {}
            other => return Err(format!("'{other}' is not a settable node state")),
        }
    }
    Ok(())
}

/// Object names for `create`: leading alphanumeric, printable ASCII body
/// with no whitespace, separators, or quoting characters.
pub fn verify_object_name(name: &str) -> Result<(), String> {
    let mut bytes = name.bytes();
    match bytes.next() {
        None => return Err("empty object name".to_string()),
        Some(b) if !b.is_ascii_alphanumeric() => {
            return Err(format!("object name '{name}' must start alphanumeric"));
        }
        Some(_) => {}
    }
    for b in name.bytes() {
        if !b.is_ascii_graphic() || matches!(b, b'@' | b',' | b'"' | b'\'' | b'&') {
            return Err(format!("illegal character in object name '{name}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jrange_cases() {
        assert!(verify_jrange("0-10:3").is_ok());
        assert!(verify_jrange("0-10").is_ok());
        assert!(verify_jrange("10-0").is_err());
        assert!(verify_jrange(&format!("0-{}", i64::MAX)).is_err());
        assert!(verify_jrange("0-10:0").is_err());
        assert!(verify_jrange("5").is_err());
    }

    #[test]
    fn preempt_order_grammar() {
        assert!(verify_preempt_order("SCR").is_ok());
        assert!(verify_preempt_order("SCR 80 SC 50 S").is_ok());
        assert!(verify_preempt_order("SS").is_err());
        assert!(verify_preempt_order("SCR 80").is_err());
        assert!(verify_preempt_order("SCR 80 SC 90 S").is_err());
        assert!(verify_preempt_order("X").is_err());
    }

    #[test]
    fn hold_and_joinpath() {
        assert!(verify_hold("uo").is_ok());
        assert!(verify_hold("n").is_ok());
        assert!(verify_hold("x").is_err());
        assert!(verify_join_path("eo").is_ok());
        assert!(verify_join_path("oo").is_err());
    }

    #[test]
    fn object_names() {
        assert!(verify_object_name("workq").is_ok());
        assert!(verify_object_name("node01").is_ok());
        assert!(verify_object_name("bad name").is_err());
        assert!(verify_object_name("q@svr").is_err());
        assert!(verify_object_name("").is_err());
    }
}
