// src/core/attrs/entlim.rs

//! Entity-limit values: the `[u:name=limit, g:name=limit, …]` grammar used
//! by the `max_queued`/`max_run` family of attributes. The limit string may
//! contain whitespace; the lexer admits it, and this parser canonicalizes.

use crate::core::errors::{BatchError, ErrCode};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};

/// The entity class a limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum LimitClass {
    #[strum(serialize = "u")]
    User,
    #[strum(serialize = "g")]
    Group,
    #[strum(serialize = "p")]
    Project,
    #[strum(serialize = "o")]
    Overall,
}

/// One parsed `class:name=limit` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntLimit {
    pub class: LimitClass,
    pub name: String,
    pub limit: String,
}

impl EntLimit {
    fn canonical(&self) -> String {
        format!("{}:{}={}", self.class, self.name, self.limit)
    }
}

fn bad(value: &str, reason: &str) -> BatchError {
    BatchError::BadAttributeValue {
        attr: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses an entity-limit attribute value.
///
/// Accepts `[u:alice = 3, g:staff = 5]`; whitespace around tokens is
/// tolerated and stripped. Duplicate `(class, name)` pairs within one value
/// are rejected with [`ErrCode::DupList`]. When `limit_is_count` is set the
/// limit must parse as a non-negative integer (the `*_res` variants defer
/// limit checking to the named resource's datatype).
pub fn parse_entlim(value: &str, limit_is_count: bool) -> Result<Vec<EntLimit>, BatchError> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| bad(value, "entity limit must be enclosed in [ ]"))?;

    let mut out = Vec::new();
    let mut seen: HashSet<(LimitClass, String)> = HashSet::new();

    for raw in inner.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            return Err(bad(value, "empty entity-limit entry"));
        }
        let (class_str, rest) = entry
            .split_once(':')
            .ok_or_else(|| bad(entry, "missing ':' in entity-limit entry"))?;
        let class: LimitClass = class_str
            .trim()
            .parse()
            .map_err(|_| bad(entry, "entity class must be one of u, g, p, o"))?;
        let (name, limit) = rest
            .split_once('=')
            .ok_or_else(|| bad(entry, "missing '=' in entity-limit entry"))?;
        let name = name.trim();
        let limit = limit.trim();
        if name.is_empty() {
            return Err(bad(entry, "empty entity name"));
        }
        if limit.is_empty() {
            return Err(bad(entry, "empty limit"));
        }
        if limit_is_count && limit.parse::<i64>().map_or(true, |n| n < 0) {
            return Err(bad(entry, "limit must be a non-negative integer"));
        }
        if !seen.insert((class, name.to_string())) {
            return Err(BatchError::Rejected {
                code: ErrCode::DupList,
                text: Some(format!("duplicate entity-limit entry {class}:{name}")),
            });
        }
        out.push(EntLimit {
            class,
            name: name.to_string(),
            limit: limit.to_string(),
        });
    }

    if out.is_empty() {
        return Err(bad(value, "entity limit carries no entries"));
    }
    Ok(out)
}

/// Renders entries back into the canonical `[u:a=1, g:b=2]` form used by
/// `list` output.
pub fn canonical_entlim(entries: &[EntLimit]) -> String {
    let body: Vec<String> = entries.iter().map(EntLimit::canonical).collect();
    format!("[{}]", body.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_tolerant_entries() {
        let parsed = parse_entlim("[u:alice = 3, g:staff = 5]", true).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].class, LimitClass::User);
        assert_eq!(parsed[0].name, "alice");
        assert_eq!(parsed[0].limit, "3");
        assert_eq!(canonical_entlim(&parsed), "[u:alice=3, g:staff=5]");
    }

    #[test]
    fn rejects_duplicate_class_name() {
        let err = parse_entlim("[u:alice=3, u:alice=5]", true).unwrap_err();
        assert_eq!(err.code(), ErrCode::DupList);
    }

    #[test]
    fn rejects_unknown_class_and_bad_limit() {
        assert!(parse_entlim("[x:alice=3]", true).is_err());
        assert!(parse_entlim("[u:alice=-1]", true).is_err());
        assert!(parse_entlim("u:alice=3", true).is_err());
    }
}
