//! Identifier sanitization for documents received from remote stores.
//!
//! Remote stores may hand back storage-native identifiers in their extended
//! JSON encoding (`{"$oid": "65f0..."}`, `{"$uuid": "..."}`) instead of plain
//! strings, at any depth of a document. [`sanitize`] replaces every such
//! object with its canonical string form; [`find_residual_ids`] reports where
//! any are left, for monitoring only.
//!
//! Both walks are iterative (explicit stack), so document depth is bounded by
//! memory rather than by the call stack.

use serde_json::Value;

/// Extended-JSON keys that wrap an opaque storage-native identifier.
pub const OPAQUE_ID_KEYS: &[&str] = &["$oid", "$uuid"];

/// Return the canonical string of `value` if it is an opaque identifier.
///
/// An opaque identifier is an object with exactly one key from
/// [`OPAQUE_ID_KEYS`] whose value is a string.
pub fn opaque_id(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    if OPAQUE_ID_KEYS.contains(&key.as_str()) {
        inner.as_str()
    } else {
        None
    }
}

/// Replace every opaque identifier in `root` with its canonical string.
///
/// Returns the number of identifiers replaced.
pub fn sanitize_in_place(root: &mut Value) -> usize {
    let mut replaced = 0;
    let mut stack: Vec<&mut Value> = vec![root];

    while let Some(node) = stack.pop() {
        let replacement = opaque_id(node).map(str::to_owned);
        if let Some(id) = replacement {
            *node = Value::String(id);
            replaced += 1;
            continue;
        }
        match node {
            Value::Object(map) => stack.extend(map.values_mut()),
            Value::Array(items) => stack.extend(items.iter_mut()),
            _ => {}
        }
    }

    replaced
}

/// Return a sanitized copy of `value`, leaving the input untouched.
pub fn sanitize(value: &Value) -> Value {
    let mut copy = value.clone();
    sanitize_in_place(&mut copy);
    copy
}

/// List the paths of opaque identifiers still present in `root`.
///
/// Paths use dotted keys and bracketed indices, e.g. `field.nested[2].id`.
/// An opaque identifier at the root is reported as `$`. Paths are returned
/// in document order.
pub fn find_residual_ids(root: &Value) -> Vec<String> {
    let mut found = Vec::new();
    let mut stack: Vec<(String, &Value)> = vec![(String::new(), root)];

    while let Some((path, node)) = stack.pop() {
        if opaque_id(node).is_some() {
            found.push(if path.is_empty() { "$".to_string() } else { path });
            continue;
        }
        match node {
            Value::Object(map) => {
                // Reverse so that popping visits children in document order.
                for (key, child) in map.iter().rev() {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    stack.push((child_path, child));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push((format!("{path}[{index}]"), child));
                }
            }
            _ => {}
        }
    }

    found
}

/// Canonical string form of an identifier value that is a plain string, an
/// integer, or an opaque identifier. Anything else yields `None`.
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        other => opaque_id(other).map(str::to_owned),
    }
}
