//! Deep merge of configuration trees in precedence order.

use crate::tree::ConfigMap;
use serde_json::Value;

/// Merge trees left to right; entries later in `trees` override earlier ones.
///
/// Zero trees yield an empty mapping and a single tree is returned as is.
/// Inputs are only borrowed, so callers may reuse them afterwards.
pub fn merge(trees: &[ConfigMap]) -> ConfigMap {
    match trees {
        [] => ConfigMap::new(),
        [single] => single.clone(),
        [first, second, rest @ ..] => rest
            .iter()
            .fold(merge_maps(first, second), |acc, next| merge_maps(&acc, next)),
    }
}

/// Merge two mappings into a new one, `overlay` taking precedence.
///
/// Keys held by both sides recurse only when both values are mappings, and
/// then only on that key's pair of sub-trees. Any other collision is won by
/// `overlay`.
pub fn merge_maps(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match base.get(key) {
            Some(existing) => merge_values(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Merge two arbitrary values, recursing when both are mappings.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay_value) => overlay_value.clone(),
    }
}
