//! Untyped configuration trees shared by loaders, the merge engine and schemas.

use serde_json::{Map, Value};

/// A mapping level of a configuration tree.
///
/// Every loader produces one of these; anything that is not a nested mapping
/// is treated as a leaf.
pub type ConfigMap = Map<String, Value>;

/// Short name for the JSON kind of a value, used in error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Join nested paths for error messages and env key listings.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Insert `value` at a dotted path, creating intermediate mappings.
///
/// A leaf found where an intermediate mapping is needed is replaced, so the
/// deepest assignment wins.
pub fn insert_path(map: &mut ConfigMap, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = map;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
}

/// Follow a dotted path through nested mappings.
pub fn get_path<'a>(map: &'a ConfigMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = map.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn insert_path_builds_nested_mappings() {
        let mut map = ConfigMap::new();
        insert_path(&mut map, "z.bar", json!("bar"));
        insert_path(&mut map, "z.foo", json!("f"));
        insert_path(&mut map, "x", json!("x"));
        assert_eq!(
            Value::Object(map),
            json!({"x": "x", "z": {"bar": "bar", "foo": "f"}})
        );
    }

    #[test]
    fn insert_path_replaces_leaf_on_the_way_down() {
        let mut map = ConfigMap::new();
        insert_path(&mut map, "db", json!("sqlite"));
        insert_path(&mut map, "db.port", json!("5432"));
        assert_eq!(Value::Object(map), json!({"db": {"port": "5432"}}));
    }

    #[test]
    fn get_path_walks_nested_mappings() {
        let map = json!({"z": {"bar": "bar"}, "x": 1});
        let map = map.as_object().expect("object");
        assert_eq!(get_path(map, "z.bar"), Some(&json!("bar")));
        assert_eq!(get_path(map, "x.y"), None);
        assert_eq!(get_path(map, "missing"), None);
    }
}
