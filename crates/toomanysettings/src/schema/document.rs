//! Building an [`ObjectSchema`] from a JSON schema document.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "deny_unknown": false,
//!   "fields": {
//!     "x": { "type": "string" },
//!     "y": { "type": "string", "default": "foo" },
//!     "z": { "type": "object", "fields": { "bar": { "type": "string" } } }
//!   }
//! }
//! ```

use super::{FieldDescriptor, FieldType, ObjectSchema};
use crate::error::{FieldIssue, IssueKind, ValidationError};
use crate::tree::{join_path, kind_name};
use serde_json::{Map, Value};

const OBJECT_KEYS: &[&str] = &["fields", "deny_unknown"];
const FIELD_KEYS: &[&str] = &["type", "default", "fields", "deny_unknown"];

impl ObjectSchema {
    /// Parse a schema document, reporting every malformed entry.
    pub fn from_document(document: &Value) -> Result<Self, ValidationError> {
        let mut issues = Vec::new();
        let schema = parse_object(document, "", &mut issues);
        if issues.is_empty() {
            Ok(schema.unwrap_or_default())
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn parse_object(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<ObjectSchema> {
    let map = expect_object(value, path, issues)?;
    ensure_allowed_keys(map, OBJECT_KEYS, path, issues);
    parse_fields(map, path, issues)
}

fn parse_fields(
    map: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<ObjectSchema> {
    let mut schema = ObjectSchema::new();
    if let Some(flag) = map.get("deny_unknown") {
        match flag {
            Value::Bool(true) => schema = schema.deny_unknown_keys(),
            Value::Bool(false) => {}
            other => issues.push(mismatch(&join_path(path, "deny_unknown"), "boolean", other)),
        }
    }

    let fields_path = join_path(path, "fields");
    let Some(fields) = map.get("fields") else {
        return Some(schema);
    };
    let fields = expect_object(fields, &fields_path, issues)?;
    for (name, definition) in fields {
        let field_path = join_path(&fields_path, name);
        if let Some(field) = parse_field(name, definition, &field_path, issues) {
            schema = schema.field(field);
        }
    }
    Some(schema)
}

fn parse_field(
    name: &str,
    definition: &Value,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<FieldDescriptor> {
    let map = expect_object(definition, path, issues)?;
    ensure_allowed_keys(map, FIELD_KEYS, path, issues);

    let type_path = join_path(path, "type");
    let ty = match map.get("type").map(|ty| (ty, ty.as_str())) {
        None => {
            issues.push(FieldIssue {
                path: type_path,
                kind: IssueKind::Missing,
            });
            return None;
        }
        Some((_, Some("string"))) => FieldType::String,
        Some((_, Some("integer"))) => FieldType::Integer,
        Some((_, Some("float"))) => FieldType::Float,
        Some((_, Some("boolean"))) => FieldType::Boolean,
        Some((_, Some("any"))) => FieldType::Any,
        Some((_, Some("object"))) => FieldType::Object(parse_fields(map, path, issues)?),
        Some((_, Some(other))) => {
            issues.push(FieldIssue {
                path: type_path,
                kind: IssueKind::Invalid(format!("unknown field type `{other}`")),
            });
            return None;
        }
        Some((value, None)) => {
            issues.push(mismatch(&type_path, "string", value));
            return None;
        }
    };

    if !matches!(ty, FieldType::Object(_)) {
        for key in ["fields", "deny_unknown"] {
            if map.contains_key(key) {
                issues.push(FieldIssue {
                    path: join_path(path, key),
                    kind: IssueKind::Invalid("only allowed on object fields".to_string()),
                });
            }
        }
    }

    let mut field = FieldDescriptor::new(name, ty);
    if let Some(default) = map.get("default") {
        field = field.with_default(default.clone());
    }
    Some(field)
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => {
            issues.push(mismatch(path, "object", other));
            None
        }
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
    issues: &mut Vec<FieldIssue>,
) {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            issues.push(FieldIssue {
                path: join_path(path, key),
                kind: IssueKind::UnknownKey,
            });
        }
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> FieldIssue {
    let path = if path.is_empty() { "root" } else { path };
    FieldIssue {
        path: path.to_string(),
        kind: IssueKind::TypeMismatch {
            expected,
            found: kind_name(found),
        },
    }
}
