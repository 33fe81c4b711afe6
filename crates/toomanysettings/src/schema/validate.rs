//! Coercion of merged trees against an [`ObjectSchema`].

use super::{FieldType, ObjectSchema};
use crate::error::{FieldIssue, IssueKind, ValidationError};
use crate::tree::{ConfigMap, join_path, kind_name};
use serde_json::{Number, Value};

impl ObjectSchema {
    /// Coerce `tree` to the declared field types and fill defaults.
    ///
    /// Undeclared keys are dropped unless the object denies them. All issues
    /// are collected before returning.
    pub fn normalize(&self, tree: &ConfigMap) -> Result<ConfigMap, ValidationError> {
        let mut issues = Vec::new();
        let normalized = self.normalize_at(tree, "", &mut issues);
        if issues.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError { issues })
        }
    }

    fn normalize_at(
        &self,
        tree: &ConfigMap,
        path: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> ConfigMap {
        let mut normalized = ConfigMap::new();
        for field in self.fields() {
            let field_path = join_path(path, field.name());
            let value = match (tree.get(field.name()), field.default_value()) {
                (Some(value), _) => value,
                (None, Some(default)) => default,
                (None, None) => {
                    issues.push(issue(&field_path, IssueKind::Missing));
                    continue;
                }
            };
            if let Some(value) = coerce(field.ty(), value, &field_path, issues) {
                normalized.insert(field.name().to_string(), value);
            }
        }

        if self.denies_unknown_keys() {
            for key in tree.keys() {
                if self.get(key).is_none() {
                    issues.push(issue(&join_path(path, key), IssueKind::UnknownKey));
                }
            }
        }

        normalized
    }
}

fn coerce(
    ty: &FieldType,
    value: &Value,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<Value> {
    let coerced = match (ty, value) {
        (FieldType::Any, value) => Some(value.clone()),
        (FieldType::Object(schema), Value::Object(map)) => {
            return Some(Value::Object(schema.normalize_at(map, path, issues)));
        }
        (FieldType::Object(_), _) => None,
        (FieldType::String, Value::String(_)) => Some(value.clone()),
        (FieldType::String, _) => None,
        (FieldType::Integer, value) => coerce_integer(value),
        (FieldType::Float, value) => coerce_float(value),
        (FieldType::Boolean, value) => coerce_bool(value),
    };
    if coerced.is_none() {
        issues.push(issue(
            path,
            IssueKind::TypeMismatch {
                expected: ty.name(),
                found: kind_name(value),
            },
        ));
    }
    coerced
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(value.clone()),
        Value::Number(number) => {
            let float = number.as_f64()?;
            let in_range = float >= i64::MIN as f64 && float <= i64::MAX as f64;
            (float.fract() == 0.0 && in_range).then(|| Value::from(float as i64))
        }
        Value::String(text) => text.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn issue(path: &str, kind: IssueKind) -> FieldIssue {
    let path = if path.is_empty() { "root" } else { path };
    FieldIssue {
        path: path.to_string(),
        kind,
    }
}
