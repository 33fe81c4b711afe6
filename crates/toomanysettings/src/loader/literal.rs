//! In-memory settings source.

use super::SourceLoader;
use crate::ConfigError;
use crate::tree::{ConfigMap, insert_path, kind_name};
use serde::Serialize;
use serde_json::Value;

/// Loader returning a fixed mapping.
#[derive(Debug, Clone, Default)]
pub struct LiteralLoader {
    values: ConfigMap,
    label: Option<String>,
}

impl LiteralLoader {
    pub fn new(values: ConfigMap) -> Self {
        Self {
            values,
            label: None,
        }
    }

    /// Wrap a value that must be a mapping at the top level.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(values) => Ok(Self::new(values)),
            other => Err(ConfigError::MalformedSource {
                source_name: "literal".to_string(),
                message: format!(
                    "expected a mapping at the top level, found {}",
                    kind_name(&other)
                ),
            }),
        }
    }

    /// Serialize any value (typically a struct or map) into a literal source.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ConfigError> {
        let value = serde_json::to_value(value).map_err(|err| ConfigError::MalformedSource {
            source_name: "literal".to_string(),
            message: err.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Build from `key.path=value` assignments; values stay strings.
    pub fn from_overrides<I, S>(assignments: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = ConfigMap::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (path, value) = parse_override(assignment)?;
            insert_path(&mut values, path, Value::String(value.to_string()));
        }
        Ok(Self::new(values).with_label("overrides"))
    }

    /// Name shown by [`SourceLoader::describe`].
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn values(&self) -> &ConfigMap {
        &self.values
    }
}

impl SourceLoader for LiteralLoader {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        Ok(self.values.clone())
    }

    fn describe(&self) -> String {
        match &self.label {
            Some(label) => format!("literal({label})"),
            None => "literal".to_string(),
        }
    }
}

fn parse_override(assignment: &str) -> Result<(&str, &str), ConfigError> {
    let malformed = |message: &str| ConfigError::MalformedSource {
        source_name: "overrides".to_string(),
        message: format!("{message}: `{assignment}`"),
    };
    let (path, value) = assignment
        .split_once('=')
        .ok_or_else(|| malformed("expected key.path=value"))?;
    let path = path.trim();
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(malformed("empty key segment"));
    }
    Ok((path, value))
}
