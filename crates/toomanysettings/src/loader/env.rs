//! Schema-driven environment variable source.
//!
//! Keys are built by joining the prefix and each field name with the
//! separator, descending into nested objects with the joined key as the new
//! prefix. With prefix `MY_APP`, field `z.bar` is read from `MY_APP_z_bar`.
//! Only declared fields are ever looked up.

use super::SourceLoader;
use crate::ConfigError;
use crate::schema::{ObjectSchema, Settings};
use crate::tree::ConfigMap;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::env::VarError;

/// Read-only view of a flat variable namespace.
pub trait Environment: Send + Sync {
    /// Exact-key lookup; `Ok(None)` when the variable is unset.
    fn var(&self, key: &str) -> Result<Option<String>, ConfigError>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NonUnicodeEnv {
                key: key.to_string(),
            }),
        }
    }
}

/// Fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.vars.get(key).cloned())
    }
}

/// Case applied to the complete variable name before lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvCase {
    #[default]
    Preserve,
    Upper,
    Lower,
}

/// How prefix and field names combine into variable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNaming {
    pub separator: String,
    pub case: EnvCase,
}

impl Default for EnvNaming {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            case: EnvCase::Preserve,
        }
    }
}

impl EnvNaming {
    /// Join a prefix and a field name; an empty prefix adds no separator.
    pub fn join(&self, prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}{}{name}", self.separator)
        }
    }

    /// Apply the configured case to a joined key.
    pub fn variable(&self, key: &str) -> String {
        match self.case {
            EnvCase::Preserve => key.to_string(),
            EnvCase::Upper => key.to_uppercase(),
            EnvCase::Lower => key.to_lowercase(),
        }
    }
}

/// Loader reading the fields of a schema from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLoader<E = ProcessEnvironment> {
    prefix: String,
    schema: ObjectSchema,
    naming: EnvNaming,
    env: E,
}

impl EnvLoader<ProcessEnvironment> {
    /// Read `schema` from the process environment under `prefix`.
    pub fn new(prefix: impl Into<String>, schema: ObjectSchema) -> Self {
        Self {
            prefix: prefix.into(),
            schema,
            naming: EnvNaming::default(),
            env: ProcessEnvironment,
        }
    }

    pub fn for_settings<T: Settings>(prefix: impl Into<String>) -> Self {
        Self::new(prefix, T::schema())
    }
}

impl<E: Environment> EnvLoader<E> {
    /// Swap the variable source, e.g. for a [`MapEnvironment`].
    pub fn with_environment<F: Environment>(self, env: F) -> EnvLoader<F> {
        EnvLoader {
            prefix: self.prefix,
            schema: self.schema,
            naming: self.naming,
            env,
        }
    }

    pub fn with_naming(mut self, naming: EnvNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.naming.separator = separator.into();
        self
    }

    pub fn with_case(mut self, case: EnvCase) -> Self {
        self.naming.case = case;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every variable name this loader looks up, in schema order.
    pub fn expected_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_keys(&self.prefix, &self.schema, &mut keys);
        keys
    }

    fn collect_keys(&self, prefix: &str, schema: &ObjectSchema, keys: &mut Vec<String>) {
        for field in schema.fields() {
            let key = self.naming.join(prefix, field.name());
            match field.nested_schema() {
                Some(nested) => self.collect_keys(&key, nested, keys),
                None => keys.push(self.naming.variable(&key)),
            }
        }
    }

    /// Build the tree for `schema` with every key rooted at `prefix`.
    ///
    /// Nested objects always get an entry, possibly empty, so partially set
    /// objects still validate field by field. Unset scalars are left out.
    pub fn load_with_prefix(
        &self,
        prefix: &str,
        schema: &ObjectSchema,
    ) -> Result<ConfigMap, ConfigError> {
        let mut result = ConfigMap::new();
        for field in schema.fields() {
            let key = self.naming.join(prefix, field.name());
            if let Some(nested) = field.nested_schema() {
                let subtree = self.load_with_prefix(&key, nested)?;
                result.insert(field.name().to_string(), Value::Object(subtree));
                continue;
            }
            let variable = self.naming.variable(&key);
            if let Some(value) = self.env.var(&variable)? {
                debug!("read environment variable {variable}");
                result.insert(field.name().to_string(), Value::String(value));
            }
        }
        Ok(result)
    }
}

impl<E: Environment> SourceLoader for EnvLoader<E> {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        self.load_with_prefix(&self.prefix, &self.schema)
    }

    fn describe(&self) -> String {
        if self.prefix.is_empty() {
            "env".to_string()
        } else {
            format!("env({}{})", self.prefix, self.naming.separator)
        }
    }
}
