//! File format decoders.
//!
//! JSON is always available. JSON5, TOML and YAML sit behind cargo features
//! of the same name; a build without one of them only fails when a file of
//! that format is actually loaded.

use crate::ConfigError;
use serde_json::Value;
use std::path::Path;

/// Structured file formats understood by [`super::FileLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Json5,
    Toml,
    Yaml,
}

type Decoder = fn(&str) -> Result<Value, String>;

impl Format {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "json5" => Some(Format::Json5),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Json5 => "JSON5",
            Format::Toml => "TOML",
            Format::Yaml => "YAML",
        }
    }

    /// Cargo feature gating this format, if any.
    fn feature(self) -> Option<&'static str> {
        match self {
            Format::Json => None,
            Format::Json5 => Some("json5"),
            Format::Toml => Some("toml"),
            Format::Yaml => Some("yaml"),
        }
    }

    /// Whether this build carries a decoder for the format.
    pub fn is_available(self) -> bool {
        self.decoder().is_some()
    }

    fn decoder(self) -> Option<Decoder> {
        match self {
            Format::Json => Some(decode_json as Decoder),
            #[cfg(feature = "json5")]
            Format::Json5 => Some(decode_json5 as Decoder),
            #[cfg(feature = "toml")]
            Format::Toml => Some(decode_toml as Decoder),
            #[cfg(feature = "yaml")]
            Format::Yaml => Some(decode_yaml as Decoder),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Decode text into a generic value, naming `source_name` on failure.
    pub(crate) fn decode(self, contents: &str, source_name: &str) -> Result<Value, ConfigError> {
        let decoder = self
            .decoder()
            .ok_or_else(|| ConfigError::OptionalDependencyMissing {
                format: self.name(),
                feature: self.feature().unwrap_or("default"),
            })?;
        decoder(contents).map_err(|message| ConfigError::MalformedSource {
            source_name: source_name.to_string(),
            message: format!("invalid {}: {message}", self.name()),
        })
    }
}

fn decode_json(contents: &str) -> Result<Value, String> {
    serde_json::from_str(contents).map_err(|err| err.to_string())
}

#[cfg(feature = "json5")]
fn decode_json5(contents: &str) -> Result<Value, String> {
    json5::from_str(contents).map_err(|err| err.to_string())
}

#[cfg(feature = "toml")]
fn decode_toml(contents: &str) -> Result<Value, String> {
    let table: toml::Table = toml::from_str(contents).map_err(|err| err.to_string())?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Datetimes have no JSON counterpart and are kept as their TOML text.
#[cfg(feature = "toml")]
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

#[cfg(feature = "yaml")]
fn decode_yaml(contents: &str) -> Result<Value, String> {
    serde_yaml::from_str(contents).map_err(|err| err.to_string())
}
