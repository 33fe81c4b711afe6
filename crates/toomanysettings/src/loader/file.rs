//! Settings sources backed by structured files.

use super::{Format, SourceLoader};
use crate::ConfigError;
use crate::tree::{ConfigMap, kind_name};
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Loader decoding one file with a [`Format`].
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
    format: Format,
    optional: bool,
}

impl FileLoader {
    pub fn new(path: impl AsRef<Path>, format: Format) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
            optional: false,
        }
    }

    pub fn json(path: impl AsRef<Path>) -> Self {
        Self::new(path, Format::Json)
    }

    pub fn json5(path: impl AsRef<Path>) -> Self {
        Self::new(path, Format::Json5)
    }

    pub fn toml(path: impl AsRef<Path>) -> Self {
        Self::new(path, Format::Toml)
    }

    pub fn yaml(path: impl AsRef<Path>) -> Self {
        Self::new(path, Format::Yaml)
    }

    /// Pick the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path).ok_or_else(|| ConfigError::MalformedSource {
            source_name: path.display().to_string(),
            message: "cannot infer file format from extension".to_string(),
        })?;
        Ok(Self::new(path, format))
    }

    /// Treat a missing file as an empty source instead of an error.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl SourceLoader for FileLoader {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        debug!(
            "loading settings file (format={}, path={})",
            self.format.name(),
            self.path.display()
        );
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if self.optional && err.kind() == ErrorKind::NotFound => {
                warn!(
                    "optional settings file missing, skipping (path={})",
                    self.path.display()
                );
                return Ok(ConfigMap::new());
            }
            Err(source) => {
                return Err(ConfigError::SourceUnavailable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let source_name = self.path.display().to_string();
        match self.format.decode(&contents, &source_name)? {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::MalformedSource {
                source_name,
                message: format!(
                    "expected a mapping at the top level, found {}",
                    kind_name(&other)
                ),
            }),
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}({})",
            self.format.name().to_ascii_lowercase(),
            self.path.display()
        )
    }
}
