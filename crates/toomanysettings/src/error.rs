//! Error types for loading, merging and validating settings.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file-backed source could not be opened or read.
    #[error("failed to read settings source {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A source decoded to something other than a mapping, or failed to decode.
    #[error("malformed settings source {source_name}: {message}")]
    MalformedSource {
        source_name: String,
        message: String,
    },
    /// The decoder for a file format was compiled out of this build.
    #[error(
        "{format} support is not available; rebuild toomanysettings with the `{feature}` feature enabled"
    )]
    OptionalDependencyMissing {
        format: &'static str,
        feature: &'static str,
    },
    /// An environment variable holds a value that is not valid Unicode.
    #[error("environment variable {key} is not valid unicode")]
    NonUnicodeEnv { key: String },
    /// The merged tree did not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field without a default was absent from every source.
    Missing,
    /// Value could not be coerced to the declared type.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Key not declared by an object that denies unknown keys.
    UnknownKey,
    /// Any other rejection, e.g. from typed deserialization.
    Invalid(String),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => f.write_str("missing required field"),
            IssueKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            IssueKind::UnknownKey => f.write_str("unknown key"),
            IssueKind::Invalid(message) => f.write_str(message),
        }
    }
}

/// One offending field in a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path to the field, `root` for the top level.
    pub path: String,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Every field-level problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Build an error holding a single issue.
    pub fn single(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: path.into(),
                kind,
            }],
        }
    }

    /// Paths of all offending fields, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.path.as_str()).collect()
    }

    /// Look up the issue reported for a dotted path.
    pub fn issue_at(&self, path: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid settings ({} issue", self.issues.len())?;
        if self.issues.len() != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
