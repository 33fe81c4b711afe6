//! Layered settings resolution.
//!
//! Settings are gathered from an ordered list of sources (inline values,
//! JSON/JSON5/TOML/YAML files, environment variables), deep-merged with later
//! sources taking precedence, and validated against a declared schema.
//!
//! ```
//! use serde_json::json;
//! use toomanysettings::{FieldType, LiteralLoader, ObjectSchema, Resolver};
//!
//! let schema = ObjectSchema::new()
//!     .required("x", FieldType::String)
//!     .optional("y", FieldType::String, "foo");
//! let settings = Resolver::new(schema)
//!     .with_loader(LiteralLoader::from_value(json!({"x": "a"})).unwrap())
//!     .with_loader(LiteralLoader::from_value(json!({"x": "b"})).unwrap())
//!     .resolve()
//!     .unwrap();
//! assert_eq!(settings["x"], "b");
//! assert_eq!(settings["y"], "foo");
//! ```

mod error;
mod loader;
mod merge;
mod resolver;
mod schema;
mod tree;

/// Error types returned by loading and validation.
pub use error::{ConfigError, FieldIssue, IssueKind, ValidationError};
/// Source loaders and the environment boundary.
pub use loader::{
    EnvCase, EnvLoader, EnvNaming, Environment, FileLoader, Format, LiteralLoader,
    MapEnvironment, ProcessEnvironment, SourceLoader,
};
/// Deep merge of configuration trees.
pub use merge::{merge, merge_maps, merge_values};
pub use resolver::{LayerInfo, ResolvedConfig, Resolver};
/// Schema declarations and validation.
pub use schema::{FieldDescriptor, FieldType, ObjectSchema, Schema, Settings, TypedSchema};
pub use tree::{ConfigMap, get_path, insert_path};
