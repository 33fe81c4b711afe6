//! Schema boundary: field descriptors, object shapes and validation.
//!
//! An [`ObjectSchema`] describes the fields a settings object declares. The
//! environment loader walks it to build keys, and validation uses it to coerce
//! the merged tree, fill declared defaults and collect field-level issues.
//! [`TypedSchema`] layers serde deserialization on top for concrete structs.

mod document;
mod typed;
mod validate;


use crate::error::ValidationError;
use crate::tree::ConfigMap;
use serde_json::Value;

pub use typed::{Settings, TypedSchema};

/// Declared type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Accepts any value unchanged (arrays, null, free-form mappings).
    Any,
    /// A nested settings object.
    Object(ObjectSchema),
}

impl FieldType {
    /// Name used in schema documents and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Any => "any",
            FieldType::Object(_) => "object",
        }
    }
}

/// Name, type and optional default of one declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Declare a required field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// Declare a nested object field.
    pub fn nested(name: impl Into<String>, schema: ObjectSchema) -> Self {
        Self::new(name, FieldType::Object(schema))
    }

    /// Attach the value used when no source provides this field.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.ty, FieldType::Object(_))
    }

    /// Nested schema when this field is an object.
    pub fn nested_schema(&self) -> Option<&ObjectSchema> {
        match &self.ty {
            FieldType::Object(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Ordered set of fields making up one settings object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<FieldDescriptor>,
    deny_unknown: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier field of the same name.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Shorthand for a required field of the given type.
    pub fn required(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.field(FieldDescriptor::new(name, ty))
    }

    /// Shorthand for a field with a default value.
    pub fn optional(
        self,
        name: impl Into<String>,
        ty: FieldType,
        default: impl Into<Value>,
    ) -> Self {
        self.field(FieldDescriptor::new(name, ty).with_default(default))
    }

    /// Shorthand for a nested object field without a default.
    pub fn nested(self, name: impl Into<String>, schema: ObjectSchema) -> Self {
        self.field(FieldDescriptor::nested(name, schema))
    }

    /// Report keys that are not declared fields instead of dropping them.
    pub fn deny_unknown_keys(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    pub fn denies_unknown_keys(&self) -> bool {
        self.deny_unknown
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Validation entry point consumed by the resolver.
///
/// `shape` exposes the declared fields so schema-driven loaders can walk
/// them; `validate` turns the merged tree into the caller's output type or
/// reports every offending field.
pub trait Schema {
    type Output;

    fn shape(&self) -> &ObjectSchema;

    fn validate(&self, tree: ConfigMap) -> Result<Self::Output, ValidationError>;
}

impl Schema for ObjectSchema {
    type Output = ConfigMap;

    fn shape(&self) -> &ObjectSchema {
        self
    }

    fn validate(&self, tree: ConfigMap) -> Result<ConfigMap, ValidationError> {
        self.normalize(&tree)
    }
}
