//! Schemas backed by concrete serde types.

use super::{ObjectSchema, Schema};
use crate::error::{IssueKind, ValidationError};
use crate::tree::ConfigMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// A settings struct that can describe its own fields.
///
/// `schema` supplies the shape used for env key discovery, coercion and
/// defaults; deserialization then runs on the normalized tree.
pub trait Settings: DeserializeOwned {
    fn schema() -> ObjectSchema;
}

/// [`Schema`] producing a `T` from the merged tree.
#[derive(Debug, Clone)]
pub struct TypedSchema<T> {
    shape: ObjectSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Settings> TypedSchema<T> {
    pub fn new() -> Self {
        Self {
            shape: T::schema(),
            _marker: PhantomData,
        }
    }
}

impl<T: Settings> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Settings> Schema for TypedSchema<T> {
    type Output = T;

    fn shape(&self) -> &ObjectSchema {
        &self.shape
    }

    fn validate(&self, tree: ConfigMap) -> Result<T, ValidationError> {
        let normalized = self.shape.normalize(&tree)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|err| ValidationError::single("root", IssueKind::Invalid(err.to_string())))
    }
}
