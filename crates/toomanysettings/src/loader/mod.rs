//! Source loaders producing partial configuration trees.
//!
//! Every medium (inline values, a decoded file, the environment) sits behind
//! [`SourceLoader`]. Loaders only read; combining their output is the merge
//! engine's job.

mod env;
mod file;
mod format;
mod literal;


use crate::ConfigError;
use crate::tree::ConfigMap;

pub use env::{EnvCase, EnvLoader, EnvNaming, Environment, MapEnvironment, ProcessEnvironment};
pub use file::FileLoader;
pub use format::Format;
pub use literal::LiteralLoader;

/// A single settings source.
pub trait SourceLoader: Send + Sync {
    /// Read the backing medium into a fresh tree.
    fn load(&self) -> Result<ConfigMap, ConfigError>;

    /// Human readable identity used in logs and layer reports.
    fn describe(&self) -> String;
}

impl<L: SourceLoader + ?Sized> SourceLoader for Box<L> {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
