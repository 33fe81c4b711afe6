//! Ordered loading, merging and validation of settings sources.

use crate::ConfigError;
use crate::loader::SourceLoader;
use crate::merge::merge_maps;
use crate::schema::{Schema, Settings, TypedSchema};
use crate::tree::ConfigMap;
use log::{debug, info};

/// Validated settings plus metadata about the layers that produced them.
#[derive(Debug, Clone)]
pub struct ResolvedConfig<T> {
    /// The merged, validated settings.
    pub config: T,
    /// One entry per loader, in precedence order (lowest first).
    pub layers: Vec<LayerInfo>,
}

/// What a single loader contributed during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    /// Loader identity, see [`SourceLoader::describe`].
    pub source: String,
    /// Top-level keys the loader produced.
    pub keys: Vec<String>,
}

/// Resolves a schema from an ordered list of loaders.
///
/// Loaders declared later take precedence over loaders declared earlier.
pub struct Resolver<S> {
    schema: S,
    loaders: Vec<Box<dyn SourceLoader>>,
}

impl<S: Schema> Resolver<S> {
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            loaders: Vec::new(),
        }
    }

    /// Append a loader with higher precedence than those already added.
    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Append an already boxed loader.
    pub fn push_loader(&mut self, loader: Box<dyn SourceLoader>) {
        self.loaders.push(loader);
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn loaders(&self) -> &[Box<dyn SourceLoader>] {
        &self.loaders
    }

    /// Load every source in order and validate the merged tree.
    pub fn resolve(&self) -> Result<S::Output, ConfigError> {
        Ok(self.resolve_layered()?.config)
    }

    /// Like [`Resolver::resolve`] but also reports what each layer provided.
    pub fn resolve_layered(&self) -> Result<ResolvedConfig<S::Output>, ConfigError> {
        let (merged, layers) = self.merge_layers()?;
        let config = self.schema.validate(merged)?;
        info!("settings resolved (layers={})", layers.len());
        Ok(ResolvedConfig { config, layers })
    }

    /// The merged tree before validation.
    pub fn merged_tree(&self) -> Result<ConfigMap, ConfigError> {
        Ok(self.merge_layers()?.0)
    }

    fn merge_layers(&self) -> Result<(ConfigMap, Vec<LayerInfo>), ConfigError> {
        let mut merged = ConfigMap::new();
        let mut layers = Vec::with_capacity(self.loaders.len());
        for loader in &self.loaders {
            let source = loader.describe();
            debug!("loading settings layer (source={source})");
            let tree = loader.load()?;
            layers.push(LayerInfo {
                source,
                keys: tree.keys().cloned().collect(),
            });
            merged = merge_maps(&merged, &tree);
        }
        Ok((merged, layers))
    }
}

impl<T: Settings> Resolver<TypedSchema<T>> {
    /// Resolver producing a `T`, using the schema `T` declares.
    pub fn for_settings() -> Self {
        Self::new(TypedSchema::new())
    }
}

impl<S> std::fmt::Debug for Resolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<String> = self.loaders.iter().map(|l| l.describe()).collect();
        f.debug_struct("Resolver")
            .field("loaders", &sources)
            .finish_non_exhaustive()
    }
}
