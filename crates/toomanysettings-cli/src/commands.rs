//! Command implementations; each returns the text to print.

use crate::{EnvArgs, OutputFormat, ResolveArgs, SchemaArgs};
use anyhow::{Context, bail};
use log::debug;
use serde_json::Value;
use std::path::Path;
use toomanysettings::{
    ConfigMap, EnvLoader, Environment, FileLoader, LiteralLoader, MapEnvironment, ObjectSchema,
    Resolver, SourceLoader,
};

/// Resolve settings from files, the environment and overrides.
pub(crate) fn resolve<E: Environment + 'static>(
    args: &ResolveArgs,
    env: E,
) -> anyhow::Result<String> {
    let schema = load_schema(&args.schema.schema)?;
    let mut resolver = Resolver::new(schema.clone());

    for path in &args.files {
        let mut loader = FileLoader::from_path(path)
            .with_context(|| format!("unsupported settings file {}", path.display()))?;
        if args.missing_ok {
            loader = loader.optional();
        }
        resolver.push_loader(Box::new(loader));
    }
    if let Some(loader) = env_loader(&args.schema, schema, env) {
        resolver.push_loader(Box::new(loader));
    }
    if !args.overrides.is_empty() {
        let overrides = LiteralLoader::from_overrides(&args.overrides)
            .context("invalid --set override")?;
        resolver.push_loader(Box::new(overrides));
    }
    debug!("resolver assembled: {resolver:?}");

    let tree = if args.raw {
        resolver.merged_tree().context("failed to merge settings")?
    } else {
        resolver.resolve().context("failed to resolve settings")?
    };
    render(&tree, args.output)
}

/// List every environment variable the schema maps to.
pub(crate) fn env_keys(args: &EnvArgs) -> anyhow::Result<String> {
    let schema = load_schema(&args.schema.schema)?;
    let Some(loader) = env_loader(&args.schema, schema, MapEnvironment::new()) else {
        bail!("--env-prefix is required to list environment variables");
    };
    let mut output = String::new();
    for key in loader.expected_keys() {
        output.push_str(&key);
        output.push('\n');
    }
    Ok(output)
}

fn env_loader<E: Environment>(
    args: &SchemaArgs,
    schema: ObjectSchema,
    env: E,
) -> Option<EnvLoader<E>> {
    let prefix = args.env_prefix.as_ref()?;
    Some(
        EnvLoader::new(prefix.clone(), schema)
            .with_separator(args.env_separator.clone())
            .with_case(args.env_case.into())
            .with_environment(env),
    )
}

fn load_schema(path: &Path) -> anyhow::Result<ObjectSchema> {
    let document = FileLoader::from_path(path)
        .and_then(|loader| loader.load())
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    ObjectSchema::from_document(&Value::Object(document))
        .with_context(|| format!("invalid schema {}", path.display()))
}

fn render(tree: &ConfigMap, format: OutputFormat) -> anyhow::Result<String> {
    let mut rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(tree)?,
        OutputFormat::Yaml => serde_yaml::to_string(tree)?,
        OutputFormat::Toml => {
            toml::to_string(tree).context("settings cannot be represented as TOML")?
        }
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}
