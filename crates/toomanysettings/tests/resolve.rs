//! End-to-end tests for resolving settings from ordered sources.

use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use toomanysettings::{
    ConfigError, ConfigMap, EnvLoader, FieldType, FileLoader, IssueKind, LiteralLoader,
    MapEnvironment, ObjectSchema, Resolver, Schema, Settings, TypedSchema, ValidationError,
};

#[derive(Debug, Deserialize, PartialEq)]
struct OtherSettings {
    foo: String,
    bar: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct SomeSettings {
    x: String,
    y: String,
    z: OtherSettings,
}

impl Settings for SomeSettings {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .required("x", FieldType::String)
            .optional("y", FieldType::String, "foo")
            .nested(
                "z",
                ObjectSchema::new()
                    .optional("foo", FieldType::String, "f")
                    .required("bar", FieldType::String),
            )
    }
}

fn literal(value: Value) -> LiteralLoader {
    LiteralLoader::from_value(value).expect("literal")
}

#[test]
fn literal_source_resolves_with_defaults() {
    let resolver: Resolver<TypedSchema<SomeSettings>> =
        Resolver::for_settings().with_loader(literal(json!({"x": "x", "z": {"bar": "bar"}})));
    let settings = resolver.resolve().expect("settings");
    assert_eq!(
        settings,
        SomeSettings {
            x: "x".to_string(),
            y: "foo".to_string(),
            z: OtherSettings {
                foo: "f".to_string(),
                bar: "bar".to_string(),
            },
        }
    );
}

#[test]
fn later_loaders_take_precedence() {
    let schema = ObjectSchema::new().required("x", FieldType::String);
    let resolved = Resolver::new(schema)
        .with_loader(literal(json!({"x": "a"})))
        .with_loader(literal(json!({"x": "b"})))
        .resolve()
        .expect("settings");
    assert_eq!(resolved["x"], json!("b"));
}

#[test]
fn nested_values_merge_across_sources() {
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(literal(json!({"x": "base", "z": {"foo": "from-base", "bar": "b1"}})))
        .with_loader(literal(json!({"z": {"bar": "b2"}})));
    let settings = resolver.resolve().expect("settings");
    assert_eq!(settings.x, "base");
    assert_eq!(settings.z.foo, "from-base");
    assert_eq!(settings.z.bar, "b2");
}

#[test]
fn env_loader_feeds_typed_settings() {
    let env = MapEnvironment::new()
        .with_var("MY_APP_x", "x")
        .with_var("MY_APP_z_bar", "bar");
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(EnvLoader::for_settings::<SomeSettings>("MY_APP").with_environment(env));
    let settings = resolver.resolve().expect("settings");
    assert_eq!(settings.x, "x");
    assert_eq!(settings.y, "foo");
    assert_eq!(settings.z.bar, "bar");
}

#[test]
fn unset_required_env_var_fails_validation_naming_the_field() {
    let env = MapEnvironment::new().with_var("MY_APP_z_bar", "bar");
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(EnvLoader::for_settings::<SomeSettings>("MY_APP").with_environment(env));
    let err = resolver.resolve().unwrap_err();
    match err {
        ConfigError::Validation(ValidationError { issues }) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].path, "x");
            assert_eq!(issues[0].kind, IssueKind::Missing);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unset_env_var_with_default_uses_default() {
    let env = MapEnvironment::new()
        .with_var("MY_APP_x", "x")
        .with_var("MY_APP_z_bar", "bar");
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(EnvLoader::for_settings::<SomeSettings>("MY_APP").with_environment(env));
    assert_eq!(resolver.resolve().expect("settings").y, "foo");
}

#[test]
fn env_overrides_file_and_keeps_unrelated_keys() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"{"x": "file", "y": "file-y", "z": {"foo": "file-foo", "bar": "file-bar"}}"#)
        .expect("write");
    let env = MapEnvironment::new().with_var("APP_z_bar", "env-bar");
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(FileLoader::json(&path))
        .with_loader(EnvLoader::for_settings::<SomeSettings>("APP").with_environment(env));
    let settings = resolver.resolve().expect("settings");
    assert_eq!(settings.x, "file");
    assert_eq!(settings.y, "file-y");
    assert_eq!(settings.z.foo, "file-foo");
    assert_eq!(settings.z.bar, "env-bar");
}

/// Schema wrapper counting validation calls.
struct CountingSchema {
    inner: ObjectSchema,
    calls: AtomicUsize,
}

impl Schema for CountingSchema {
    type Output = ConfigMap;

    fn shape(&self) -> &ObjectSchema {
        &self.inner
    }

    fn validate(&self, tree: ConfigMap) -> Result<ConfigMap, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.validate(tree)
    }
}

#[test]
fn malformed_file_aborts_before_validation() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"["not", "a", "mapping"]"#).expect("write");

    let schema = CountingSchema {
        inner: ObjectSchema::new().optional("x", FieldType::String, "x"),
        calls: AtomicUsize::new(0),
    };
    let resolver = Resolver::new(schema)
        .with_loader(literal(json!({"x": "before"})))
        .with_loader(FileLoader::json(&path));
    let err = resolver.resolve().unwrap_err();
    assert!(matches!(err, ConfigError::MalformedSource { .. }));
    assert_eq!(resolver.schema().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_file_propagates_source_unavailable() {
    let temp = TempDir::new().expect("tmp");
    let resolver = Resolver::new(ObjectSchema::new())
        .with_loader(FileLoader::json(temp.path().join("absent.json")));
    assert!(matches!(
        resolver.resolve().unwrap_err(),
        ConfigError::SourceUnavailable { .. }
    ));
}

#[test]
fn validation_reports_every_offending_field() {
    let schema = ObjectSchema::new()
        .required("port", FieldType::Integer)
        .required("host", FieldType::String)
        .required("debug", FieldType::Boolean);
    let err = Resolver::new(schema)
        .with_loader(literal(json!({"port": "http", "debug": "sometimes"})))
        .resolve()
        .unwrap_err();
    let ConfigError::Validation(err) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(err.paths(), vec!["port", "host", "debug"]);
}

#[test]
fn layered_resolution_reports_each_source() {
    let env = MapEnvironment::new().with_var("APP_x", "env");
    let resolver: Resolver<TypedSchema<SomeSettings>> = Resolver::for_settings()
        .with_loader(literal(json!({"x": "lit", "z": {"bar": "bar"}})).with_label("base"))
        .with_loader(EnvLoader::for_settings::<SomeSettings>("APP").with_environment(env));
    let resolved = resolver.resolve_layered().expect("resolved");
    assert_eq!(resolved.config.x, "env");
    let sources: Vec<_> = resolved.layers.iter().map(|l| l.source.as_str()).collect();
    assert_eq!(sources, vec!["literal(base)", "env(APP_)"]);
    assert_eq!(resolved.layers[1].keys, vec!["x".to_string(), "z".to_string()]);
}

#[test]
fn merged_tree_is_available_without_validation() {
    let resolver = Resolver::new(ObjectSchema::new().required("x", FieldType::String))
        .with_loader(literal(json!({"z": {"foo": "a"}})))
        .with_loader(literal(json!({"z": {"bar": "b"}})));
    let merged = resolver.merged_tree().expect("merged");
    assert_eq!(Value::Object(merged), json!({"z": {"foo": "a", "bar": "b"}}));
    assert!(resolver.resolve().is_err());
}

#[test]
fn resolving_twice_yields_identical_results() {
    let resolver = Resolver::new(ObjectSchema::new().optional("x", FieldType::String, "d"))
        .with_loader(literal(json!({"x": "once"})));
    let first = resolver.resolve().expect("first");
    let second = resolver.resolve().expect("second");
    assert_eq!(first, second);
}

#[test]
fn no_loaders_resolve_to_defaults() {
    let resolved = Resolver::new(ObjectSchema::new().optional("x", FieldType::Integer, 3))
        .resolve()
        .expect("settings");
    assert_eq!(resolved["x"], json!(3));
}
