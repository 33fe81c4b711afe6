//! Command-line front end for layered settings resolution.

mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use toomanysettings::{EnvCase, ProcessEnvironment};

/// Command-line options for the settings resolver.
#[derive(Parser)]
#[command(name = "toomanysettings", version, about = "Resolve layered settings against a schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge files, environment and overrides, then validate and print the result
    Resolve(ResolveArgs),
    /// List the environment variable names a schema is read from
    Env(EnvArgs),
}

/// Options shared by every command that reads a schema and the environment.
#[derive(Args, Clone)]
pub(crate) struct SchemaArgs {
    /// Schema document (JSON, JSON5, TOML or YAML)
    #[arg(long)]
    pub schema: PathBuf,
    /// Prefix for environment variables; omit to skip the environment
    #[arg(long)]
    pub env_prefix: Option<String>,
    /// Separator between prefix and field names
    #[arg(long, default_value = "_")]
    pub env_separator: String,
    /// Case applied to environment variable names
    #[arg(long, value_enum, default_value_t = CaseArg::Preserve)]
    pub env_case: CaseArg,
}

#[derive(Args, Clone)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// Settings files, lowest precedence first; format follows the extension
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,
    /// Skip settings files that do not exist
    #[arg(long)]
    pub missing_ok: bool,
    /// `key.path=value` overrides applied after every other source
    #[arg(long = "set")]
    pub overrides: Vec<String>,
    /// Print the merged tree without validating it
    #[arg(long)]
    pub raw: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Args, Clone)]
pub(crate) struct EnvArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum CaseArg {
    Preserve,
    Upper,
    Lower,
}

impl From<CaseArg> for EnvCase {
    fn from(case: CaseArg) -> Self {
        match case {
            CaseArg::Preserve => EnvCase::Preserve,
            CaseArg::Upper => EnvCase::Upper,
            CaseArg::Lower => EnvCase::Lower,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

/// Entry point for the settings CLI.
fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Resolve(args) => {
            info!(
                "resolving settings (files={}, env={}, overrides={})",
                args.files.len(),
                args.schema.env_prefix.is_some(),
                args.overrides.len()
            );
            commands::resolve(&args, ProcessEnvironment)?
        }
        Command::Env(args) => commands::env_keys(&args)?,
    };
    print!("{output}");
    Ok(())
}
