//! # nestbase CLI
//!
//! Command-line interface for nestbase.
//!
//! Reads a generator options document (the JSON the schema toolchain hands to
//! generators, or a bare `{ "datamodel": ... }` document), merges the
//! generator configuration with command-line overrides and runs the code
//! generator.
//!
//! ```text
//! nestbase dmmf.json --output src/base --dry-run=false
//! ```
//!
//! Boolean flags take an optional value: `--use-swagger` alone means `true`,
//! `--use-swagger=false` turns the feature off.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use nestbase_codegen::{GenerationSummary, Generator, GeneratorConfig, summarize};
use nestbase_core::EngineResult;
use nestbase_ir::{GeneratorOptions, load_options};
use std::path::PathBuf;

// Re-export dependencies for use in main.rs
pub use nestbase_codegen;
pub use nestbase_core;
pub use nestbase_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate NestJS base classes from a Prisma data model
#[derive(Debug, Clone, Parser)]
#[command(name = "nestbase", version, about, long_about = None)]
pub struct Cli {
    /// Generator options document (DMMF JSON)
    #[arg(value_name = "SCHEMA", env = "NESTBASE_SCHEMA")]
    pub schema: PathBuf,

    /// Output directory, overriding the schema's generator output
    #[arg(short, long, value_name = "DIR", env = "NESTBASE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Compute the files without writing them
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub dry_run: Option<bool>,

    /// Emit @nestjs/swagger decorators
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub use_swagger: Option<bool>,

    /// Move relation fields into a separate class
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub separate_relation_fields: Option<bool>,

    /// Emit index.ts barrel files
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub make_index_file: Option<bool>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Merge the configuration found in the options with the command-line flags.
///
/// Flags win over the schema's generator block.
pub fn build_config(cli: &Cli, options: &GeneratorOptions) -> EngineResult<GeneratorConfig> {
    let mut config = GeneratorConfig::from_options(options)?;

    if let Some(output) = &cli.output {
        config = config.with_output_dir(output);
    }
    if let Some(dry_run) = cli.dry_run {
        config = config.with_dry_run(dry_run);
    }
    if let Some(use_swagger) = cli.use_swagger {
        config = config.with_swagger(use_swagger);
    }
    if let Some(separate) = cli.separate_relation_fields {
        config = config.with_separate_relation_fields(separate);
    }
    if let Some(index) = cli.make_index_file {
        config = config.with_index_files(index);
    }

    Ok(config)
}

/// Load the schema, generate and write (unless dry run).
pub async fn run(cli: &Cli) -> anyhow::Result<GenerationSummary> {
    let options = load_options(&cli.schema)
        .with_context(|| format!("failed to load '{}'", cli.schema.display()))?;

    let config = build_config(cli, &options).context("invalid generator configuration")?;
    tracing::debug!(?config, "configuration resolved");

    let output = Generator::new(config.clone())
        .run(&options)
        .await
        .context("code generation failed")?;

    for warning in &output.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    Ok(summarize(&output, &config))
}

/// Print the summary of a successful run
pub fn print_summary(summary: &GenerationSummary) {
    println!("{}", summary.display().green());
    if summary.dry_run {
        println!(
            "{}",
            "Dry run: pass --dry-run=false to write the files.".dimmed()
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nestbase_ir::load_options_from_string;
    use std::path::Path;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    const DMMF: &str = r#"{
        "generator": {
            "name": "nestbase",
            "output": { "value": "/tmp/generated/base", "fromEnvVar": null },
            "config": { "useSwagger": "false", "dryRun": "true" }
        },
        "otherGenerators": [],
        "dmmf": {
            "datamodel": {
                "enums": [{ "name": "Role", "values": [{ "name": "USER" }, { "name": "ADMIN" }] }],
                "models": [{
                    "name": "User",
                    "fields": [
                        { "name": "id", "kind": "scalar", "type": "Int", "isId": true,
                          "isRequired": true },
                        { "name": "role", "kind": "enum", "type": "Role", "isRequired": true }
                    ]
                }]
            }
        }
    }"#;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nestbase").chain(args.iter().copied())).unwrap()
    }

    fn write_schema(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("dmmf.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse(&["dmmf.json", "--dry-run=false", "--use-swagger", "-o", "out"]);
        assert_eq!(cli.schema, PathBuf::from("dmmf.json"));
        assert_eq!(cli.dry_run, Some(false));
        assert_eq!(cli.use_swagger, Some(true));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.make_index_file, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_rejects_non_boolean() {
        let result = Cli::try_parse_from(["nestbase", "dmmf.json", "--dry-run=maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_config_merges_schema_and_flags() {
        let options = load_options_from_string(DMMF).unwrap();

        let config = build_config(&parse(&["dmmf.json"]), &options).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/generated/base"));
        assert!(!config.use_swagger);
        assert!(config.dry_run);

        let cli = parse(&["dmmf.json", "--use-swagger=true", "--output", "elsewhere"]);
        let config = build_config(&cli, &options).unwrap();
        assert!(config.use_swagger);
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
    }

    #[tokio::test]
    async fn test_run_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let schema = write_schema(dir.path(), DMMF);
        let out = dir.path().join("base");

        let cli = parse(&[schema.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let summary = run(&cli).await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.entity_files, 1);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_run_writes_files() {
        let dir = tempdir().unwrap();
        let schema = write_schema(dir.path(), DMMF);
        let out = dir.path().join("base");

        let cli = parse(&[
            schema.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--dry-run=false",
        ]);
        let summary = run(&cli).await.unwrap();

        let written = WalkDir::new(&out)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .count();
        assert_eq!(written, summary.total_files);
        assert!(out.join("user/UserBase.ts").is_file());
        assert!(out.join("enums/Role.ts").is_file());
    }

    #[tokio::test]
    async fn test_run_reports_missing_schema() {
        let dir = tempdir().unwrap();
        let cli = parse(&[dir.path().join("missing.json").to_str().unwrap()]);
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));
    }
}
