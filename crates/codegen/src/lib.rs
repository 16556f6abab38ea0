//! # nestbase Codegen
//!
//! Code generation engine for nestbase.
//!
//! This crate turns the typed data model of `nestbase_ir` into TypeScript
//! sources for a NestJS backend.
//!
//! ## Features
//!
//! - **Enum Generation**: one `export enum` per schema enum
//! - **Entity Generation**: `<Model>Base` classes with OpenAPI decorators,
//!   composite key types and optional relation separation
//! - **DTO Generation**: `Create<Model>Dto` input classes with class-validator
//!   decorators, excluding system-managed fields
//! - **Service Generation**: injectable CRUD services delegating to the
//!   database client
//! - **Index Generation**: barrel files re-exporting the above
//!

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod generator;
pub mod naming;
pub mod type_map;
pub mod typescript;
pub mod writer;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{ClientPaths, GenerationContext, ModelInfo};
pub use generator::{GenerationSummary, Generator, generate, summarize};
pub use naming::NameValues;
pub use type_map::{MappedType, TypeRef, map_field};
pub use writer::FsWriter;

use nestbase_core::{EngineError, EngineResult};
use nestbase_ir::GeneratorOptions;
use std::path::PathBuf;

/// Banner placed at the top of every generated file
pub const DISCLAIMER: &str = "/**
 * This file was generated by nestbase. Do not edit it by hand:
 * changes will be overwritten the next time the generator runs.
 */";

/// Output directory used when neither the schema nor the command line sets one
pub const DEFAULT_OUTPUT: &str = "./base";

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the code generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root directory of the generated files
    pub output_dir: PathBuf,

    /// Whether to emit barrel (`index.ts`) files
    pub make_index_file: bool,

    /// Compute artifacts without writing them
    pub dry_run: bool,

    /// Whether relation fields move to a separate `<Model>BaseRelations` class
    pub separate_relation_fields: bool,

    /// Whether to emit OpenAPI (`@nestjs/swagger`) decorators
    pub use_swagger: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT),
            make_index_file: true,
            dry_run: true,
            separate_relation_fields: false,
            use_swagger: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration from the options handed over by the toolchain.
    ///
    /// Values of the generator's `config` block may be booleans or the
    /// strings `"true"` / `"false"`. The output directory comes from the
    /// generator's `output`, falling back to an `output` config key.
    pub fn from_options(options: &GeneratorOptions) -> EngineResult<Self> {
        Self::from_options_with_env(options, |var| std::env::var(var).ok())
    }

    /// Like [`from_options`](Self::from_options), with a custom environment lookup
    pub fn from_options_with_env<F>(options: &GeneratorOptions, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for (key, value) in &options.generator.config {
            config.apply(key, value)?;
        }

        if let Some(output) = &options.generator.output {
            config.output_dir = PathBuf::from(output.resolve_with("generator output", lookup)?);
        }

        Ok(config)
    }

    /// Apply one `config` entry
    pub fn apply(&mut self, key: &str, value: &serde_json::Value) -> EngineResult<()> {
        match key {
            "makeIndexFile" => self.make_index_file = parse_bool(key, value)?,
            "dryRun" => self.dry_run = parse_bool(key, value)?,
            "separateRelationFields" => self.separate_relation_fields = parse_bool(key, value)?,
            "useSwagger" => self.use_swagger = parse_bool(key, value)?,
            "output" => match value.as_str() {
                Some(dir) if !dir.trim().is_empty() => self.output_dir = PathBuf::from(dir),
                _ => {
                    return Err(EngineError::invalid_config(format!(
                        "'output' must be a non-empty path, got {}",
                        value
                    )));
                }
            },
            other => tracing::warn!(key = other, "ignoring unknown generator config key"),
        }
        Ok(())
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_swagger(mut self, use_swagger: bool) -> Self {
        self.use_swagger = use_swagger;
        self
    }

    pub fn with_separate_relation_fields(mut self, separate: bool) -> Self {
        self.separate_relation_fields = separate;
        self
    }

    pub fn with_index_files(mut self, make_index_file: bool) -> Self {
        self.make_index_file = make_index_file;
        self
    }

    /// Disable OpenAPI decorators
    pub fn without_swagger(self) -> Self {
        self.with_swagger(false)
    }

    /// Disable barrel files
    pub fn without_index_files(self) -> Self {
        self.with_index_files(false)
    }
}

fn parse_bool(key: &str, value: &serde_json::Value) -> EngineResult<bool> {
    match value {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        serde_json::Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(EngineError::invalid_config(format!(
            "'{}' must be a boolean, got {}",
            key, other
        ))),
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from the output directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// Which converter produced the file
    pub kind: ArtifactKind,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind,
        }
    }

    /// Prefix the content with the [`DISCLAIMER`] banner
    pub fn with_disclaimer(mut self) -> Self {
        self.content = format!("{}\n\n{}", DISCLAIMER, self.content);
        self
    }

    /// Path with `/` separators, as used in imports and reports
    pub fn display_path(&self) -> String {
        self.path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Kind of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Enum,
    Entity,
    CreateDto,
    Service,
    Index,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Enum => "enum",
            ArtifactKind::Entity => "entity",
            ArtifactKind::CreateDto => "create-dto",
            ArtifactKind::Service => "service",
            ArtifactKind::Index => "index",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// GeneratedOutput
// ============================================================================

/// Every artifact of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Generated files, in generation order
    pub files: Vec<GeneratedFile>,

    /// Warnings raised during generation
    pub warnings: Vec<String>,
}

impl GeneratedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the output
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get files by kind
    pub fn files_by_kind(&self, kind: ArtifactKind) -> Vec<&GeneratedFile> {
        self.files.iter().filter(|f| f.kind == kind).collect()
    }

    /// Look up a file by its `/`-separated relative path
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.display_path() == path)
    }

    /// Total size of the generated content in bytes
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
