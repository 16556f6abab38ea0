//! # Generator Driver
//!
//! The `Generator` is the top-level entry point for code generation. It takes
//! the [`GeneratorOptions`] handed over by the schema toolchain and a
//! [`GeneratorConfig`], builds a [`GenerationContext`], runs every converter
//! and, unless `dry_run` is set, hands the result to the [`FsWriter`].
//!
//! ## Pipeline
//!
//! ```text
//! GeneratorOptions + GeneratorConfig
//!         │
//!         ▼
//!   Datamodel::validate()
//!         │
//!         ▼
//!   GenerationContext::from_options()   (NameValues, client paths)
//!         │
//!         ├──► enums      → enums/<Name>.ts
//!         ├──► entities   → <camel>/<Pascal>Base.ts
//!         ├──► dtos       → <camel>/dtos/Create-<Pascal>.dto.ts
//!         ├──► services   → <camel>/<camel>Base.service.ts
//!         ├──► index      → index.ts barrels
//!         ▼
//!   GeneratedOutput { files, warnings }
//!         │
//!         ▼
//!   FsWriter::write_all()               (skipped on dry run)
//! ```
//!
//! Everything is converted before anything is written. The first structural
//! error aborts the run, so a failed run never leaves a partial tree behind.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nestbase_codegen::{Generator, GeneratorConfig};
//! use nestbase_ir::load_options;
//!
//! let options = load_options("dmmf.json")?;
//! let config = GeneratorConfig::from_options(&options)?.with_dry_run(false);
//!
//! let output = Generator::new(config).run(&options).await?;
//! println!("Generated {} files", output.file_count());
//! ```

use nestbase_core::{EngineResult, Validatable};
use nestbase_ir::GeneratorOptions;
use std::path::PathBuf;

use crate::context::GenerationContext;
use crate::typescript;
use crate::writer::FsWriter;
use crate::{ArtifactKind, GeneratedOutput, GeneratorConfig};

// ============================================================================
// Generator
// ============================================================================

/// Top-level code generator that orchestrates the full generation pipeline.
///
/// The `Generator` is stateless aside from its configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    // ====================================================================
    // Generation
    // ====================================================================

    /// Convert the data model into TypeScript artifacts without touching the
    /// file system.
    ///
    /// # Errors
    ///
    /// Returns the first structural error (dangling key, relation or enum
    /// reference), an invalid name, or a configuration error while resolving
    /// the client paths.
    pub fn generate(&self, options: &GeneratorOptions) -> EngineResult<GeneratedOutput> {
        let datamodel = options.datamodel();
        datamodel.validate()?;

        let ctx = GenerationContext::from_options(options, self.config.clone())?;

        tracing::debug!(
            enums = ctx.enums().len(),
            models = ctx.model_count(),
            client = ctx.client_import_path().unwrap_or_default(),
            "generation context ready",
        );

        let mut output = GeneratedOutput::new();
        for file in typescript::generate_typescript_project(&ctx)? {
            output.add_file(file.with_disclaimer());
        }

        if datamodel.is_empty() {
            output.add_warning("The data model declares no enums or models; nothing was generated.");
        }
        for model in ctx.models() {
            if model.key()?.is_none() {
                output.add_warning(format!(
                    "Model '{}' has no primary key; its service only provides create and findMany.",
                    model.name
                ));
            }
        }

        tracing::info!(
            files = output.file_count(),
            warnings = output.warnings.len(),
            output_dir = %self.config.output_dir.display(),
            "code generation complete",
        );

        Ok(output)
    }

    /// Generate and, unless the configuration asks for a dry run, write every
    /// artifact below the output directory.
    pub async fn run(&self, options: &GeneratorOptions) -> EngineResult<GeneratedOutput> {
        let output = self.generate(options)?;

        if self.config.dry_run {
            tracing::info!(files = output.file_count(), "dry run: no files written");
            return Ok(output);
        }

        let written = FsWriter::new(&self.config.output_dir)
            .write_all(&output)
            .await?;
        tracing::info!(
            output_dir = %self.config.output_dir.display(),
            files = written.len(),
            "files written to disk",
        );

        Ok(output)
    }
}

// ============================================================================
// Standalone convenience function
// ============================================================================

/// Generate artifacts using the configuration found in the options.
pub fn generate(options: &GeneratorOptions) -> EngineResult<GeneratedOutput> {
    Generator::new(GeneratorConfig::from_options(options)?).generate(options)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// A human-readable summary of a completed generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub output_dir: PathBuf,
    /// Whether files were only computed
    pub dry_run: bool,
    pub total_files: usize,
    pub enum_files: usize,
    pub entity_files: usize,
    pub dto_files: usize,
    pub service_files: usize,
    pub index_files: usize,
    pub warning_count: usize,
    /// Total bytes of generated content.
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary from a generated output.
    pub fn from_output(output: &GeneratedOutput, config: &GeneratorConfig) -> Self {
        let count = |kind| output.files_by_kind(kind).len();

        Self {
            output_dir: config.output_dir.clone(),
            dry_run: config.dry_run,
            total_files: output.file_count(),
            enum_files: count(ArtifactKind::Enum),
            entity_files: count(ArtifactKind::Entity),
            dto_files: count(ArtifactKind::CreateDto),
            service_files: count(ArtifactKind::Service),
            index_files: count(ArtifactKind::Index),
            warning_count: output.warnings.len(),
            total_bytes: output.total_bytes(),
        }
    }

    /// Format the summary as a human-readable string.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(640);

        let title = if self.dry_run {
            "Dry Run Complete (nothing written)"
        } else {
            "Code Generation Complete"
        };

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str(&format!("║  {:<48}║\n", title));
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!(
            "║  Output:      {:<35}║\n",
            self.output_dir.display().to_string()
        ));
        out.push_str(&format!("║  Total Files: {:<35}║\n", self.total_files));
        out.push_str(&format!("║    Enums:     {:<35}║\n", self.enum_files));
        out.push_str(&format!("║    Entities:  {:<35}║\n", self.entity_files));
        out.push_str(&format!("║    DTOs:      {:<35}║\n", self.dto_files));
        out.push_str(&format!("║    Services:  {:<35}║\n", self.service_files));
        out.push_str(&format!("║    Indexes:   {:<35}║\n", self.index_files));
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));

        let size_str = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        };
        out.push_str(&format!("║  Total Size:  {:<35}║\n", size_str));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Produce a [`GenerationSummary`] from a [`GeneratedOutput`].
pub fn summarize(output: &GeneratedOutput, config: &GeneratorConfig) -> GenerationSummary {
    GenerationSummary::from_output(output, config)
}

// ============================================================================
// Tests
// ============================================================================
