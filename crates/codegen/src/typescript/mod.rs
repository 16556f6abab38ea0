//! # TypeScript Generators
//!
//! Converters producing the NestJS sources, one submodule per artifact kind,
//! plus the small rendering helpers they share (import collection,
//! decorators, doc comments).
//!
//! Every converter is a pure function of its descriptor and the
//! [`GenerationContext`]; rendering the same input twice yields identical
//! text.

pub mod dtos;
pub mod entities;
pub mod enums;
pub mod index;
pub mod services;

use nestbase_core::EngineResult;
use nestbase_ir::MARKER_PREFIX;
use std::collections::{BTreeMap, BTreeSet};

use crate::GeneratedFile;
use crate::context::GenerationContext;

/// Indentation unit of generated sources
pub const INDENT: &str = "    ";

/// Module providing the OpenAPI decorators
pub const SWAGGER_MODULE: &str = "@nestjs/swagger";

/// Module providing the validation decorators
pub const VALIDATOR_MODULE: &str = "class-validator";

/// Module providing `@Type`
pub const TRANSFORMER_MODULE: &str = "class-transformer";

// ============================================================================
// Project generation
// ============================================================================

/// Render every artifact of the data model.
///
/// Order: enums, then per model the entity, create-DTO, service and (when
/// enabled) index file, then the enum index. The first error aborts the
/// whole conversion.
pub fn generate_typescript_project(ctx: &GenerationContext) -> EngineResult<Vec<GeneratedFile>> {
    let mut files = enums::generate_enums(ctx)?;

    for info in ctx.model_infos()? {
        files.push(entities::generate_entity(&info)?);
        files.push(dtos::generate_create_dto(&info)?);
        files.push(services::generate_service(&info)?);
        if ctx.make_index_file() {
            files.push(index::generate_model_index(&info));
        }
    }

    if ctx.make_index_file() && !ctx.enums().is_empty() {
        files.push(index::generate_enum_index(ctx)?);
    }

    Ok(files)
}

// ============================================================================
// Imports
// ============================================================================

/// Named imports of one file, grouped by module and sorted
#[derive(Debug, Default, Clone)]
pub struct Imports {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: impl Into<String>, name: impl Into<String>) {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(name.into());
    }

    /// Import the decorator named by a rendered call such as `IsEnum(Role)`
    pub fn add_decorator(&mut self, module: &str, call: &str) {
        let name = call.split('(').next().unwrap_or(call);
        self.add(module, name);
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Package imports first, then relative ones; each group sorted
    pub fn render(&self) -> String {
        let (relative, packages): (Vec<_>, Vec<_>) = self
            .modules
            .iter()
            .partition(|(module, _)| module.starts_with('.'));

        let mut out = String::new();
        for (module, names) in packages.into_iter().chain(relative) {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            out.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                names.join(", "),
                module
            ));
        }
        out
    }
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// `@Name()` or `@Name({ a, b })`
pub fn decorator(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("@{}()", name)
    } else {
        format!("@{}({{ {} }})", name, args.join(", "))
    }
}

/// Documentation text with system markers removed
pub fn clean_documentation(doc: Option<&str>) -> Option<String> {
    let doc = doc?;
    let lines: Vec<String> = doc
        .lines()
        .map(|line| {
            line.split_whitespace()
                .filter(|token| !token.starts_with(MARKER_PREFIX))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// JSDoc block at the given indentation
pub fn doc_comment(doc: &str, indent: &str) -> String {
    let mut out = format!("{}/**\n", indent);
    for line in doc.lines() {
        out.push_str(&format!("{} * {}\n", indent, line));
    }
    out.push_str(&format!("{} */\n", indent));
    out
}

/// One class property with its decorators, indented one level
pub fn property(
    name: &str,
    ts_type: &str,
    optional: bool,
    decorators: &[String],
    doc: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(doc) = clean_documentation(doc) {
        out.push_str(&doc_comment(&doc, INDENT));
    }
    for d in decorators {
        out.push_str(INDENT);
        out.push_str(d);
        out.push('\n');
    }
    let marker = if optional { "?" } else { "" };
    out.push_str(&format!("{}{}{}: {};\n", INDENT, name, marker, ts_type));
    out
}

/// Render a class body from rendered properties, separated by blank lines
pub fn class_block(header: &str, statics: &[String], properties: &[String]) -> String {
    let mut out = format!("{} {{\n", header);
    for s in statics {
        out.push_str(INDENT);
        out.push_str(s);
        out.push('\n');
    }
    if !statics.is_empty() && !properties.is_empty() {
        out.push('\n');
    }
    out.push_str(&properties.join("\n"));
    out.push_str("}\n");
    out
}

/// `"a", "b"`
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| format!("\"{}\"", s.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
