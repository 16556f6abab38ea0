//! # Enum Converter
//!
//! Renders each schema enum as a string-valued TypeScript enum at
//! `enums/<Name>.ts`. Values keep their declaration order.

use nestbase_core::{EngineError, EngineResult};
use nestbase_ir::EnumDescriptor;

use super::{INDENT, clean_documentation, doc_comment};
use crate::context::{ENUM_DIR, GenerationContext};
use crate::naming::NameValues;
use crate::{ArtifactKind, GeneratedFile};

/// Generate one file per enum, in declaration order
pub fn generate_enums(ctx: &GenerationContext) -> EngineResult<Vec<GeneratedFile>> {
    ctx.enums()
        .iter()
        .map(|e| {
            ctx.enum_names(&e.name)
                .map(|names| generate_enum(e, names))
                .ok_or_else(|| {
                    EngineError::internal(format!("no names computed for enum '{}'", e.name))
                })
        })
        .collect()
}

/// Render one enum declaration
pub fn generate_enum(info: &EnumDescriptor, names: &NameValues) -> GeneratedFile {
    let mut content = String::with_capacity(64 + info.values.len() * 32);

    if let Some(doc) = clean_documentation(info.documentation.as_deref()) {
        content.push_str(&doc_comment(&doc, ""));
    }

    content.push_str(&format!("export enum {} {{\n", names.pascal));
    for value in &info.values {
        content.push_str(&format!("{}{} = \"{}\",\n", INDENT, value, value));
    }
    content.push_str("}\n");

    GeneratedFile::new(
        format!("{}/{}.ts", ENUM_DIR, names.pascal),
        content,
        ArtifactKind::Enum,
    )
}
