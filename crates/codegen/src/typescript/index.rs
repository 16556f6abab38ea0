//! # Index Converter
//!
//! Barrel files, emitted when `makeIndexFile` is enabled:
//!
//! - `enums/index.ts` re-exports every enum
//! - `<camel>/index.ts` re-exports the entity, service and create-DTO of a
//!   model
//!
//! Export lines are sorted so the output does not depend on declaration order.

use nestbase_core::{EngineError, EngineResult};

use crate::context::{ENUM_DIR, GenerationContext, ModelInfo};
use crate::{ArtifactKind, GeneratedFile};

fn render_exports(mut modules: Vec<String>) -> String {
    modules.sort();
    modules.dedup();
    modules
        .iter()
        .map(|m| format!("export * from \"./{}\";\n", m))
        .collect()
}

/// `enums/index.ts`
pub fn generate_enum_index(ctx: &GenerationContext) -> EngineResult<GeneratedFile> {
    let modules = ctx
        .enums()
        .iter()
        .map(|e| {
            ctx.enum_names(&e.name)
                .map(|names| names.pascal.clone())
                .ok_or_else(|| EngineError::internal(format!("no names computed for enum '{}'", e.name)))
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(GeneratedFile::new(
        format!("{}/index.ts", ENUM_DIR),
        render_exports(modules),
        ArtifactKind::Index,
    ))
}

/// `<camel>/index.ts`
pub fn generate_model_index(info: &ModelInfo) -> GeneratedFile {
    let modules = vec![
        info.entity_module(),
        info.service_module(),
        format!("dtos/{}", info.dto_module()),
    ];

    GeneratedFile::new(info.index_path(), render_exports(modules), ArtifactKind::Index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use nestbase_ir::{Datamodel, EnumDescriptor, ModelDescriptor};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enum_index_is_sorted() {
        let dm = Datamodel::new(
            vec![
                EnumDescriptor::new("Status", ["DRAFT"]),
                EnumDescriptor::new("Role", ["USER"]),
            ],
            vec![],
        );
        let ctx = GenerationContext::new(dm, GeneratorConfig::default()).unwrap();
        let file = generate_enum_index(&ctx).unwrap();

        assert_eq!(file.display_path(), "enums/index.ts");
        assert_eq!(
            file.content,
            "export * from \"./Role\";\nexport * from \"./Status\";\n"
        );
    }

    #[test]
    fn test_model_index() {
        let dm = Datamodel::new(vec![], vec![ModelDescriptor::new("CompositeK", vec![])]);
        let ctx = GenerationContext::new(dm, GeneratorConfig::default()).unwrap();
        let info = ModelInfo::new(&ctx.models()[0], &ctx).unwrap();
        let file = generate_model_index(&info);

        assert_eq!(file.display_path(), "compositeK/index.ts");
        assert_eq!(
            file.content,
            "export * from \"./CompositeKBase\";\n\
             export * from \"./compositeKBase.service\";\n\
             export * from \"./dtos/Create-CompositeK.dto\";\n"
        );
    }
}
