//! # Dto Converter
//!
//! Generates `Create<Model>Dto` at `<camel>/dtos/Create-<Pascal>.dto.ts`.
//!
//! The DTO is the flat input contract for creating a row:
//!
//! - system-managed fields (timestamps, generated ids, read-only columns) are
//!   left out
//! - relation fields are left out; their foreign-key scalars are ordinary
//!   fields of the model and stay in
//! - fields that are nullable or have a schema default become optional
//!
//! class-validator decorators are always emitted. OpenAPI decorators follow
//! the `useSwagger` option.

use nestbase_core::EngineResult;
use nestbase_ir::FieldDescriptor;

use super::{
    Imports, SWAGGER_MODULE, TRANSFORMER_MODULE, VALIDATOR_MODULE, class_block, decorator,
    property,
};
use crate::context::ModelInfo;
use crate::type_map::{MappedType, TypeRef, map_field};
use crate::{ArtifactKind, GeneratedFile};

/// Render the create-DTO of a model
pub fn generate_create_dto(info: &ModelInfo) -> EngineResult<GeneratedFile> {
    let ctx = info.ctx;
    let mut imports = Imports::new();
    let mut properties = Vec::new();

    for field in info.create_fields() {
        let ty = map_field(field, &info.model.name, ctx)?;

        match ty.reference {
            TypeRef::Enum(names) => {
                imports.add(format!("../../enums/{}", names.pascal), &names.pascal)
            }
            TypeRef::Scalar(_) if ty.needs_prisma_namespace() => {
                imports.add(ctx.client_import_path()?, "Prisma")
            }
            _ => {}
        }

        properties.push(render_field(field, &ty, ctx.use_swagger(), &mut imports));
    }

    let mut content = String::with_capacity(1024);
    if !imports.is_empty() {
        content.push_str(&imports.render());
        content.push('\n');
    }
    content.push_str(&class_block(
        &format!("export class {}", info.create_dto_class()),
        &[],
        &properties,
    ));

    Ok(GeneratedFile::new(
        info.dto_path(),
        content,
        ArtifactKind::CreateDto,
    ))
}

/// Whether callers may omit the field when creating a row
fn is_optional_input(field: &FieldDescriptor) -> bool {
    !field.required || field.has_input_default()
}

fn render_field(
    field: &FieldDescriptor,
    ty: &MappedType,
    use_swagger: bool,
    imports: &mut Imports,
) -> String {
    let optional = is_optional_input(field);
    let mut decorators = Vec::new();

    if use_swagger {
        let name = if optional {
            "ApiPropertyOptional"
        } else {
            "ApiProperty"
        };
        imports.add(SWAGGER_MODULE, name);
        decorators.push(decorator(name, &ty.swagger_args()));
    }

    if optional {
        imports.add(VALIDATOR_MODULE, "IsOptional");
        decorators.push("@IsOptional()".to_string());
    }

    for call in ty.validators() {
        let module = if call.starts_with("Type(") {
            TRANSFORMER_MODULE
        } else {
            VALIDATOR_MODULE
        };
        imports.add_decorator(module, &call);
        decorators.push(format!("@{}", call));
    }

    property(
        &field.name,
        &ty.ts_type(),
        optional,
        &decorators,
        field.documentation.as_deref(),
    )
}

// ============================================================================
// Tests
// ============================================================================
