//! # Model Converter
//!
//! Generates the entity class of each model at `<camel>/<Pascal>Base.ts`.
//!
//! ## Generated File
//!
//! For a model `CompositeK` the file contains:
//!
//! - `export type CompositeKKey`: the primary key shape (single or composite)
//! - `export class CompositeKBase` with:
//!   - `static readonly primaryKey` listing the key fields
//!   - `static readonly uniqueIndexes` for compound unique constraints
//!   - one property per field, decorated with `@ApiProperty` when OpenAPI
//!     output is enabled
//! - with `separateRelationFields`: `CompositeKBaseRelations` holding the
//!   relation fields and `CompositeKBaseWithRelations` joining both classes
//!
//! Fields whose values the storage layer controls (timestamps, generated
//! ids, read-only columns) are marked `readOnly` in the OpenAPI metadata.

use nestbase_core::EngineResult;
use nestbase_ir::{FieldDescriptor, ModelKey};

use super::{
    Imports, SWAGGER_MODULE, class_block, clean_documentation, decorator, doc_comment, property,
    quoted_list,
};
use crate::context::ModelInfo;
use crate::type_map::{MappedType, TypeRef, map_field};
use crate::{ArtifactKind, GeneratedFile};

/// Render the entity file of a model.
///
/// Fails without output when the primary key, a unique index or a relation
/// references something missing from the data model.
pub fn generate_entity(info: &ModelInfo) -> EngineResult<GeneratedFile> {
    let ctx = info.ctx;
    let model = info.model;

    let key = info.key()?;
    for index in &model.unique_indexes {
        for name in &index.fields {
            model.require_field(name)?;
        }
    }

    let mapped = model
        .fields
        .iter()
        .map(|f| map_field(f, &model.name, ctx).map(|ty| (f, ty)))
        .collect::<EngineResult<Vec<(&FieldDescriptor, MappedType)>>>()?;

    let mut imports = Imports::new();
    let mut own = Vec::new();
    let mut relations = Vec::new();

    for (field, ty) in &mapped {
        collect_imports(&mut imports, info, ty)?;

        let rendered = render_field(field, ty, ctx.use_swagger(), &mut imports);
        if ty.is_relation() && ctx.separate_relation_fields() {
            relations.push(rendered);
        } else {
            own.push(rendered);
        }
    }

    let mut content = String::with_capacity(2048);

    if !imports.is_empty() {
        content.push_str(&imports.render());
        content.push('\n');
    }

    if let Some(key) = &key {
        content.push_str(&render_key_type(info, key, &mapped));
        content.push('\n');
    }

    if let Some(doc) = clean_documentation(model.documentation.as_deref()) {
        content.push_str(&doc_comment(&doc, ""));
    }

    let mut statics = Vec::new();
    if let Some(key) = &key {
        statics.push(format!(
            "static readonly primaryKey = [{}] as const;",
            quoted_list(&key.field_names())
        ));
    }
    if !model.unique_indexes.is_empty() {
        let indexes: Vec<String> = model
            .unique_indexes
            .iter()
            .map(|idx| format!("[{}]", quoted_list(&idx.fields)))
            .collect();
        statics.push(format!(
            "static readonly uniqueIndexes = [{}] as const;",
            indexes.join(", ")
        ));
    }

    content.push_str(&class_block(
        &format!("export class {}", info.entity_class()),
        &statics,
        &own,
    ));

    if ctx.separate_relation_fields() {
        content.push('\n');
        content.push_str(&class_block(
            &format!("export class {}", info.relations_class()),
            &[],
            &relations,
        ));
        content.push('\n');
        content.push_str(&format!(
            "export type {} = {} & {};\n",
            info.with_relations_type(),
            info.entity_class(),
            info.relations_class()
        ));
    }

    Ok(GeneratedFile::new(
        info.entity_path(),
        content,
        ArtifactKind::Entity,
    ))
}

fn collect_imports(imports: &mut Imports, info: &ModelInfo, ty: &MappedType) -> EngineResult<()> {
    match ty.reference {
        TypeRef::Enum(names) => imports.add(format!("../enums/{}", names.pascal), &names.pascal),
        // Self relations refer to the class declared in this file
        TypeRef::Entity(names) if names != info.names => imports.add(
            format!("../{}/{}Base", names.camel, names.pascal),
            &ty.base,
        ),
        TypeRef::Scalar(_) if ty.needs_prisma_namespace() => {
            imports.add(info.ctx.client_import_path()?, "Prisma")
        }
        _ => {}
    }
    Ok(())
}

fn render_field(
    field: &FieldDescriptor,
    ty: &MappedType,
    use_swagger: bool,
    imports: &mut Imports,
) -> String {
    let mut decorators = Vec::new();

    if use_swagger {
        let mut args = ty.swagger_args();
        if field.is_system_managed() {
            args.push("readOnly: true".to_string());
        }
        let name = if ty.nullable {
            "ApiPropertyOptional"
        } else {
            "ApiProperty"
        };
        imports.add(SWAGGER_MODULE, name);
        decorators.push(decorator(name, &args));
    }

    property(
        &field.name,
        &ty.ts_type(),
        ty.nullable,
        &decorators,
        field.documentation.as_deref(),
    )
}

fn render_key_type(
    info: &ModelInfo,
    key: &ModelKey,
    mapped: &[(&FieldDescriptor, MappedType)],
) -> String {
    let mut out = format!("export type {} = {{\n", info.key_type());
    for key_field in key.fields() {
        let ty = mapped
            .iter()
            .find(|(f, _)| f.name == key_field.name)
            .map(|(_, ty)| ty.ts_type())
            .unwrap_or_else(|| "unknown".to_string());
        out.push_str(&format!("    {}: {};\n", key_field.name, ty));
    }
    out.push_str("};\n");
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use crate::context::GenerationContext;
    use nestbase_core::{EngineError, ScalarType};
    use nestbase_ir::{
        Datamodel, DefaultValue, EnumDescriptor, FieldKind, ModelDescriptor, PrimaryKey,
        RelationInfo,
    };
    use pretty_assertions::assert_eq;

    fn now() -> DefaultValue {
        DefaultValue::Function {
            name: "now".into(),
            args: vec![],
        }
    }

    fn composite_k() -> ModelDescriptor {
        ModelDescriptor::new(
            "CompositeK",
            vec![
                FieldDescriptor::scalar("createdAt", ScalarType::DateTime)
                    .with_default(now())
                    .with_documentation("B$CreatedAt"),
                FieldDescriptor::scalar("updatedAt", ScalarType::DateTime)
                    .updated_at()
                    .with_documentation("B$ReadOnly"),
                FieldDescriptor::scalar("firstId", ScalarType::Int),
                FieldDescriptor::scalar("secondId", ScalarType::Int),
            ],
        )
        .with_primary_key(PrimaryKey::new(["firstId", "secondId"]))
    }

    fn relation(name: &str, model: &str, from: &[&str]) -> FieldDescriptor {
        FieldDescriptor::new(
            name,
            FieldKind::Relation(RelationInfo {
                model: model.into(),
                name: "PostToUser".into(),
                from_fields: from.iter().map(|s| s.to_string()).collect(),
                to_fields: if from.is_empty() { vec![] } else { vec!["id".into()] },
            }),
        )
    }

    fn blog() -> Datamodel {
        Datamodel::new(
            vec![EnumDescriptor::new("Role", ["USER", "ADMIN"])],
            vec![
                ModelDescriptor::new(
                    "User",
                    vec![
                        FieldDescriptor::scalar("id", ScalarType::Int).id(),
                        FieldDescriptor::new("role", FieldKind::Enum("Role".into())),
                        relation("posts", "Post", &[]).list(),
                        relation("manager", "User", &[]).optional(),
                    ],
                ),
                ModelDescriptor::new(
                    "Post",
                    vec![
                        FieldDescriptor::scalar("id", ScalarType::Int).id(),
                        FieldDescriptor::scalar("authorId", ScalarType::Int),
                        relation("author", "User", &["authorId"]),
                    ],
                ),
            ],
        )
    }

    fn render(dm: Datamodel, config: GeneratorConfig, model: &str) -> EngineResult<GeneratedFile> {
        let options = nestbase_ir::GeneratorOptions::from_datamodel(dm);
        let ctx = GenerationContext::from_options(&options, config)?;
        let m = ctx.datamodel().model(model).unwrap();
        generate_entity(&ModelInfo::new(m, &ctx)?)
    }

    fn single(model: ModelDescriptor) -> Datamodel {
        Datamodel::new(vec![], vec![model])
    }

    #[test]
    fn test_composite_key_entity() {
        let file = render(single(composite_k()), GeneratorConfig::default(), "CompositeK").unwrap();
        assert_eq!(file.display_path(), "compositeK/CompositeKBase.ts");

        let c = &file.content;
        assert!(c.contains(
            "export type CompositeKKey = {\n    firstId: number;\n    secondId: number;\n};\n"
        ));
        assert!(c.contains("static readonly primaryKey = [\"firstId\", \"secondId\"] as const;"));
        assert!(c.contains("    createdAt: Date;\n"));
        assert!(c.contains("    updatedAt: Date;\n"));
        assert!(c.contains("    firstId: number;\n"));
        assert!(c.contains("    secondId: number;\n"));
        assert!(!c.contains(" id:"), "no synthesized id field");
    }

    #[test]
    fn test_composite_key_listed_out_of_order() {
        let model = composite_k().with_primary_key(PrimaryKey::new(["secondId", "firstId"]));
        let file = render(single(model), GeneratorConfig::default(), "CompositeK").unwrap();
        assert!(file
            .content
            .contains("static readonly primaryKey = [\"firstId\", \"secondId\"] as const;"));
    }

    #[test]
    fn test_system_managed_fields_are_read_only_in_openapi() {
        let file = render(single(composite_k()), GeneratorConfig::default(), "CompositeK").unwrap();
        assert!(file.content.contains(
            "    @ApiProperty({ type: String, format: \"date-time\", readOnly: true })\n    createdAt: Date;"
        ));
        assert!(file
            .content
            .contains("    @ApiProperty({ type: Number })\n    firstId: number;"));
        assert!(file
            .content
            .starts_with("import { ApiProperty } from \"@nestjs/swagger\";\n\n"));
    }

    #[test]
    fn test_without_swagger() {
        let config = GeneratorConfig::default().without_swagger();
        let file = render(single(composite_k()), config, "CompositeK").unwrap();
        assert!(!file.content.contains("@ApiProperty"));
        assert!(!file.content.contains("import"));
    }

    #[test]
    fn test_missing_key_field_fails_without_output() {
        let model = composite_k().with_primary_key(PrimaryKey::new(["firstId", "thirdId"]));
        let err = render(single(model), GeneratorConfig::default(), "CompositeK").unwrap_err();
        assert!(matches!(
            err,
            EngineError::FieldNotFound { ref model, ref field } if model == "CompositeK" && field == "thirdId"
        ));
    }

    #[test]
    fn test_unique_indexes() {
        let model = composite_k().with_unique_index(["secondId", "createdAt"]);
        let file = render(single(model), GeneratorConfig::default(), "CompositeK").unwrap();
        assert!(file
            .content
            .contains("static readonly uniqueIndexes = [[\"secondId\", \"createdAt\"]] as const;"));

        let broken = composite_k().with_unique_index(["nope"]);
        assert!(render(single(broken), GeneratorConfig::default(), "CompositeK").is_err());
    }

    #[test]
    fn test_relations_inline() {
        let file = render(blog(), GeneratorConfig::default(), "User").unwrap();
        let c = &file.content;

        assert!(c.contains("import { PostBase } from \"../post/PostBase\";"));
        assert!(c.contains("import { Role } from \"../enums/Role\";"));
        assert!(!c.contains("../user/UserBase"), "self relation is not imported");

        assert!(c.contains(
            "    @ApiProperty({ type: () => PostBase, isArray: true })\n    posts: PostBase[];"
        ));
        assert!(c.contains("    manager?: UserBase | null;"));
        assert!(c.contains("    @ApiProperty({ enum: Role, enumName: \"Role\" })\n    role: Role;"));
        assert!(c.contains("export type UserKey = {\n    id: number;\n};"));
        assert!(!c.contains("UserBaseRelations"));
    }

    #[test]
    fn test_required_to_one_relation() {
        let file = render(blog(), GeneratorConfig::default(), "Post").unwrap();
        assert!(file.content.contains("    author: UserBase;\n"));
        assert!(file.content.contains("import { UserBase } from \"../user/UserBase\";"));
    }

    #[test]
    fn test_separate_relation_fields() {
        let config = GeneratorConfig::default().with_separate_relation_fields(true);
        let file = render(blog(), config, "User").unwrap();
        let c = &file.content;

        let base = c.find("export class UserBase {").unwrap();
        let relations = c.find("export class UserBaseRelations {").unwrap();
        let posts = c.find("posts: PostBase[];").unwrap();
        let role = c.find("role: Role;").unwrap();

        assert!(base < role && role < relations);
        assert!(relations < posts);
        assert!(c.contains("export type UserBaseWithRelations = UserBase & UserBaseRelations;"));
    }

    #[test]
    fn test_separation_never_changes_field_inclusion() {
        let inline = render(blog(), GeneratorConfig::default(), "User").unwrap();
        let separate = render(
            blog(),
            GeneratorConfig::default().with_separate_relation_fields(true),
            "User",
        )
        .unwrap();

        for field in ["id: number;", "role: Role;", "posts: PostBase[];", "manager?: UserBase | null;"] {
            assert!(inline.content.contains(field));
            assert!(separate.content.contains(field));
        }
    }

    #[test]
    fn test_model_without_key() {
        let model = ModelDescriptor::new(
            "AuditLog",
            vec![FieldDescriptor::scalar("message", ScalarType::String)],
        );
        let file = render(single(model), GeneratorConfig::default(), "AuditLog").unwrap();
        assert!(!file.content.contains("AuditLogKey"));
        assert!(!file.content.contains("primaryKey"));
        assert_eq!(file.display_path(), "auditLog/AuditLogBase.ts");
    }

    #[test]
    fn test_json_field_imports_prisma_namespace() {
        let model = ModelDescriptor::new(
            "Event",
            vec![
                FieldDescriptor::scalar("id", ScalarType::Int).id(),
                FieldDescriptor::scalar("payload", ScalarType::Json).optional(),
            ],
        );
        let file = render(single(model), GeneratorConfig::default(), "Event").unwrap();
        assert!(file.content.contains("import { Prisma } from \"@prisma/client\";"));
        assert!(file.content.contains("payload?: Prisma.JsonValue | null;"));
    }

    #[test]
    fn test_entity_is_deterministic() {
        let a = render(blog(), GeneratorConfig::default(), "User").unwrap();
        let b = render(blog(), GeneratorConfig::default(), "User").unwrap();
        assert_eq!(a, b);
    }
}
