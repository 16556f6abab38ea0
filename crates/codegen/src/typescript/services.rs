//! # Service Converter
//!
//! Generates `<Pascal>BaseService` at `<camel>/<camel>Base.service.ts`: an
//! injectable NestJS service delegating CRUD operations to the model's
//! property on the database client.
//!
//! Key-based operations (`findOne`, `update`, `remove`) take the model's key
//! type. A composite key is passed through the client's compound selector
//! (`where: { firstId_secondId: key }`). Models without a primary key only
//! get `create` and `findMany`.

use nestbase_core::EngineResult;
use nestbase_ir::ModelKey;

use super::Imports;
use crate::context::ModelInfo;
use crate::{ArtifactKind, GeneratedFile};

/// Render the service of a model
pub fn generate_service(info: &ModelInfo) -> EngineResult<GeneratedFile> {
    let client = info.ctx.client_import_path()?;
    let key = info.key()?;

    let entity = info.entity_class();
    let dto = info.create_dto_class();
    let delegate = format!("this.prisma.{}", info.client_delegate());

    let mut imports = Imports::new();
    imports.add("@nestjs/common", "Injectable");
    imports.add(client, "PrismaClient");
    imports.add(format!("./{}", info.entity_module()), entity.as_str());
    imports.add(format!("./dtos/{}", info.dto_module()), dto.as_str());
    if key.is_some() {
        imports.add(format!("./{}", info.entity_module()), info.key_type());
    }

    let mut methods = Vec::new();

    methods.push(format!(
        "    async create(data: {dto}): Promise<{entity}> {{\n        return {delegate}.create({{ data }});\n    }}\n"
    ));

    if let Some(key) = &key {
        let key_type = info.key_type();
        let selector = where_clause(key);

        methods.push(format!(
            "    async findOne(key: {key_type}): Promise<{entity} | null> {{\n        return {delegate}.findUnique({{ where: {selector} }});\n    }}\n"
        ));
        methods.push(findmany(&entity, &delegate));
        methods.push(format!(
            "    async update(key: {key_type}, data: Partial<{dto}>): Promise<{entity}> {{\n        return {delegate}.update({{ where: {selector}, data }});\n    }}\n"
        ));
        methods.push(format!(
            "    async remove(key: {key_type}): Promise<{entity}> {{\n        return {delegate}.delete({{ where: {selector} }});\n    }}\n"
        ));
    } else {
        methods.push(findmany(&entity, &delegate));
    }

    let mut content = String::with_capacity(2048);
    content.push_str(&imports.render());
    content.push('\n');
    content.push_str("@Injectable()\n");
    content.push_str(&format!("export class {} {{\n", info.service_class()));
    content.push_str("    constructor(protected readonly prisma: PrismaClient) {}\n\n");
    content.push_str(&methods.join("\n"));
    content.push_str("}\n");

    Ok(GeneratedFile::new(
        info.service_path(),
        content,
        ArtifactKind::Service,
    ))
}

fn findmany(entity: &str, delegate: &str) -> String {
    format!(
        "    async findMany(params: {{ skip?: number; take?: number }} = {{}}): Promise<{entity}[]> {{\n        return {delegate}.findMany(params);\n    }}\n"
    )
}

/// The `where` argument selecting one row by key
fn where_clause(key: &ModelKey) -> String {
    match key {
        ModelKey::Single(_) => "key".to_string(),
        ModelKey::Composite { selector, .. } => format!("{{ {}: key }}", selector),
    }
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
    use nestbase_ir::{Datamodel, FieldDescriptor, GeneratorOptions, ModelDescriptor, PrimaryKey};
    use pretty_assertions::assert_eq;

    fn composite_k() -> ModelDescriptor {
        ModelDescriptor::new(
            "CompositeK",
            vec![
                FieldDescriptor::scalar("firstId", ScalarType::Int),
                FieldDescriptor::scalar("secondId", ScalarType::Int),
            ],
        )
        .with_primary_key(PrimaryKey::new(["firstId", "secondId"]))
    }

    fn render(model: ModelDescriptor) -> GeneratedFile {
        let dm = Datamodel::new(vec![], vec![model]);
        let ctx = GenerationContext::from_options(
            &GeneratorOptions::from_datamodel(dm),
            GeneratorConfig::default(),
        )
        .unwrap();
        let info = ModelInfo::new(&ctx.models()[0], &ctx).unwrap();
        generate_service(&info).unwrap()
    }

    #[test]
    fn test_composite_key_service() {
        let file = render(composite_k());
        assert_eq!(file.display_path(), "compositeK/compositeKBase.service.ts");

        let c = &file.content;
        assert!(c.starts_with(
            "import { Injectable } from \"@nestjs/common\";\n\
             import { PrismaClient } from \"@prisma/client\";\n\
             import { CompositeKBase, CompositeKKey } from \"./CompositeKBase\";\n\
             import { CreateCompositeKDto } from \"./dtos/Create-CompositeK.dto\";\n\n"
        ));
        assert!(c.contains("@Injectable()\nexport class CompositeKBaseService {\n"));
        assert!(c.contains("constructor(protected readonly prisma: PrismaClient) {}"));
        assert!(c.contains(
            "async create(data: CreateCompositeKDto): Promise<CompositeKBase> {\n        return this.prisma.compositeK.create({ data });"
        ));
        assert!(c.contains(
            "async findOne(key: CompositeKKey): Promise<CompositeKBase | null> {\n        return this.prisma.compositeK.findUnique({ where: { firstId_secondId: key } });"
        ));
        assert!(c.contains("this.prisma.compositeK.update({ where: { firstId_secondId: key }, data });"));
        assert!(c.contains("this.prisma.compositeK.delete({ where: { firstId_secondId: key } });"));
        assert!(c.contains("Promise<CompositeKBase[]>"));
    }

    #[test]
    fn test_named_compound_selector() {
        let mut pk = PrimaryKey::new(["firstId", "secondId"]);
        pk.name = Some("pair".into());
        let file = render(composite_k().with_primary_key(pk));
        assert!(file.content.contains("findUnique({ where: { pair: key } })"));
    }

    #[test]
    fn test_single_key_service() {
        let model = ModelDescriptor::new(
            "User",
            vec![FieldDescriptor::scalar("id", ScalarType::Int).id()],
        );
        let c = render(model).content;
        assert!(c.contains("async findOne(key: UserKey): Promise<UserBase | null>"));
        assert!(c.contains("this.prisma.user.findUnique({ where: key });"));
        assert!(c.contains("async remove(key: UserKey): Promise<UserBase>"));
    }

    #[test]
    fn test_model_without_key_has_create_and_find_many_only() {
        let model = ModelDescriptor::new(
            "AuditLog",
            vec![FieldDescriptor::scalar("message", ScalarType::String)],
        );
        let c = render(model).content;
        assert!(c.contains("async create("));
        assert!(c.contains("async findMany("));
        assert!(!c.contains("findOne"));
        assert!(!c.contains("update("));
        assert!(!c.contains("remove("));
        assert!(!c.contains("AuditLogKey"));
    }

    #[test]
    fn test_client_delegate_keeps_acronyms() {
        let model = ModelDescriptor::new(
            "HTTPLog",
            vec![FieldDescriptor::scalar("id", ScalarType::Int).id()],
        );
        let file = render(model);
        assert!(file.content.contains("this.prisma.hTTPLog.create"));
        assert_eq!(file.display_path(), "httpLog/httpLogBase.service.ts");
    }

    #[test]
    fn test_missing_client_path() {
        let dm = Datamodel::new(vec![], vec![composite_k()]);
        let ctx = GenerationContext::new(dm, GeneratorConfig::default()).unwrap();
        let info = ModelInfo::new(&ctx.models()[0], &ctx).unwrap();
        let err = generate_service(&info).unwrap_err();
        assert!(matches!(err, EngineError::MissingConfig(_)));
    }
}
