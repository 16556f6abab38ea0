//! # Generation Context
//!
//! The `GenerationContext` holds everything the converters need to produce
//! output files. It is built once per run from the data model and the
//! generator configuration and then shared by reference:
//!
//! - Generator configuration (swagger, relation separation, index files)
//! - The data model (enums and models in declaration order)
//! - [`NameValues`] of every enum and model, computed once
//! - The resolved database client paths
//!

use nestbase_core::{EngineError, EngineResult};
use nestbase_ir::{
    Datamodel, EnumDescriptor, FieldDescriptor, GeneratorOptions, ModelDescriptor, ModelKey,
};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::GeneratorConfig;
use crate::naming::NameValues;

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed for code generation.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Generator configuration
    pub config: GeneratorConfig,

    datamodel: Datamodel,

    /// Lookup: model name → casing variants
    model_names: HashMap<String, NameValues>,

    /// Lookup: enum name → casing variants
    enum_names: HashMap<String, NameValues>,

    client_paths: Option<ClientPaths>,
}

impl GenerationContext {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build a context from a data model. Client paths stay unresolved.
    ///
    /// Fails when two models or two enums normalize to the same identifier,
    /// or when a model's directory would be the `enums` directory, since
    /// their artifacts would share paths.
    pub fn new(datamodel: Datamodel, config: GeneratorConfig) -> EngineResult<Self> {
        let model_names = compute_names("model", datamodel.models.iter().map(|m| m.name.as_str()))?;
        let enum_names = compute_names("enum", datamodel.enums.iter().map(|e| e.name.as_str()))?;

        if let Some(names) = model_names.values().find(|n| n.camel == ENUM_DIR) {
            return Err(EngineError::name_collision(
                "directory",
                &names.original,
                ENUM_DIR,
                ENUM_DIR,
            ));
        }

        Ok(Self {
            config,
            datamodel,
            model_names,
            enum_names,
            client_paths: None,
        })
    }

    /// Build a context from generator options, resolving the client paths.
    pub fn from_options(options: &GeneratorOptions, config: GeneratorConfig) -> EngineResult<Self> {
        let paths = ClientPaths::resolve(options)?;
        Ok(Self::new(options.datamodel().clone(), config)?.with_client_paths(paths))
    }

    /// Build with default generator config (convenience for tests).
    pub fn from_datamodel_default(datamodel: Datamodel) -> EngineResult<Self> {
        Self::from_options(
            &GeneratorOptions::from_datamodel(datamodel),
            GeneratorConfig::default(),
        )
    }

    pub fn with_client_paths(mut self, paths: ClientPaths) -> Self {
        self.client_paths = Some(paths);
        self
    }

    // ====================================================================
    // Data model accessors
    // ====================================================================

    pub fn datamodel(&self) -> &Datamodel {
        &self.datamodel
    }

    /// All models in declaration order
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.datamodel.models
    }

    /// All enums in declaration order
    pub fn enums(&self) -> &[EnumDescriptor] {
        &self.datamodel.enums
    }

    pub fn model_count(&self) -> usize {
        self.datamodel.models.len()
    }

    /// Casing variants of a model
    pub fn model_names(&self, name: &str) -> Option<&NameValues> {
        self.model_names.get(name)
    }

    /// Casing variants of an enum
    pub fn enum_names(&self, name: &str) -> Option<&NameValues> {
        self.enum_names.get(name)
    }

    /// Converter view of every model, in declaration order
    pub fn model_infos(&self) -> EngineResult<Vec<ModelInfo<'_>>> {
        self.models()
            .iter()
            .map(|m| ModelInfo::new(m, self))
            .collect()
    }

    // ====================================================================
    // Configuration shortcuts
    // ====================================================================

    pub fn use_swagger(&self) -> bool {
        self.config.use_swagger
    }

    pub fn separate_relation_fields(&self) -> bool {
        self.config.separate_relation_fields
    }

    pub fn make_index_file(&self) -> bool {
        self.config.make_index_file
    }

    // ====================================================================
    // Client paths
    // ====================================================================

    pub fn client_paths(&self) -> Option<&ClientPaths> {
        self.client_paths.as_ref()
    }

    /// Module specifier generated files use to import the database client
    pub fn client_import_path(&self) -> EngineResult<&str> {
        self.client_paths
            .as_ref()
            .map(|p| p.import_path.as_str())
            .ok_or_else(|| {
                EngineError::missing_config("database client import path (client paths not resolved)")
            })
    }
}

/// Directory holding the generated enums
pub const ENUM_DIR: &str = "enums";

/// Casing variants of every name, keyed by the declared name
fn compute_names<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> EngineResult<HashMap<String, NameValues>> {
    let mut computed: HashMap<String, NameValues> = HashMap::new();
    let mut by_pascal: HashMap<String, &str> = HashMap::new();
    let mut by_camel: HashMap<String, &str> = HashMap::new();

    for name in names {
        let values = NameValues::new(name)?;

        if computed.contains_key(name) {
            return Err(EngineError::duplicate_name(kind, name));
        }
        if let Some(previous) = by_pascal.insert(values.pascal.clone(), name) {
            return Err(EngineError::name_collision(kind, previous, name, &values.pascal));
        }
        if let Some(previous) = by_camel.insert(values.camel.clone(), name) {
            return Err(EngineError::name_collision(kind, previous, name, &values.camel));
        }

        computed.insert(name.to_string(), values);
    }

    Ok(computed)
}

// ============================================================================
// ModelInfo – convenience wrapper for converters
// ============================================================================

/// Bundles a model with its casing variants and the names every artifact of
/// the model uses to refer to the others.
#[derive(Debug, Clone, Copy)]
pub struct ModelInfo<'a> {
    pub model: &'a ModelDescriptor,
    pub names: &'a NameValues,
    pub ctx: &'a GenerationContext,
}

impl<'a> ModelInfo<'a> {
    pub fn new(model: &'a ModelDescriptor, ctx: &'a GenerationContext) -> EngineResult<Self> {
        let names = ctx.model_names(&model.name).ok_or_else(|| {
            EngineError::internal(format!("no names computed for model '{}'", model.name))
        })?;
        Ok(Self { model, names, ctx })
    }

    pub fn name(&self) -> &'a str {
        &self.model.name
    }

    /// Directory of the model's artifacts (`compositeK`)
    pub fn dir(&self) -> &'a str {
        &self.names.camel
    }

    /// `CompositeKBase`
    pub fn entity_class(&self) -> String {
        format!("{}Base", self.names.pascal)
    }

    /// `CompositeKBaseRelations`
    pub fn relations_class(&self) -> String {
        format!("{}BaseRelations", self.names.pascal)
    }

    /// `CompositeKBaseWithRelations`
    pub fn with_relations_type(&self) -> String {
        format!("{}BaseWithRelations", self.names.pascal)
    }

    /// `CompositeKKey`
    pub fn key_type(&self) -> String {
        format!("{}Key", self.names.pascal)
    }

    /// `CreateCompositeKDto`
    pub fn create_dto_class(&self) -> String {
        format!("Create{}Dto", self.names.pascal)
    }

    /// `CompositeKBaseService`
    pub fn service_class(&self) -> String {
        format!("{}BaseService", self.names.pascal)
    }

    /// Property of the database client exposing this model (`compositeK`).
    ///
    /// The client lowercases only the first character of the model name.
    pub fn client_delegate(&self) -> String {
        let mut chars = self.model.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    // ── file locations (relative to the output directory) ──────────────

    pub fn entity_module(&self) -> String {
        format!("{}Base", self.names.pascal)
    }

    pub fn dto_module(&self) -> String {
        format!("Create-{}.dto", self.names.pascal)
    }

    pub fn service_module(&self) -> String {
        format!("{}Base.service", self.names.camel)
    }

    pub fn entity_path(&self) -> String {
        format!("{}/{}.ts", self.dir(), self.entity_module())
    }

    pub fn dto_path(&self) -> String {
        format!("{}/dtos/{}.ts", self.dir(), self.dto_module())
    }

    pub fn service_path(&self) -> String {
        format!("{}/{}.ts", self.dir(), self.service_module())
    }

    pub fn index_path(&self) -> String {
        format!("{}/index.ts", self.dir())
    }

    // ── fields ─────────────────────────────────────────────────────────

    /// Resolved primary key
    pub fn key(&self) -> EngineResult<Option<ModelKey<'a>>> {
        self.model.key()
    }

    /// Fields callers supply on creation: everything except system-managed
    /// and relation fields
    pub fn create_fields(&self) -> Vec<&'a FieldDescriptor> {
        self.model
            .fields
            .iter()
            .filter(|f| !f.is_relation() && !f.is_system_managed())
            .collect()
    }

    pub fn relation_fields(&self) -> Vec<&'a FieldDescriptor> {
        self.model.relation_fields().collect()
    }
}

// ============================================================================
// ClientPaths
// ============================================================================

const SCHEMA_SUFFIX: &str = "prisma/schema.prisma";
const DEFAULT_CLIENT_DIR: &str = "node_modules/@prisma/client";

/// Where the generated database client lives and how to import it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPaths {
    /// Project root
    pub root: PathBuf,
    /// Directory of the generated client
    pub client: PathBuf,
    /// Module specifier used in `import` statements
    pub import_path: String,
}

impl ClientPaths {
    /// Resolve the client location from the generator options.
    ///
    /// The project root is the schema path with a trailing
    /// `prisma/schema.prisma` removed (else the schema's directory). The
    /// client is the output of the `prisma-client-js` generator, defaulting
    /// to `<root>/node_modules/@prisma/client`.
    pub fn resolve(options: &GeneratorOptions) -> EngineResult<Self> {
        let root = options
            .schema_path
            .as_deref()
            .map(project_root)
            .unwrap_or_else(|| PathBuf::from("."));

        let client = match options
            .client_generator()
            .and_then(|g| g.output.as_ref())
        {
            Some(output) => PathBuf::from(output.resolve("database client output")?),
            None => root.join(DEFAULT_CLIENT_DIR),
        };

        Self::from_paths(root, client)
    }

    /// Compute the import path for an explicit root and client directory
    pub fn from_paths(root: impl Into<PathBuf>, client: impl Into<PathBuf>) -> EngineResult<Self> {
        let root = root.into();
        let client = client.into();

        let relative = relative_path(&root, &client)?;
        let import_path = relative.replacen("node_modules/", "", 1);

        Ok(Self {
            root,
            client,
            import_path,
        })
    }
}

fn project_root(schema_path: &Path) -> PathBuf {
    let root = if schema_path.ends_with(SCHEMA_SUFFIX) {
        schema_path.parent().and_then(Path::parent)
    } else {
        schema_path.parent()
    };

    match root {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Lexically compute `to` relative to `from`, joined with `/`.
fn relative_path(from: &Path, to: &Path) -> EngineResult<String> {
    let (from, to) = if from.is_absolute() == to.is_absolute() {
        (from.to_path_buf(), to.to_path_buf())
    } else {
        (std::path::absolute(from)?, std::path::absolute(to)?)
    };

    let from = normalize(&from);
    let to = normalize(&to);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());

    if parts.is_empty() {
        return Ok(".".to_string());
    }
    Ok(parts.join("/"))
}

fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => {
                parts.push(component.as_os_str().to_string_lossy().into_owned())
            }
        }
    }
    parts
}

// ============================================================================
// Tests
// ============================================================================
