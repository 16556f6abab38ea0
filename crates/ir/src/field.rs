//! Field descriptors
//!
//! This module contains `FieldDescriptor` and the types describing what a
//! field holds: a scalar, an enum value, a relation to another model or an
//! embedded composite object. Descriptors are decoded from DMMF JSON once
//! and never mutated afterwards.

use nestbase_core::{Cardinality, EngineError, ScalarType};
use serde::Deserialize;

/// Documentation marker tokens recognised on fields.
pub const MARKER_PREFIX: &str = "B$";

// ============================================================================
// FieldKind
// ============================================================================

/// What a field holds
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A scalar column
    Scalar(ScalarType),
    /// A value of the named enum
    Enum(String),
    /// A relation to another model
    Relation(RelationInfo),
    /// An embedded composite type (document databases)
    Object(String),
}

impl FieldKind {
    /// Name of the referenced type as written in the schema
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Scalar(t) => t.name(),
            FieldKind::Enum(name) | FieldKind::Object(name) => name,
            FieldKind::Relation(rel) => &rel.model,
        }
    }
}

/// Relation metadata carried by relation fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationInfo {
    /// Name of the related model
    pub model: String,
    /// Relation name shared by both sides of the relation
    pub name: String,
    /// Foreign-key fields on this model (empty on the back-reference side)
    pub from_fields: Vec<String>,
    /// Referenced fields on the related model
    pub to_fields: Vec<String>,
}

impl RelationInfo {
    /// Whether this side of the relation owns the foreign key
    pub fn owns_foreign_key(&self) -> bool {
        !self.from_fields.is_empty()
    }
}

// ============================================================================
// DefaultValue
// ============================================================================

/// Default value attached to a field
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// A default function such as `now()` or `autoincrement()`
    Function {
        name: String,
        args: Vec<serde_json::Value>,
    },
    /// A literal value (string, number, boolean, enum value or list)
    Literal(serde_json::Value),
}

impl DefaultValue {
    fn from_json(value: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = &value {
            if let Some(serde_json::Value::String(name)) = map.get("name") {
                let args = match map.get("args") {
                    Some(serde_json::Value::Array(args)) => args.clone(),
                    _ => Vec::new(),
                };
                return DefaultValue::Function {
                    name: name.clone(),
                    args,
                };
            }
        }
        DefaultValue::Literal(value)
    }

    /// Name of the default function, if this is one
    pub fn function_name(&self) -> Option<&str> {
        match self {
            DefaultValue::Function { name, .. } => Some(name),
            DefaultValue::Literal(_) => None,
        }
    }

    /// `@default(now())`
    pub fn is_now(&self) -> bool {
        self.function_name() == Some("now")
    }

    /// `@default(autoincrement())`
    pub fn is_autoincrement(&self) -> bool {
        self.function_name() == Some("autoincrement")
    }

    /// Defaults computed by the database or the client rather than the caller
    pub fn is_generator(&self) -> bool {
        matches!(
            self.function_name(),
            Some("autoincrement" | "uuid" | "cuid" | "ulid" | "nanoid" | "dbgenerated" | "sequence")
        )
    }
}

// ============================================================================
// System markers
// ============================================================================

/// Markers placed in field documentation (`/// B$CreatedAt`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMarker {
    CreatedAt,
    UpdatedAt,
    ReadOnly,
}

impl SystemMarker {
    fn parse(token: &str) -> Option<Self> {
        match token.strip_prefix(MARKER_PREFIX)? {
            "CreatedAt" => Some(SystemMarker::CreatedAt),
            "UpdatedAt" => Some(SystemMarker::UpdatedAt),
            "ReadOnly" => Some(SystemMarker::ReadOnly),
            _ => None,
        }
    }
}

// ============================================================================
// FieldDescriptor
// ============================================================================

/// A field of a model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawField")]
pub struct FieldDescriptor {
    /// Field name as declared in the schema
    pub name: String,

    /// What the field holds
    pub kind: FieldKind,

    /// Single value or list
    pub cardinality: Cardinality,

    /// Whether the field is required (not nullable)
    pub required: bool,

    /// Whether the field carries a unique constraint
    pub unique: bool,

    /// Whether the field is the single `@id` of its model
    pub is_id: bool,

    /// Whether the field is read-only for callers.
    ///
    /// Set by the `B$ReadOnly` marker or the builder. The DMMF `isReadOnly`
    /// flag is not mapped here: it marks foreign-key scalars backing a
    /// relation, which callers must still supply.
    pub read_only: bool,

    /// Whether the value is generated by the storage layer
    pub generated: bool,

    /// Whether the field is an `@updatedAt` timestamp
    pub updated_at: bool,

    /// Whether the schema declares any default for the field
    pub has_default: bool,

    /// Default value, when it could be decoded
    pub default: Option<DefaultValue>,

    /// Documentation comment attached to the field
    pub documentation: Option<String>,
}

impl FieldDescriptor {
    /// Create a required single-valued scalar field
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self::new(name, FieldKind::Scalar(scalar))
    }

    /// Create a required single-valued field of the given kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Single,
            required: true,
            unique: false,
            is_id: false,
            read_only: false,
            generated: false,
            updated_at: false,
            has_default: false,
            default: None,
            documentation: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Mark the field as a list
    pub fn list(mut self) -> Self {
        self.cardinality = Cardinality::List;
        self
    }

    /// Mark the field as the model's `@id`
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// Mark the field as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as an `@updatedAt` timestamp
    pub fn updated_at(mut self) -> Self {
        self.updated_at = true;
        self
    }

    /// Mark the field as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.has_default = true;
        self.default = Some(default);
        self
    }

    /// Set the documentation comment
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_list(&self) -> bool {
        self.cardinality.is_list()
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation(_))
    }

    /// Relation metadata, for relation fields
    pub fn relation(&self) -> Option<&RelationInfo> {
        match &self.kind {
            FieldKind::Relation(rel) => Some(rel),
            _ => None,
        }
    }

    /// Markers found in the documentation comment
    pub fn markers(&self) -> Vec<SystemMarker> {
        self.documentation
            .as_deref()
            .map(|doc| doc.split_whitespace().filter_map(SystemMarker::parse).collect())
            .unwrap_or_default()
    }

    pub fn has_marker(&self, marker: SystemMarker) -> bool {
        self.markers().contains(&marker)
    }

    /// Creation timestamp set by the storage layer
    pub fn is_created_at(&self) -> bool {
        self.has_marker(SystemMarker::CreatedAt)
            || (matches!(self.kind, FieldKind::Scalar(ScalarType::DateTime))
                && self.default.as_ref().is_some_and(DefaultValue::is_now))
    }

    /// Update timestamp maintained by the storage layer
    pub fn is_updated_at(&self) -> bool {
        self.updated_at || self.has_marker(SystemMarker::UpdatedAt)
    }

    /// Read-only for callers
    pub fn is_read_only(&self) -> bool {
        self.read_only || self.has_marker(SystemMarker::ReadOnly)
    }

    /// Value generated by the storage layer (autoincrement, generated ids)
    pub fn is_auto_generated(&self) -> bool {
        self.generated
            || self.default.as_ref().is_some_and(|d| {
                d.is_autoincrement() || (self.is_id && d.is_generator())
            })
    }

    /// Whether callers never supply this field
    pub fn is_system_managed(&self) -> bool {
        self.is_created_at() || self.is_updated_at() || self.is_read_only() || self.is_auto_generated()
    }

    /// Whether the field may be omitted on creation because the schema
    /// supplies a value
    pub fn has_input_default(&self) -> bool {
        self.has_default || self.default.is_some()
    }
}

// ============================================================================
// DMMF decoding
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    kind: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    is_list: bool,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    is_unique: bool,
    #[serde(default)]
    is_id: bool,
    #[serde(default)]
    is_generated: bool,
    #[serde(default)]
    is_updated_at: bool,
    #[serde(default)]
    has_default_value: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    documentation: Option<String>,
    #[serde(default)]
    relation_name: Option<String>,
    #[serde(default)]
    relation_from_fields: Vec<String>,
    #[serde(default)]
    relation_to_fields: Vec<String>,
}

impl TryFrom<RawField> for FieldDescriptor {
    type Error = EngineError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "scalar" => FieldKind::Scalar(ScalarType::from_name(&raw.type_name).ok_or_else(
                || {
                    EngineError::invalid_schema(format!(
                        "field '{}' has unsupported scalar type '{}'",
                        raw.name, raw.type_name
                    ))
                },
            )?),
            "enum" => FieldKind::Enum(raw.type_name),
            "object" => match raw.relation_name {
                Some(relation_name) => FieldKind::Relation(RelationInfo {
                    model: raw.type_name,
                    name: relation_name,
                    from_fields: raw.relation_from_fields,
                    to_fields: raw.relation_to_fields,
                }),
                None => FieldKind::Object(raw.type_name),
            },
            other => {
                return Err(EngineError::invalid_schema(format!(
                    "field '{}' has unrecognized kind '{}'",
                    raw.name, other
                )));
            }
        };

        let default = raw.default.map(DefaultValue::from_json);

        Ok(Self {
            name: raw.name,
            kind,
            cardinality: Cardinality::from_is_list(raw.is_list),
            required: raw.is_required,
            unique: raw.is_unique,
            is_id: raw.is_id,
            read_only: false,
            generated: raw.is_generated,
            updated_at: raw.is_updated_at,
            has_default: raw.has_default_value || default.is_some(),
            default,
            documentation: raw.documentation,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
