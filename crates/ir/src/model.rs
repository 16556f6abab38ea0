//! Model descriptors
//!
//! This module contains `ModelDescriptor` together with its primary-key and
//! unique-index descriptors, and the resolution of a model's key into the
//! concrete fields it is made of.

use crate::field::FieldDescriptor;
use nestbase_core::{EngineError, EngineResult, Validatable};
use serde::Deserialize;
use std::collections::HashSet;

// ============================================================================
// Key descriptors
// ============================================================================

/// `@@id([...])` declaration of a model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrimaryKey {
    /// Explicit name given with `@@id(name: ...)`
    #[serde(default)]
    pub name: Option<String>,
    /// Field names, in the order they are listed
    pub fields: Vec<String>,
}

impl PrimaryKey {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// `@@unique([...])` declaration of a model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UniqueIndex {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

/// The resolved primary key of a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKey<'a> {
    /// A single `@id` field (or a one-field `@@id`)
    Single(&'a FieldDescriptor),
    /// A compound key over several fields
    Composite {
        /// Compound selector name used by the generated client
        selector: String,
        /// Key fields in model declaration order
        fields: Vec<&'a FieldDescriptor>,
    },
}

impl<'a> ModelKey<'a> {
    /// Key fields, in the order they are rendered
    pub fn fields(&self) -> Vec<&'a FieldDescriptor> {
        match self {
            ModelKey::Single(field) => vec![*field],
            ModelKey::Composite { fields, .. } => fields.clone(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, ModelKey::Composite { .. })
    }

    /// Names of the key fields, in rendering order
    pub fn field_names(&self) -> Vec<&'a str> {
        self.fields().into_iter().map(|f| f.name.as_str()).collect()
    }
}

// ============================================================================
// ModelDescriptor
// ============================================================================

/// A model declared in the data model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct ModelDescriptor {
    /// Model name as declared in the schema (PascalCase by convention)
    pub name: String,

    /// Database table name, when mapped with `@@map`
    pub db_name: Option<String>,

    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,

    /// Compound primary key, if declared with `@@id`
    pub primary_key: Option<PrimaryKey>,

    /// Compound unique constraints
    pub unique_indexes: Vec<UniqueIndex>,

    /// Documentation comment attached to the model
    pub documentation: Option<String>,
}

impl ModelDescriptor {
    /// Create a model with the given name and fields
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            db_name: None,
            fields,
            primary_key: None,
            unique_indexes: Vec::new(),
            documentation: None,
        }
    }

    /// Set a compound primary key
    pub fn with_primary_key(mut self, key: PrimaryKey) -> Self {
        self.primary_key = Some(key);
        self
    }

    /// Add a compound unique constraint
    pub fn with_unique_index<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_indexes.push(UniqueIndex {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a field by name, failing with a structural error naming this model
    pub fn require_field(&self, name: &str) -> EngineResult<&FieldDescriptor> {
        self.field(name)
            .ok_or_else(|| EngineError::field_not_found(&self.name, name))
    }

    /// Relation fields in declaration order
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    /// Resolve the primary key.
    ///
    /// A `@@id` with more than one field yields a composite key whose fields
    /// follow the model's declaration order; the compound selector keeps the
    /// listed order, which is what the generated client expects. Without a
    /// `@@id` the `@id` field is used. Models with neither have no key.
    pub fn key(&self) -> EngineResult<Option<ModelKey<'_>>> {
        if let Some(pk) = self.primary_key.as_ref().filter(|pk| !pk.fields.is_empty()) {
            for name in &pk.fields {
                self.require_field(name)?;
            }

            if pk.fields.len() == 1 {
                return Ok(Some(ModelKey::Single(self.require_field(&pk.fields[0])?)));
            }

            let fields = self
                .fields
                .iter()
                .filter(|f| pk.fields.contains(&f.name))
                .collect();
            let selector = pk.name.clone().unwrap_or_else(|| pk.fields.join("_"));

            return Ok(Some(ModelKey::Composite { selector, fields }));
        }

        Ok(self.fields.iter().find(|f| f.is_id).map(ModelKey::Single))
    }
}

impl Validatable for ModelDescriptor {
    fn validate(&self) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(EngineError::duplicate_name(
                    "field",
                    format!("{}.{}", self.name, field.name),
                ));
            }
        }

        self.key()?;

        for index in &self.unique_indexes {
            for name in &index.fields {
                self.require_field(name)?;
            }
        }

        for field in self.relation_fields() {
            if let Some(rel) = field.relation() {
                for name in &rel.from_fields {
                    self.require_field(name)?;
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// DMMF decoding
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    name: String,
    #[serde(default)]
    db_name: Option<String>,
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    primary_key: Option<PrimaryKey>,
    #[serde(default)]
    unique_indexes: Vec<UniqueIndex>,
    // Older DMMF documents only carry the field lists
    #[serde(default)]
    unique_fields: Vec<Vec<String>>,
    #[serde(default)]
    documentation: Option<String>,
}

impl TryFrom<RawModel> for ModelDescriptor {
    type Error = EngineError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        let mut unique_indexes = raw.unique_indexes;
        for fields in raw.unique_fields {
            if !unique_indexes.iter().any(|idx| idx.fields == fields) {
                unique_indexes.push(UniqueIndex { name: None, fields });
            }
        }

        Ok(Self {
            name: raw.name,
            db_name: raw.db_name,
            fields: raw.fields,
            primary_key: raw.primary_key,
            unique_indexes,
            documentation: raw.documentation,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nestbase_core::ScalarType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn composite_k() -> ModelDescriptor {
        ModelDescriptor::new(
            "CompositeK",
            vec![
                FieldDescriptor::scalar("createdAt", ScalarType::DateTime),
                FieldDescriptor::scalar("updatedAt", ScalarType::DateTime).updated_at(),
                FieldDescriptor::scalar("firstId", ScalarType::Int),
                FieldDescriptor::scalar("secondId", ScalarType::Int),
            ],
        )
        .with_primary_key(PrimaryKey::new(["firstId", "secondId"]))
    }

    #[test]
    fn test_composite_key() {
        let model = composite_k();
        let key = model.key().unwrap().unwrap();
        assert!(key.is_composite());
        assert_eq!(key.field_names(), vec!["firstId", "secondId"]);
        match key {
            ModelKey::Composite { selector, .. } => assert_eq!(selector, "firstId_secondId"),
            ModelKey::Single(_) => panic!("expected composite key"),
        }
    }

    #[test]
    fn test_composite_key_follows_declaration_order() {
        let model = composite_k().with_primary_key(PrimaryKey::new(["secondId", "firstId"]));
        let key = model.key().unwrap().unwrap();
        assert_eq!(key.field_names(), vec!["firstId", "secondId"]);
        match key {
            // The selector keeps the declared @@id order
            ModelKey::Composite { selector, .. } => assert_eq!(selector, "secondId_firstId"),
            ModelKey::Single(_) => panic!("expected composite key"),
        }
    }

    #[test]
    fn test_named_composite_key() {
        let mut pk = PrimaryKey::new(["firstId", "secondId"]);
        pk.name = Some("pairKey".into());
        let model = composite_k().with_primary_key(pk);
        match model.key().unwrap().unwrap() {
            ModelKey::Composite { selector, .. } => assert_eq!(selector, "pairKey"),
            ModelKey::Single(_) => panic!("expected composite key"),
        }
    }

    #[test]
    fn test_missing_key_field_is_structural_error() {
        let model = composite_k().with_primary_key(PrimaryKey::new(["firstId", "thirdId"]));
        let err = model.key().unwrap_err();
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "Field 'thirdId' not found in model 'CompositeK'"
        );
        assert!(!model.is_valid());
    }

    #[test]
    fn test_single_id_key() {
        let model = ModelDescriptor::new(
            "User",
            vec![
                FieldDescriptor::scalar("id", ScalarType::Int).id(),
                FieldDescriptor::scalar("email", ScalarType::String).unique(),
            ],
        );
        let key = model.key().unwrap().unwrap();
        assert_eq!(key, ModelKey::Single(&model.fields[0]));
    }

    #[test]
    fn test_model_without_key() {
        let model = ModelDescriptor::new(
            "Log",
            vec![FieldDescriptor::scalar("message", ScalarType::String)],
        );
        assert!(model.key().unwrap().is_none());
        assert!(model.is_valid());
    }

    #[test]
    fn test_unique_index_must_reference_existing_fields() {
        let model = composite_k().with_unique_index(["firstId", "missing"]);
        let err = model.validate().unwrap_err();
        assert!(matches!(err, EngineError::FieldNotFound { ref field, .. } if field == "missing"));
    }

    #[test]
    fn test_duplicate_field_names() {
        let model = ModelDescriptor::new(
            "Dup",
            vec![
                FieldDescriptor::scalar("name", ScalarType::String),
                FieldDescriptor::scalar("name", ScalarType::String),
            ],
        );
        assert!(matches!(
            model.validate(),
            Err(EngineError::DuplicateName { kind: "field", .. })
        ));
    }

    #[test]
    fn test_decode_dmmf_model_merges_unique_fields() {
        let model: ModelDescriptor = serde_json::from_value(json!({
            "name": "Membership",
            "dbName": null,
            "fields": [
                { "name": "userId", "kind": "scalar", "type": "Int", "isRequired": true },
                { "name": "teamId", "kind": "scalar", "type": "Int", "isRequired": true }
            ],
            "primaryKey": null,
            "uniqueFields": [["userId", "teamId"]],
            "uniqueIndexes": [{ "name": null, "fields": ["userId", "teamId"] }],
            "isGenerated": false
        }))
        .unwrap();

        assert_eq!(model.unique_indexes.len(), 1);
        assert!(model.primary_key.is_none());
        assert!(model.is_valid());
    }
}
