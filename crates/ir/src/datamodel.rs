//! The data model: every enum and model handed over by the schema toolchain

use crate::enum_def::EnumDescriptor;
use crate::field::FieldKind;
use crate::model::ModelDescriptor;
use nestbase_core::{EngineError, EngineResult, Validatable};
use serde::Deserialize;
use std::collections::HashSet;

/// Root container of the schema AST
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Datamodel {
    /// Enums in declaration order
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,

    /// Models in declaration order
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

impl Datamodel {
    pub fn new(enums: Vec<EnumDescriptor>, models: Vec<ModelDescriptor>) -> Self {
        Self { enums, models }
    }

    /// Get a model by name
    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Get an enum by name
    pub fn enum_def(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.models.is_empty()
    }
}

impl Validatable for Datamodel {
    /// Checks that names are unique and that every reference between
    /// models, fields and enums resolves.
    fn validate(&self) -> EngineResult<()> {
        let mut enum_names = HashSet::new();
        for e in &self.enums {
            if !enum_names.insert(e.name.as_str()) {
                return Err(EngineError::duplicate_name("enum", &e.name));
            }
        }

        let mut model_names = HashSet::new();
        for m in &self.models {
            if !model_names.insert(m.name.as_str()) {
                return Err(EngineError::duplicate_name("model", &m.name));
            }
        }

        for model in &self.models {
            model.validate()?;

            for field in &model.fields {
                match &field.kind {
                    FieldKind::Enum(name) if !enum_names.contains(name.as_str()) => {
                        return Err(EngineError::EnumNotFound {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            name: name.clone(),
                        });
                    }
                    FieldKind::Relation(rel) if !model_names.contains(rel.model.as_str()) => {
                        return Err(EngineError::model_not_found(
                            &rel.model,
                            format!("{}.{}", model.name, field.name),
                        ));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, RelationInfo};
    use nestbase_core::ScalarType;

    fn post_with_author(author_model: &str) -> ModelDescriptor {
        ModelDescriptor::new(
            "Post",
            vec![
                FieldDescriptor::scalar("id", ScalarType::Int).id(),
                FieldDescriptor::scalar("authorId", ScalarType::Int),
                FieldDescriptor::new(
                    "author",
                    FieldKind::Relation(RelationInfo {
                        model: author_model.into(),
                        name: "PostToUser".into(),
                        from_fields: vec!["authorId".into()],
                        to_fields: vec!["id".into()],
                    }),
                ),
            ],
        )
    }

    fn user() -> ModelDescriptor {
        ModelDescriptor::new(
            "User",
            vec![
                FieldDescriptor::scalar("id", ScalarType::Int).id(),
                FieldDescriptor::new("role", FieldKind::Enum("Role".into())),
            ],
        )
    }

    #[test]
    fn test_valid_datamodel() {
        let dm = Datamodel::new(
            vec![EnumDescriptor::new("Role", ["USER", "ADMIN"])],
            vec![user(), post_with_author("User")],
        );
        assert!(dm.validate().is_ok());
        assert!(dm.model("Post").is_some());
        assert!(dm.enum_def("Role").is_some());
        assert!(dm.model("Comment").is_none());
    }

    #[test]
    fn test_missing_relation_target() {
        let dm = Datamodel::new(
            vec![EnumDescriptor::new("Role", ["USER"])],
            vec![user(), post_with_author("Author")],
        );
        let err = dm.validate().unwrap_err();
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "Model 'Author' referenced by 'Post.author' does not exist"
        );
    }

    #[test]
    fn test_missing_enum() {
        let dm = Datamodel::new(vec![], vec![user()]);
        let err = dm.validate().unwrap_err();
        assert!(matches!(err, EngineError::EnumNotFound { ref name, .. } if name == "Role"));
    }

    #[test]
    fn test_duplicate_model() {
        let dm = Datamodel::new(
            vec![EnumDescriptor::new("Role", ["USER"])],
            vec![user(), user()],
        );
        assert!(matches!(
            dm.validate(),
            Err(EngineError::DuplicateName { kind: "model", .. })
        ));
    }

    #[test]
    fn test_relation_from_field_must_exist() {
        let mut post = post_with_author("User");
        post.fields.retain(|f| f.name != "authorId");
        let dm = Datamodel::new(vec![EnumDescriptor::new("Role", ["USER"])], vec![user(), post]);
        assert!(matches!(
            dm.validate(),
            Err(EngineError::FieldNotFound { ref field, .. }) if field == "authorId"
        ));
    }
}
