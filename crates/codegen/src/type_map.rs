//! # Type Mapper
//!
//! Maps a field to its TypeScript type expression together with the
//! decorator metadata the converters need: OpenAPI property arguments and
//! class-validator decorators.
//!
//! | kind | type | OpenAPI | validator |
//! |------|------|---------|-----------|
//! | `String` | `string` | `String` | `IsString` |
//! | `Int` / `Float` | `number` | `Number` | `IsInt` / `IsNumber` |
//! | `DateTime` | `Date` | `String`, `date-time` | `IsDate` |
//! | enum | enum name | `enum: Name` | `IsEnum(Name)` |
//! | relation | `<Model>Base` | `type: () => <Model>Base` | |
//! | object | `Record<string, unknown>` | `Object` | |

use nestbase_core::{EngineError, EngineResult, ScalarType};
use nestbase_ir::{FieldDescriptor, FieldKind};

use crate::context::GenerationContext;
use crate::naming::NameValues;

/// Type used for embedded composite objects
pub const OBJECT_TYPE: &str = "Record<string, unknown>";

/// What a mapped type refers to, for import resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef<'a> {
    /// A built-in TypeScript type, or one from the client's `Prisma` namespace
    Scalar(ScalarType),
    /// A generated enum
    Enum(&'a NameValues),
    /// Another model's generated entity class
    Entity(&'a NameValues),
    /// An embedded composite object
    Object,
}

/// The TypeScript view of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType<'a> {
    pub reference: TypeRef<'a>,
    /// Element type without list or null decoration (`PostBase`)
    pub base: String,
    pub is_list: bool,
    /// Whether `null` is a valid value
    pub nullable: bool,
}

impl<'a> MappedType<'a> {
    /// Full type expression (`PostBase[] | null`)
    pub fn ts_type(&self) -> String {
        let mut ty = self.base.clone();
        if self.is_list {
            ty.push_str("[]");
        }
        if self.nullable {
            ty.push_str(" | null");
        }
        ty
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.reference, TypeRef::Entity(_))
    }

    /// Whether the type references the client's `Prisma` namespace
    pub fn needs_prisma_namespace(&self) -> bool {
        matches!(self.reference, TypeRef::Scalar(s) if s.needs_prisma_namespace())
    }

    /// Arguments of the OpenAPI property decorator, in emission order
    pub fn swagger_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        match self.reference {
            TypeRef::Scalar(scalar) => {
                args.push(format!("type: {}", scalar.swagger_type()));
                if let Some(format) = scalar.swagger_format() {
                    args.push(format!("format: \"{}\"", format));
                }
            }
            TypeRef::Enum(names) => {
                args.push(format!("enum: {}", names.pascal));
                args.push(format!("enumName: \"{}\"", names.pascal));
            }
            TypeRef::Entity(_) => args.push(format!("type: () => {}", self.base)),
            TypeRef::Object => args.push("type: Object".to_string()),
        }

        if self.is_list {
            args.push("isArray: true".to_string());
        }
        if self.nullable {
            args.push("nullable: true".to_string());
        }
        args
    }

    /// class-validator / class-transformer decorators checking a value,
    /// rendered without the leading `@`
    pub fn validators(&self) -> Vec<String> {
        let each = if self.is_list { "{ each: true }" } else { "" };
        let mut decorators = Vec::new();

        if self.is_list {
            decorators.push("IsArray()".to_string());
        }

        match self.reference {
            TypeRef::Scalar(scalar) => {
                if let Some(validator) = scalar.validator() {
                    decorators.push(format!("{}({})", validator, each));
                }
                if scalar == ScalarType::DateTime {
                    decorators.push("Type(() => Date)".to_string());
                }
            }
            TypeRef::Enum(names) => {
                let args = if self.is_list {
                    format!("{}, {}", names.pascal, each)
                } else {
                    names.pascal.clone()
                };
                decorators.push(format!("IsEnum({})", args));
            }
            TypeRef::Entity(_) | TypeRef::Object => {}
        }

        decorators
    }
}

/// Map a field of `model_name` to its TypeScript type.
///
/// Relations and enums must resolve against the data model; a dangling
/// reference is reported as a structural error naming the model and field.
pub fn map_field<'a>(
    field: &FieldDescriptor,
    model_name: &str,
    ctx: &'a GenerationContext,
) -> EngineResult<MappedType<'a>> {
    let (reference, base) = match &field.kind {
        FieldKind::Scalar(scalar) => (TypeRef::Scalar(*scalar), scalar.ts_type().to_string()),
        FieldKind::Enum(name) => {
            let names = ctx.enum_names(name).ok_or_else(|| EngineError::EnumNotFound {
                model: model_name.to_string(),
                field: field.name.clone(),
                name: name.clone(),
            })?;
            (TypeRef::Enum(names), names.pascal.clone())
        }
        FieldKind::Relation(rel) => {
            let names = ctx.model_names(&rel.model).ok_or_else(|| {
                EngineError::model_not_found(&rel.model, format!("{}.{}", model_name, field.name))
            })?;
            (TypeRef::Entity(names), format!("{}Base", names.pascal))
        }
        FieldKind::Object(_) => (TypeRef::Object, OBJECT_TYPE.to_string()),
    };

    Ok(MappedType {
        reference,
        base,
        is_list: field.is_list(),
        nullable: !field.required,
    })
}

// ============================================================================
// Tests
// ============================================================================
