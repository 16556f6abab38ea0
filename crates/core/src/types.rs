//! Core types used throughout nestbase
//!
//! This module contains the scalar type table shared by the schema model and
//! the code generators, plus small value types describing field shape.

use serde::{Deserialize, Serialize};

// ============================================================================
// Scalar Types
// ============================================================================

/// Scalar types a schema field can carry.
///
/// The serialized names are the ones used by the Prisma data model, so the
/// enum can be decoded straight from DMMF JSON. Unknown names fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Variable-length string
    String,
    /// Boolean true/false
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// Double precision floating point
    Float,
    /// Arbitrary precision decimal
    Decimal,
    /// Date and time
    DateTime,
    /// JSON document
    Json,
    /// Binary data
    Bytes,
}

impl ScalarType {
    /// Parse a schema type name (e.g. `"DateTime"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    /// Schema type name
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Boolean => "Boolean",
            ScalarType::Int => "Int",
            ScalarType::BigInt => "BigInt",
            ScalarType::Float => "Float",
            ScalarType::Decimal => "Decimal",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
            ScalarType::Bytes => "Bytes",
        }
    }

    /// TypeScript type used for values of this scalar
    pub fn ts_type(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Boolean => "boolean",
            ScalarType::Int | ScalarType::Float => "number",
            ScalarType::BigInt => "bigint",
            // Prisma returns decimals as Decimal.js instances that serialize to strings
            ScalarType::Decimal => "string",
            ScalarType::DateTime => "Date",
            ScalarType::Json => "Prisma.JsonValue",
            ScalarType::Bytes => "Buffer",
        }
    }

    /// Constructor passed as `type` to the OpenAPI property decorator
    pub fn swagger_type(&self) -> &'static str {
        match self {
            ScalarType::String
            | ScalarType::BigInt
            | ScalarType::Decimal
            | ScalarType::DateTime
            | ScalarType::Bytes => "String",
            ScalarType::Boolean => "Boolean",
            ScalarType::Int | ScalarType::Float => "Number",
            ScalarType::Json => "Object",
        }
    }

    /// OpenAPI `format` hint, when the constructor alone is ambiguous
    pub fn swagger_format(&self) -> Option<&'static str> {
        match self {
            ScalarType::DateTime => Some("date-time"),
            ScalarType::Bytes => Some("binary"),
            ScalarType::BigInt => Some("int64"),
            _ => None,
        }
    }

    /// class-validator decorator checking a value of this scalar, if any
    pub fn validator(&self) -> Option<&'static str> {
        match self {
            ScalarType::String => Some("IsString"),
            ScalarType::Boolean => Some("IsBoolean"),
            ScalarType::Int => Some("IsInt"),
            ScalarType::Float => Some("IsNumber"),
            ScalarType::Decimal => Some("IsNumberString"),
            ScalarType::DateTime => Some("IsDate"),
            ScalarType::BigInt | ScalarType::Json | ScalarType::Bytes => None,
        }
    }

    /// Whether values of this type reference the generated `Prisma` namespace
    pub fn needs_prisma_namespace(&self) -> bool {
        matches!(self, ScalarType::Json)
    }

    /// Get all scalar types
    pub fn all() -> &'static [ScalarType] {
        &[
            ScalarType::String,
            ScalarType::Boolean,
            ScalarType::Int,
            ScalarType::BigInt,
            ScalarType::Float,
            ScalarType::Decimal,
            ScalarType::DateTime,
            ScalarType::Json,
            ScalarType::Bytes,
        ]
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Cardinality
// ============================================================================

/// Whether a field holds a single value or a list of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    List,
}

impl Cardinality {
    /// Build from the DMMF `isList` flag
    pub fn from_is_list(is_list: bool) -> Self {
        if is_list {
            Cardinality::List
        } else {
            Cardinality::Single
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Cardinality::List)
    }
}

// ============================================================================
// Tests
// ============================================================================
