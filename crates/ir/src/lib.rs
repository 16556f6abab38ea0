//! # nestbase IR (schema model)
//!
//! Strongly typed descriptors for the data model a schema toolchain hands to
//! the generator: enums, models, fields, relations and primary keys, plus the
//! generator options that come with them.
//!
//! Descriptors are decoded once from DMMF JSON. Field kinds become a tagged
//! variant (`scalar | enum | relation | object`); unrecognized kinds and
//! scalar types are rejected while decoding rather than at render time.
//!

// Module declarations
pub mod datamodel;
pub mod enum_def;
pub mod field;
pub mod model;
pub mod options;
pub mod serialization;

// Re-export commonly used types at crate root
pub use datamodel::Datamodel;
pub use enum_def::EnumDescriptor;
pub use field::{DefaultValue, FieldDescriptor, FieldKind, MARKER_PREFIX, RelationInfo, SystemMarker};
pub use model::{ModelDescriptor, ModelKey, PrimaryKey, UniqueIndex};
pub use options::{CLIENT_PROVIDER, Dmmf, EnvValue, GeneratorInfo, GeneratorOptions};
pub use serialization::{load_datamodel, load_options, load_options_from_string};

// Re-export core types that are commonly used with IR
pub use nestbase_core::{Cardinality, EngineError, EngineResult, ScalarType, Validatable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
