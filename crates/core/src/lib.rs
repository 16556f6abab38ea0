//! # nestbase Core
//!
//! Core types, traits, and error handling for nestbase.
//!
//! This crate provides the foundational building blocks used by the schema
//! model and the code generators:
//!
//! - **Types**: the scalar type table (`ScalarType`) and field `Cardinality`
//! - **Traits**: `Validatable` for structural checks on schema descriptors
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::Validatable;
pub use types::{Cardinality, ScalarType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
