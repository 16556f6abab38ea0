//! Core traits for nestbase
//!
//! This module defines the traits shared by the schema model and the code
//! generators.

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their own structural consistency
///
/// Implemented by schema descriptors so the generator can reject a data
/// model that references fields or models it does not declare before any
/// output is rendered.
///
/// # Example
///
/// ```rust,ignore
/// use nestbase_core::{EngineError, EngineResult, Validatable};
///
/// struct Key {
///     model: String,
///     fields: Vec<String>,
/// }
///
/// impl Validatable for Key {
///     fn validate(&self) -> EngineResult<()> {
///         if self.fields.is_empty() {
///             return Err(EngineError::invalid_schema(format!(
///                 "primary key of '{}' has no fields",
///                 self.model
///             )));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    struct Named(&'static str);

    impl Validatable for Named {
        fn validate(&self) -> EngineResult<()> {
            if self.0.is_empty() {
                return Err(EngineError::InvalidName(self.0.to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(Named("User").is_valid());
        assert!(!Named("").is_valid());
    }

    #[test]
    fn test_validation_errors() {
        assert!(Named("User").validation_errors().is_empty());
        assert_eq!(Named("").validation_errors().len(), 1);
    }
}
