//! # Name Normalizer
//!
//! Derives the casing variants every converter needs from a schema
//! identifier. Values are computed once per enum and model by the
//! [`GenerationContext`](crate::context::GenerationContext) and shared, so
//! the entity, DTO, service and index files of a model always agree on
//! spelling.
//!
//! Identifiers must be ASCII. Anything else is rejected rather than
//! transliterated, so a generated name is never a lossy copy of the schema's.

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase};
use nestbase_core::{EngineError, EngineResult};

/// Casing variants of one identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameValues {
    /// The identifier as written in the schema
    pub original: String,
    /// `compositeK`
    pub camel: String,
    /// `CompositeK`
    pub pascal: String,
    /// `composite-k`
    pub kebab: String,
    /// `compositeKs`
    pub plural_camel: String,
    /// `CompositeKs`
    pub plural_pascal: String,
}

impl NameValues {
    /// Compute every variant of `identifier`.
    ///
    /// Fails with [`EngineError::InvalidName`] when the identifier contains
    /// a non-ASCII character or no ASCII letter or digit.
    pub fn new(identifier: &str) -> EngineResult<Self> {
        if !identifier.is_ascii() || !identifier.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::InvalidName(identifier.to_string()));
        }

        let camel = identifier.to_lower_camel_case();
        let pascal = identifier.to_pascal_case();

        Ok(Self {
            original: identifier.to_string(),
            kebab: identifier.to_kebab_case(),
            plural_camel: pluralize(&camel),
            plural_pascal: pluralize(&pascal),
            camel,
            pascal,
        })
    }
}

/// Pluralise the last word of an identifier with simple English heuristics.
///
/// The casing of the existing characters is preserved.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh")
    {
        format!("{}es", word)
    } else if lower.ends_with('y') && !ends_with_vowel_y(&lower) && lower.len() > 1 {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}

fn ends_with_vowel_y(lower: &str) -> bool {
    ["ay", "ey", "iy", "oy", "uy"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_composite_name() {
        let n = NameValues::new("CompositeK").unwrap();
        assert_eq!(n.original, "CompositeK");
        assert_eq!(n.camel, "compositeK");
        assert_eq!(n.pascal, "CompositeK");
        assert_eq!(n.kebab, "composite-k");
        assert_eq!(n.plural_camel, "compositeKs");
        assert_eq!(n.plural_pascal, "CompositeKs");
    }

    #[test]
    fn test_arbitrary_casing() {
        let n = NameValues::new("blog_post").unwrap();
        assert_eq!(n.camel, "blogPost");
        assert_eq!(n.pascal, "BlogPost");
        assert_eq!(n.kebab, "blog-post");
        assert_eq!(n.plural_pascal, "BlogPosts");
    }

    #[test]
    fn test_idempotent() {
        for name in ["User", "BlogPost", "compositeK", "user_profile", "HTTPLog", "category"] {
            let once = NameValues::new(name).unwrap();
            let twice = NameValues::new(name).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_fixed_points() {
        for name in ["User", "BlogPost", "CompositeK", "user_profile", "order-item", "Category"] {
            let n = NameValues::new(name).unwrap();

            let from_pascal = NameValues::new(&n.pascal).unwrap();
            assert_eq!(from_pascal.camel, n.camel, "camel(pascal({}))", name);
            assert_eq!(from_pascal.pascal, n.pascal);

            let from_camel = NameValues::new(&n.camel).unwrap();
            assert_eq!(from_camel.pascal, n.pascal, "pascal(camel({}))", name);
            assert_eq!(from_camel.camel, n.camel);
        }
    }

    #[test]
    fn test_plural_differs_from_singular() {
        for name in ["User", "Post", "Box", "Church", "Wish", "Status", "Category", "Key"] {
            let n = NameValues::new(name).unwrap();
            assert_ne!(n.plural_pascal, n.pascal);
            assert_ne!(n.plural_camel, n.camel);
        }
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("User"), "Users");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Church"), "Churches");
        assert_eq!(pluralize("Wish"), "Wishes");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("blogCategory"), "blogCategories");
        assert_eq!(pluralize("Key"), "Keys");
        assert_eq!(pluralize("Day"), "Days");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(NameValues::new(""), Err(EngineError::InvalidName(_))));
        assert!(matches!(NameValues::new("__"), Err(EngineError::InvalidName(_))));
        assert!(matches!(NameValues::new("ünï"), Err(EngineError::InvalidName(_))));
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        for name in ["caféMenu", "Ärger", "user_ñ"] {
            let err = NameValues::new(name).unwrap_err();
            assert!(matches!(err, EngineError::InvalidName(ref n) if n == name));
        }
    }
}
