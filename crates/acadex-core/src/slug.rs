//! Deterministic URL slug derivation.
//!
//! Slugs are derived mechanically from display names: lowercase, strip
//! everything that is not alphanumeric, a space, or a hyphen, then collapse
//! whitespace runs into single hyphens. Deriving twice yields the same
//! string, so renaming an entity back to its original name restores the
//! original slug.

/// Derive a URL-safe slug from a human-readable name.
///
/// ```
/// use acadex_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("Chemistry A2!!"), "chemistry-a2");
/// assert_eq!(derive_slug("  IGCSE   Maths "), "igcse-maths");
/// ```
pub fn derive_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(derive_slug("Chemistry A2!!"), "chemistry-a2");
        assert_eq!(derive_slug("Physics (Edexcel)"), "physics-edexcel");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(derive_slug("  IGCSE   Maths "), "igcse-maths");
        assert_eq!(derive_slug("A\tLevel\nBiology"), "a-level-biology");
    }

    #[test]
    fn test_preserves_existing_hyphens() {
        assert_eq!(derive_slug("O-Level English"), "o-level-english");
    }

    #[test]
    fn test_idempotent() {
        let once = derive_slug("Chemistry A2!!");
        assert_eq!(derive_slug(&once), once);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(derive_slug("Chemistry A2!!"), derive_slug("Chemistry A2!!"));
    }

    #[test]
    fn test_empty_and_symbol_only_names() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!!"), "");
    }
}
