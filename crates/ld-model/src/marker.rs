//! Marker characters reserved by the mapping language
//!
//! Markers are only meaningful as the first character of a mapping value or
//! key, which is why a model path may never start with one.

/// Value prefix for a string literal: `":EUR"` emits `EUR`.
pub const LITERAL: char = ':';

/// Value prefix for a schema.org enumeration member: `"@InStock"`.
pub const ENUMERATION: char = '@';

/// Key prefix for an array expansion: `"[alumni"` or a bare `"["`.
pub const ARRAY: char = '[';

/// All reserved markers.
pub const RESERVED: [char; 3] = [LITERAL, ENUMERATION, ARRAY];

/// Returns the reserved marker `text` starts with, if any.
#[must_use]
pub fn leading(text: &str) -> Option<char> {
    text.chars().next().filter(|c| RESERVED.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_marker() {
        assert_eq!(leading(":EUR"), Some(LITERAL));
        assert_eq!(leading("@InStock"), Some(ENUMERATION));
        assert_eq!(leading("[alumni"), Some(ARRAY));
        assert_eq!(leading("name"), None);
        assert_eq!(leading(""), None);
    }

    #[test]
    fn test_marker_only_counts_in_first_position() {
        assert_eq!(leading("price:EUR"), None);
        assert_eq!(leading("a@b"), None);
    }
}
