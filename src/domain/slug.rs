//! Name -> slug normalization and the reserved-word blocklist.

use crate::domain::constants::RESERVED_KEYWORDS;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII alphanumerics, collapses every run of anything else into a
/// single hyphen, and trims leading/trailing hyphens. Deliberately ASCII-only:
/// accented letters are treated as separators, not transliterated, so
/// "Crème brûlée" becomes "cr-me-br-l-e". Idempotent: applying it to its own
/// output returns the same string. An all-punctuation name yields "".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// True if the slug collides with a reserved route keyword.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_KEYWORDS.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Test Restaurant"), "test-restaurant");
        assert_eq!(slugify("Lunch"), "lunch");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("Fish & Chips"), "fish-chips");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        assert_eq!(slugify("Crème brûlée!"), "cr-me-br-l-e");
        assert_eq!(slugify("Café"), "caf");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify("--hello--"), "hello");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn idempotent_on_normalized_input() {
        for name in ["Test Restaurant", "Fish & Chips", "lunch", "a  b  c"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn reserved_words_are_flagged() {
        assert!(is_reserved("all"));
        assert!(is_reserved("new-section"));
        assert!(!is_reserved("lunch"));
    }

    #[test]
    fn names_normalizing_to_reserved_words_are_flagged() {
        assert!(is_reserved(&slugify("All")));
        assert!(is_reserved(&slugify("New Section")));
    }
}
