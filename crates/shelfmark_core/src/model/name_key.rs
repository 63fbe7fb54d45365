//! Case-insensitive comparison keys.
//!
//! Names are compared after trimming surrounding whitespace and applying
//! Unicode lowercase mapping. The folded form is persisted next to the
//! display value so uniqueness and equality checks stay in SQL.

/// Folds a name into its comparison key.
pub fn fold_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Folds an optional free-text location, mapping blank text to `None`.
pub fn fold_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(fold_key)
}

/// Trims optional free text, mapping blank text to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Returns whether `haystack` contains the already-folded `needle`.
pub(crate) fn folded_contains(haystack: &str, needle: &str) -> bool {
    fold_key(haystack).contains(needle)
}

#[cfg(test)]
mod tests {
    use super::{fold_key, fold_optional, folded_contains, normalize_optional};

    #[test]
    fn fold_key_trims_and_lowercases() {
        assert_eq!(fold_key("  Dune "), "dune");
        assert_eq!(fold_key("DUNE"), fold_key("dune"));
    }

    #[test]
    fn fold_key_handles_non_ascii_case() {
        assert_eq!(fold_key("ÉTUDES"), fold_key("études"));
    }

    #[test]
    fn blank_optional_values_become_none() {
        assert_eq!(fold_optional(Some("   ")), None);
        assert_eq!(normalize_optional(Some("")), None);
        assert_eq!(
            fold_optional(Some(" Compartment 3 ")).as_deref(),
            Some("compartment 3")
        );
        assert_eq!(
            normalize_optional(Some(" Compartment 3 ")).as_deref(),
            Some("Compartment 3")
        );
    }

    #[test]
    fn folded_contains_is_unanchored() {
        assert!(folded_contains("Frank Herbert", "herb"));
        assert!(!folded_contains("Frank Herbert", "asimov"));
    }
}
