//! Title (catalog entry) domain model.
//!
//! # Responsibility
//! - Describe one catalogued work independent of its physical copies.
//!
//! # Invariants
//! - `name` is unique under case-insensitive comparison across all titles.
//! - `default_location` is free text and may name a location that does not
//!   exist in the registry.

use crate::model::name_key::normalize_optional;
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable title identifier.
pub type TitleId = Uuid;

/// Persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub uuid: TitleId,
    /// Display name, trimmed, original casing preserved.
    pub name: String,
    pub creator: String,
    pub category: String,
    pub default_location: Option<String>,
}

/// Caller input for creating or merging a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleDraft {
    pub name: String,
    pub creator: String,
    pub category: String,
    pub default_location: Option<String>,
}

impl TitleDraft {
    pub fn new(
        name: impl Into<String>,
        creator: impl Into<String>,
        category: impl Into<String>,
        default_location: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
            category: category.into(),
            default_location: default_location.map(str::to_string),
        }
    }

    /// Returns a trimmed copy, rejecting a blank name.
    ///
    /// Creator and category may be blank; a blank location becomes `None`.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", &self.name)?,
            creator: self.creator.trim().to_string(),
            category: self.category.trim().to_string(),
            default_location: normalize_optional(self.default_location.as_deref()),
        })
    }
}

/// Substring filter for title listings.
///
/// Matches case-insensitively anywhere in the name, creator or category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    pub text: Option<String>,
}

impl TitleFilter {
    pub fn containing(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TitleDraft;
    use crate::model::validation::ValidationError;

    #[test]
    fn normalized_trims_fields_and_drops_blank_location() {
        let draft = TitleDraft::new("  Dune ", " Herbert ", " SciFi ", Some("   "));
        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.name, "Dune");
        assert_eq!(normalized.creator, "Herbert");
        assert_eq!(normalized.category, "SciFi");
        assert_eq!(normalized.default_location, None);
    }

    #[test]
    fn normalized_rejects_blank_name() {
        let draft = TitleDraft::new("  ", "Herbert", "SciFi", None);
        assert_eq!(
            draft.normalized().unwrap_err(),
            ValidationError::BlankField("name")
        );
    }
}
