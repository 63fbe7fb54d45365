//! Shelving location model.

use serde::{Deserialize, Serialize};

/// Naming convention for seeded slots; slot `i` is `"Compartment i"`.
pub const SEEDED_SLOT_PREFIX: &str = "Compartment";

/// Named storage slot. `name` is the identity and is unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub description: String,
}

/// Returns the name of seeded slot `index`.
pub fn seeded_slot_name(index: u32) -> String {
    format!("{SEEDED_SLOT_PREFIX} {index}")
}

/// Returns the description written for seeded slot `index`.
pub fn seeded_slot_description(index: u32) -> String {
    format!("Auto-created slot {index}")
}

#[cfg(test)]
mod tests {
    use super::seeded_slot_name;

    #[test]
    fn seeded_slot_names_follow_compartment_convention() {
        assert_eq!(seeded_slot_name(1), "Compartment 1");
        assert_eq!(seeded_slot_name(45), "Compartment 45");
    }
}
