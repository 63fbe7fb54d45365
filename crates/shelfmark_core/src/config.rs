//! Runtime configuration for the library core.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::Deserialize;

const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;
const DEFAULT_SLOT_COUNT: u32 = 45;

/// Knobs consumed by circulation and location seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Loan length applied when an issue omits the due date.
    #[serde(default = "default_loan_period_days")]
    pub loan_period_days: u32,
    /// Number of `Compartment <i>` slots guaranteed at startup.
    #[serde(default = "default_slot_count")]
    pub default_slot_count: u32,
    #[serde(default = "default_level")]
    pub log_level: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            loan_period_days: default_loan_period_days(),
            default_slot_count: default_slot_count(),
            log_level: default_level(),
        }
    }
}

impl LibraryConfig {
    /// Parses a JSON config document. Unknown keys are rejected.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

fn default_loan_period_days() -> u32 {
    DEFAULT_LOAN_PERIOD_DAYS
}

fn default_slot_count() -> u32 {
    DEFAULT_SLOT_COUNT
}

fn default_level() -> String {
    let level = if cfg!(debug_assertions) { "debug" } else { "info" };
    level.to_string()
}
