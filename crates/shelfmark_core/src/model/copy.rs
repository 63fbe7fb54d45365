//! Physical copy model.
//!
//! # Invariants
//! - `status` is `Issued` if and only if the copy has an open circulation
//!   entry. Only the circulation ledger writes it.
//! - `current_location` is free text and may disagree with the owning
//!   title's default location.

use crate::model::title::TitleId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable copy identifier.
pub type CopyId = Uuid;

/// Availability of one physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    /// On the shelf; may be issued.
    Available,
    /// Out with a member under an open circulation entry.
    Issued,
}

impl CopyStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Issued => "issued",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "issued" => Some(Self::Issued),
            _ => None,
        }
    }
}

/// Persisted physical copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRecord {
    pub uuid: CopyId,
    pub title_uuid: TitleId,
    /// Human-assigned shelf code. Uniqueness is not enforced.
    pub accession_code: String,
    pub current_location: Option<String>,
    pub status: CopyStatus,
}

/// Copy joined with the owning title's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyListing {
    pub copy: CopyRecord,
    pub title_name: String,
}

/// Filter for copy listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyFilter {
    /// Case-insensitive substring over title name, accession code and
    /// current location.
    pub text: Option<String>,
    pub status: Option<CopyStatus>,
}
