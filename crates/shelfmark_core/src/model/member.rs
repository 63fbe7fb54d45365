//! Borrower model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable member identifier.
pub type MemberId = Uuid;

/// Borrower record. Names are not unique; members are never mutated by the
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub uuid: MemberId,
    pub name: String,
    /// Free-form contact detail (typically an email address).
    pub contact: String,
}
