//! Circulation ledger model.
//!
//! # Invariants
//! - At most one open entry (no `return_date`) exists per copy.
//! - `return_date` is written exactly once; entries are never deleted.

use crate::model::copy::CopyId;
use crate::model::member::MemberId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable circulation entry identifier.
pub type EntryId = Uuid;

/// One loan: an issue event and its eventual return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationEntry {
    pub uuid: EntryId,
    pub copy_uuid: CopyId,
    pub member_uuid: MemberId,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl CirculationEntry {
    /// Returns whether the copy is still out under this entry.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Returns whether this entry is open and past its due date on `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date.is_some_and(|due| due < today)
    }
}

/// Open entry joined with copy, title and member display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLoan {
    pub entry: CirculationEntry,
    pub accession_code: String,
    pub title_name: String,
    pub member_name: String,
    pub overdue: bool,
}

/// Ordering for open-entry listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenLoanOrder {
    /// Most recent issue first.
    #[default]
    RecentFirst,
    /// Oldest issue first.
    OldestFirst,
    /// Earliest due date first; entries without a due date last.
    DueSoonest,
}

#[cfg(test)]
mod tests {
    use super::CirculationEntry;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(due: Option<NaiveDate>, returned: Option<NaiveDate>) -> CirculationEntry {
        CirculationEntry {
            uuid: Uuid::new_v4(),
            copy_uuid: Uuid::new_v4(),
            member_uuid: Uuid::new_v4(),
            issue_date: date(2026, 3, 1),
            due_date: due,
            return_date: returned,
        }
    }

    #[test]
    fn overdue_requires_open_entry_past_due() {
        let today = date(2026, 3, 20);
        assert!(entry(Some(date(2026, 3, 15)), None).is_overdue(today));
        assert!(!entry(Some(date(2026, 3, 20)), None).is_overdue(today));
        assert!(!entry(None, None).is_overdue(today));
        assert!(!entry(Some(date(2026, 3, 15)), Some(date(2026, 3, 18))).is_overdue(today));
    }
}
