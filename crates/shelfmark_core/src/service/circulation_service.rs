//! Circulation use-case service.
//!
//! # Responsibility
//! - Stamp issue/return events with the clock's date.
//! - Apply the configured loan period when no due date is given.
//!
//! # Invariants
//! - All status transitions go through the circulation repository, which
//!   commits ledger and copy status together.

use crate::clock::Clock;
use crate::config::LibraryConfig;
use crate::error::{LibraryError, LibraryResult};
use crate::model::circulation::{CirculationEntry, EntryId, OpenLoan, OpenLoanOrder};
use crate::model::copy::CopyId;
use crate::model::member::MemberId;
use crate::model::validation::ValidationError;
use crate::repo::circulation_repo::CirculationRepository;
use chrono::{Days, NaiveDate};
use log::{info, warn};

/// Use-case service for the issue/return state machine.
pub struct CirculationService<R: CirculationRepository, C: Clock> {
    repo: R,
    clock: C,
    loan_period_days: u32,
}

impl<R: CirculationRepository, C: Clock> CirculationService<R, C> {
    pub fn new(repo: R, clock: C, config: &LibraryConfig) -> Self {
        Self {
            repo,
            clock,
            loan_period_days: config.loan_period_days,
        }
    }

    /// Issues an available copy to a member.
    ///
    /// `due_date` defaults to today plus the configured loan period.
    ///
    /// # Errors
    /// - `UnknownCopy` / `UnknownMember` when either side does not resolve.
    /// - `CopyNotAvailable` when the copy already has an open entry.
    /// - `InvalidInput` when `due_date` precedes today.
    pub fn issue(
        &self,
        copy_id: CopyId,
        member_id: MemberId,
        due_date: Option<NaiveDate>,
    ) -> LibraryResult<CirculationEntry> {
        let today = self.clock.today();
        let due = match due_date {
            Some(due) if due < today => {
                return Err(ValidationError::DueBeforeIssue { issue: today, due }.into());
            }
            Some(due) => due,
            None => self.default_due_date(today),
        };

        match self.repo.issue(copy_id, member_id, today, Some(due)) {
            Ok(entry) => {
                info!(
                    "event=copy_issue module=circulation status=ok entry_id={} copy_id={} member_id={}",
                    entry.uuid, copy_id, member_id
                );
                Ok(entry)
            }
            Err(err) => {
                log_rejection("copy_issue", &err);
                Err(err)
            }
        }
    }

    /// Closes the named entry and makes its copy available again.
    ///
    /// # Errors
    /// - `UnknownEntry` when the entry does not exist.
    /// - `AlreadyReturned` when the entry is already closed.
    pub fn return_entry(&self, entry_id: EntryId) -> LibraryResult<CirculationEntry> {
        let today = self.clock.today();
        match self.repo.return_entry(entry_id, today) {
            Ok(entry) => {
                info!(
                    "event=copy_return module=circulation status=ok entry_id={} copy_id={}",
                    entry.uuid, entry.copy_uuid
                );
                Ok(entry)
            }
            Err(err) => {
                log_rejection("copy_return", &err);
                Err(err)
            }
        }
    }

    pub fn get_entry(&self, entry_id: EntryId) -> LibraryResult<Option<CirculationEntry>> {
        self.repo.get_entry(entry_id)
    }

    /// Lists open entries with display data, flagged overdue against today.
    pub fn list_open(&self, order: OpenLoanOrder) -> LibraryResult<Vec<OpenLoan>> {
        self.repo.list_open(order, self.clock.today())
    }

    /// Loan history of one copy, newest first.
    pub fn history(&self, copy_id: CopyId) -> LibraryResult<Vec<CirculationEntry>> {
        self.repo.entries_for_copy(copy_id)
    }

    fn default_due_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

fn log_rejection(event: &str, err: &LibraryError) {
    match err {
        LibraryError::StorageFailure(_) | LibraryError::InvalidData(_) => warn!(
            "event={} module=circulation status=error error_code={} error={}",
            event,
            err.code(),
            err
        ),
        _ => info!(
            "event={} module=circulation status=rejected error_code={}",
            event,
            err.code()
        ),
    }
}
