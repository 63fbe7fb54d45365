//! Typed outcomes for every library operation.
//!
//! # Responsibility
//! - Carry the domain failure taxonomy back to callers as values.
//! - Wrap storage failures without losing the underlying SQLite error.
//!
//! # Invariants
//! - A `StorageFailure` returned from a mutating operation means the
//!   surrounding transaction was rolled back.

use crate::db::DbError;
use crate::model::circulation::EntryId;
use crate::model::copy::CopyId;
use crate::model::member::MemberId;
use crate::model::title::TitleId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Domain failure returned by catalog, inventory, ledger and report APIs.
#[derive(Debug)]
pub enum LibraryError {
    /// Another title already uses this name (case-insensitive).
    DuplicateTitle(String),
    /// Another location already uses this name (case-insensitive).
    DuplicateLocation(String),
    UnknownTitle(TitleId),
    UnknownCopy(CopyId),
    UnknownMember(MemberId),
    UnknownEntry(EntryId),
    /// The copy already has an open circulation entry.
    CopyNotAvailable(CopyId),
    /// The entry already carries a return date.
    AlreadyReturned(EntryId),
    /// Caller input rejected before touching storage.
    InvalidInput(ValidationError),
    /// Persisted row cannot be decoded into the domain model.
    InvalidData(String),
    /// Storage unavailable, locked past its timeout, or otherwise failing.
    StorageFailure(DbError),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTitle(name) => write!(f, "title already exists: `{name}`"),
            Self::DuplicateLocation(name) => write!(f, "location already exists: `{name}`"),
            Self::UnknownTitle(id) => write!(f, "title not found: {id}"),
            Self::UnknownCopy(id) => write!(f, "copy not found: {id}"),
            Self::UnknownMember(id) => write!(f, "member not found: {id}"),
            Self::UnknownEntry(id) => write!(f, "circulation entry not found: {id}"),
            Self::CopyNotAvailable(id) => write!(f, "copy is already issued: {id}"),
            Self::AlreadyReturned(id) => write!(f, "circulation entry already returned: {id}"),
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::StorageFailure(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::StorageFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl LibraryError {
    /// Stable snake_case code for logs and caller-side message lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateTitle(_) => "duplicate_title",
            Self::DuplicateLocation(_) => "duplicate_location",
            Self::UnknownTitle(_) => "unknown_title",
            Self::UnknownCopy(_) => "unknown_copy",
            Self::UnknownMember(_) => "unknown_member",
            Self::UnknownEntry(_) => "unknown_entry",
            Self::CopyNotAvailable(_) => "copy_not_available",
            Self::AlreadyReturned(_) => "already_returned",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::StorageFailure(_) => "storage_failure",
        }
    }
}

impl From<ValidationError> for LibraryError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::StorageFailure(value)
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageFailure(DbError::Sqlite(value))
    }
}
