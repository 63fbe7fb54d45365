//! Bulk title import and export.
//!
//! # Responsibility
//! - Merge external title rows into the catalog without duplication.
//! - Read and write the tabular `Title, Author, Genre, Default_Location`
//!   format.
//!
//! # Invariants
//! - Imports write only titles; they never touch copies or the ledger.
//! - One import batch commits atomically.

use crate::error::LibraryError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod csv_format;
pub mod merge;

/// One external title record, as read from an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub name: String,
    pub creator: String,
    pub category: String,
    pub default_location: String,
}

impl ImportRow {
    pub fn new(
        name: impl Into<String>,
        creator: impl Into<String>,
        category: impl Into<String>,
        default_location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
            category: category.into(),
            default_location: default_location.into(),
        }
    }
}

/// Why an import row was left out. Skips are reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankTitle,
}

/// A row that the import ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position among data rows (header excluded).
    pub row: usize,
    pub reason: SkipReason,
}

/// Per-outcome row counts for one import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub inserted: usize,
    pub updated: usize,
    /// Rows matching an existing title whose values were already identical.
    pub unchanged: usize,
    pub skipped: usize,
}

/// Outcome of one merge import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub counts: ImportCounts,
    pub skipped_rows: Vec<SkippedRow>,
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Failure reading, writing or applying an import file.
#[derive(Debug)]
pub enum ImportError {
    /// Malformed tabular input or output failure inside the CSV layer.
    Csv(csv::Error),
    Io(std::io::Error),
    /// A required header is absent (matched case-insensitively).
    MissingColumn(&'static str),
    Library(LibraryError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::MissingColumn(column) => write!(f, "missing required column `{column}`"),
            Self::Library(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::MissingColumn(_) => None,
            Self::Library(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LibraryError> for ImportError {
    fn from(value: LibraryError) -> Self {
        Self::Library(value)
    }
}
