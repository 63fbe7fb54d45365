//! Shared row codecs and transaction helpers for SQLite repositories.

use crate::db::migrations::ensure_current;
use crate::error::{LibraryError, LibraryResult};
use chrono::NaiveDate;
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejects connections that were not migrated by `open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> LibraryResult<()> {
    ensure_current(conn)?;
    Ok(())
}

/// Starts a write transaction that takes the database write lock up front.
///
/// Concurrent writers queue behind the busy timeout instead of racing
/// between their reads and writes.
pub(crate) fn begin_write(conn: &Connection) -> LibraryResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> LibraryResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| LibraryError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> LibraryResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| LibraryError::InvalidData(format!("invalid date value `{value}` in {column}")))
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    column: &str,
) -> LibraryResult<Option<NaiveDate>> {
    value.map(|text| parse_date(&text, column)).transpose()
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_date, parse_uuid};
    use crate::error::LibraryError;
    use chrono::NaiveDate;

    #[test]
    fn dates_are_stored_as_iso_text() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_date(date), "2026-01-05");
        assert_eq!(parse_date("2026-01-05", "t.c").unwrap(), date);
    }

    #[test]
    fn malformed_values_are_invalid_data() {
        assert!(matches!(
            parse_date("05/01/2026", "t.c"),
            Err(LibraryError::InvalidData(_))
        ));
        assert!(matches!(
            parse_uuid("not-a-uuid", "t.c"),
            Err(LibraryError::InvalidData(_))
        ));
    }
}
