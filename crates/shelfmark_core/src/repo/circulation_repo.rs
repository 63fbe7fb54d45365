//! Circulation ledger repository: the copy issue/return state machine.
//!
//! # Responsibility
//! - Record issue and return events.
//! - Keep `copies.status` in agreement with open ledger entries.
//!
//! # Invariants
//! - Issue and return each run in one `IMMEDIATE` transaction; the ledger
//!   write and the status flip commit together or not at all.
//! - Availability is decided by the ledger (no open entry for the copy),
//!   never by the cached status column alone.
//! - Return closes exactly the named entry. The copy becomes available
//!   only when no other open entry for it remains.

use crate::error::{LibraryError, LibraryResult};
use crate::model::circulation::{CirculationEntry, EntryId, OpenLoan, OpenLoanOrder};
use crate::model::copy::CopyId;
use crate::model::member::MemberId;
use crate::repo::codec::{
    begin_write, ensure_connection_ready, format_date, is_unique_violation, parse_date,
    parse_optional_date, parse_uuid,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    copy_uuid,
    member_uuid,
    issue_date,
    due_date,
    return_date
FROM circulation_entries";

const OPEN_LOAN_SELECT_SQL: &str = "SELECT
    e.uuid,
    e.copy_uuid,
    e.member_uuid,
    e.issue_date,
    e.due_date,
    e.return_date,
    c.accession_code,
    t.name AS title_name,
    m.name AS member_name
FROM circulation_entries e
INNER JOIN copies c ON c.uuid = e.copy_uuid
INNER JOIN titles t ON t.uuid = c.title_uuid
INNER JOIN members m ON m.uuid = e.member_uuid
WHERE e.return_date IS NULL";

/// Repository interface for the circulation ledger.
pub trait CirculationRepository {
    /// Opens an entry for an available copy and marks the copy issued.
    fn issue(
        &self,
        copy_id: CopyId,
        member_id: MemberId,
        issue_date: NaiveDate,
        due_date: Option<NaiveDate>,
    ) -> LibraryResult<CirculationEntry>;
    /// Closes one open entry and releases its copy.
    fn return_entry(
        &self,
        entry_id: EntryId,
        return_date: NaiveDate,
    ) -> LibraryResult<CirculationEntry>;
    fn get_entry(&self, entry_id: EntryId) -> LibraryResult<Option<CirculationEntry>>;
    /// Lists open entries with display data; `today` drives the overdue flag.
    fn list_open(&self, order: OpenLoanOrder, today: NaiveDate) -> LibraryResult<Vec<OpenLoan>>;
    /// Full loan history of one copy, newest first.
    fn entries_for_copy(&self, copy_id: CopyId) -> LibraryResult<Vec<CirculationEntry>>;
}

/// SQLite-backed circulation ledger.
pub struct SqliteCirculationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCirculationRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CirculationRepository for SqliteCirculationRepository<'_> {
    fn issue(
        &self,
        copy_id: CopyId,
        member_id: MemberId,
        issue_date: NaiveDate,
        due_date: Option<NaiveDate>,
    ) -> LibraryResult<CirculationEntry> {
        let copy_text = copy_id.to_string();
        let tx = begin_write(self.conn)?;

        if !row_exists(&tx, "SELECT EXISTS(SELECT 1 FROM copies WHERE uuid = ?1);", &copy_text)? {
            return Err(LibraryError::UnknownCopy(copy_id));
        }
        if !row_exists(
            &tx,
            "SELECT EXISTS(SELECT 1 FROM members WHERE uuid = ?1);",
            &member_id.to_string(),
        )? {
            return Err(LibraryError::UnknownMember(member_id));
        }
        if has_open_entry(&tx, &copy_text)? {
            return Err(LibraryError::CopyNotAvailable(copy_id));
        }

        let entry = CirculationEntry {
            uuid: Uuid::new_v4(),
            copy_uuid: copy_id,
            member_uuid: member_id,
            issue_date,
            due_date,
            return_date: None,
        };
        let inserted = tx.execute(
            "INSERT INTO circulation_entries (
                uuid,
                copy_uuid,
                member_uuid,
                issue_date,
                due_date,
                return_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
            params![
                entry.uuid.to_string(),
                copy_text.as_str(),
                entry.member_uuid.to_string(),
                format_date(entry.issue_date),
                entry.due_date.map(format_date),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(LibraryError::CopyNotAvailable(copy_id));
            }
            Err(err) => return Err(err.into()),
        }

        tx.execute(
            "UPDATE copies SET status = 'issued' WHERE uuid = ?1;",
            [copy_text.as_str()],
        )?;
        tx.commit()?;

        Ok(entry)
    }

    fn return_entry(
        &self,
        entry_id: EntryId,
        return_date: NaiveDate,
    ) -> LibraryResult<CirculationEntry> {
        let entry_text = entry_id.to_string();
        let tx = begin_write(self.conn)?;

        let mut entry = load_entry(&tx, &entry_text)?.ok_or(LibraryError::UnknownEntry(entry_id))?;
        if !entry.is_open() {
            return Err(LibraryError::AlreadyReturned(entry_id));
        }

        let changed = tx.execute(
            "UPDATE circulation_entries
             SET return_date = ?2
             WHERE uuid = ?1
               AND return_date IS NULL;",
            params![entry_text.as_str(), format_date(return_date)],
        )?;
        if changed != 1 {
            return Err(LibraryError::AlreadyReturned(entry_id));
        }

        tx.execute(
            "UPDATE copies
             SET status = CASE
                WHEN EXISTS(
                    SELECT 1
                    FROM circulation_entries
                    WHERE copy_uuid = ?1
                      AND return_date IS NULL
                ) THEN 'issued'
                ELSE 'available'
             END
             WHERE uuid = ?1;",
            [entry.copy_uuid.to_string()],
        )?;
        tx.commit()?;

        entry.return_date = Some(return_date);
        Ok(entry)
    }

    fn get_entry(&self, entry_id: EntryId) -> LibraryResult<Option<CirculationEntry>> {
        load_entry(self.conn, &entry_id.to_string())
    }

    fn list_open(&self, order: OpenLoanOrder, today: NaiveDate) -> LibraryResult<Vec<OpenLoan>> {
        let order_sql = match order {
            OpenLoanOrder::RecentFirst => {
                "e.issue_date DESC, e.created_at DESC, e.rowid DESC"
            }
            OpenLoanOrder::OldestFirst => "e.issue_date ASC, e.created_at ASC, e.rowid ASC",
            OpenLoanOrder::DueSoonest => {
                "e.due_date IS NULL ASC, e.due_date ASC, e.issue_date ASC, e.rowid ASC"
            }
        };

        let mut stmt = self
            .conn
            .prepare(&format!("{OPEN_LOAN_SELECT_SQL} ORDER BY {order_sql};"))?;
        let mut rows = stmt.query([])?;
        let mut loans = Vec::new();
        while let Some(row) = rows.next()? {
            let entry = parse_entry_row(row)?;
            let overdue = entry.is_overdue(today);
            loans.push(OpenLoan {
                entry,
                accession_code: row.get("accession_code")?,
                title_name: row.get("title_name")?,
                member_name: row.get("member_name")?,
                overdue,
            });
        }
        Ok(loans)
    }

    fn entries_for_copy(&self, copy_id: CopyId) -> LibraryResult<Vec<CirculationEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE copy_uuid = ?1
             ORDER BY issue_date DESC, created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([copy_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

fn row_exists(tx: &Transaction<'_>, sql: &str, id: &str) -> LibraryResult<bool> {
    let exists: i64 = tx.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn has_open_entry(tx: &Transaction<'_>, copy_uuid: &str) -> LibraryResult<bool> {
    row_exists(
        tx,
        "SELECT EXISTS(
            SELECT 1
            FROM circulation_entries
            WHERE copy_uuid = ?1
              AND return_date IS NULL
        );",
        copy_uuid,
    )
}

fn load_entry(conn: &Connection, entry_uuid: &str) -> LibraryResult<Option<CirculationEntry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([entry_uuid])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_entry_row(row)?));
    }
    Ok(None)
}

fn parse_entry_row(row: &Row<'_>) -> LibraryResult<CirculationEntry> {
    let uuid_text: String = row.get("uuid")?;
    let copy_text: String = row.get("copy_uuid")?;
    let member_text: String = row.get("member_uuid")?;
    let issue_text: String = row.get("issue_date")?;

    Ok(CirculationEntry {
        uuid: parse_uuid(&uuid_text, "circulation_entries.uuid")?,
        copy_uuid: parse_uuid(&copy_text, "circulation_entries.copy_uuid")?,
        member_uuid: parse_uuid(&member_text, "circulation_entries.member_uuid")?,
        issue_date: parse_date(&issue_text, "circulation_entries.issue_date")?,
        due_date: parse_optional_date(row.get("due_date")?, "circulation_entries.due_date")?,
        return_date: parse_optional_date(
            row.get("return_date")?,
            "circulation_entries.return_date",
        )?,
    })
}
