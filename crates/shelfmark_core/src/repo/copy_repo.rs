//! Copy inventory repository.
//!
//! # Responsibility
//! - Persist physical copies under their owning title.
//! - Relocate copies independently of circulation status.
//!
//! # Invariants
//! - New copies start `available`.
//! - This repository never writes `copies.status`; the circulation
//!   repository owns every status transition.
//! - Listings are ordered by owning title name, then accession code.

use crate::error::{LibraryError, LibraryResult};
use crate::model::copy::{CopyFilter, CopyId, CopyListing, CopyRecord, CopyStatus};
use crate::model::name_key::{fold_key, fold_optional, folded_contains, normalize_optional};
use crate::model::title::TitleId;
use crate::model::validation::require_text;
use crate::repo::codec::{begin_write, ensure_connection_ready, parse_uuid};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

pub(crate) const COPY_LISTING_SELECT_SQL: &str = "SELECT
    c.uuid,
    c.title_uuid,
    c.accession_code,
    c.current_location,
    c.status,
    t.name AS title_name
FROM copies c
INNER JOIN titles t ON t.uuid = c.title_uuid";

/// Repository interface for physical copies.
pub trait CopyRepository {
    /// Adds an available copy; fails with `UnknownTitle` when the title is missing.
    fn create_copy(
        &self,
        title_id: TitleId,
        accession_code: &str,
        location: Option<&str>,
    ) -> LibraryResult<CopyRecord>;
    fn get_copy(&self, id: CopyId) -> LibraryResult<Option<CopyListing>>;
    fn list_copies(&self, filter: &CopyFilter) -> LibraryResult<Vec<CopyListing>>;
    /// Moves a copy; a blank location clears it.
    fn set_location(&self, id: CopyId, location: Option<&str>) -> LibraryResult<()>;
}

/// SQLite-backed copy repository.
pub struct SqliteCopyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCopyRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CopyRepository for SqliteCopyRepository<'_> {
    fn create_copy(
        &self,
        title_id: TitleId,
        accession_code: &str,
        location: Option<&str>,
    ) -> LibraryResult<CopyRecord> {
        let accession_code = require_text("accession_code", accession_code)?;
        let current_location = normalize_optional(location);

        let tx = begin_write(self.conn)?;
        let title_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM titles WHERE uuid = ?1);",
            [title_id.to_string()],
            |row| row.get(0),
        )?;
        if title_exists != 1 {
            return Err(LibraryError::UnknownTitle(title_id));
        }

        let copy = CopyRecord {
            uuid: Uuid::new_v4(),
            title_uuid: title_id,
            accession_code,
            current_location,
            status: CopyStatus::Available,
        };
        tx.execute(
            "INSERT INTO copies (
                uuid,
                title_uuid,
                accession_code,
                current_location,
                current_location_key,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                copy.uuid.to_string(),
                copy.title_uuid.to_string(),
                copy.accession_code.as_str(),
                copy.current_location.as_deref(),
                fold_optional(copy.current_location.as_deref()),
                copy.status.as_db_str(),
            ],
        )?;
        tx.commit()?;

        Ok(copy)
    }

    fn get_copy(&self, id: CopyId) -> LibraryResult<Option<CopyListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COPY_LISTING_SELECT_SQL} WHERE c.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_copy_listing_row(row)?));
        }
        Ok(None)
    }

    fn list_copies(&self, filter: &CopyFilter) -> LibraryResult<Vec<CopyListing>> {
        let mut sql = format!("{COPY_LISTING_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(" AND c.status = ?");
            bind_values.push(Value::Text(status.as_db_str().to_string()));
        }
        sql.push_str(" ORDER BY t.name_key ASC, c.accession_code ASC, c.uuid ASC;");

        let needle = filter
            .text
            .as_deref()
            .map(fold_key)
            .filter(|needle| !needle.is_empty());

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut copies = Vec::new();
        while let Some(row) = rows.next()? {
            let listing = parse_copy_listing_row(row)?;
            if let Some(needle) = needle.as_deref() {
                if !listing_matches(&listing, needle) {
                    continue;
                }
            }
            copies.push(listing);
        }
        Ok(copies)
    }

    fn set_location(&self, id: CopyId, location: Option<&str>) -> LibraryResult<()> {
        let current_location = normalize_optional(location);
        let changed = self.conn.execute(
            "UPDATE copies
             SET
                current_location = ?2,
                current_location_key = ?3
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                current_location.as_deref(),
                fold_optional(current_location.as_deref()),
            ],
        )?;
        if changed == 0 {
            return Err(LibraryError::UnknownCopy(id));
        }
        Ok(())
    }
}

fn listing_matches(listing: &CopyListing, needle: &str) -> bool {
    folded_contains(&listing.title_name, needle)
        || folded_contains(&listing.copy.accession_code, needle)
        || listing
            .copy
            .current_location
            .as_deref()
            .is_some_and(|location| folded_contains(location, needle))
}

pub(crate) fn parse_copy_listing_row(row: &Row<'_>) -> LibraryResult<CopyListing> {
    let uuid_text: String = row.get("uuid")?;
    let title_uuid_text: String = row.get("title_uuid")?;
    let status_text: String = row.get("status")?;
    let status = CopyStatus::from_db_str(&status_text).ok_or_else(|| {
        LibraryError::InvalidData(format!("invalid copy status `{status_text}` in copies.status"))
    })?;

    Ok(CopyListing {
        copy: CopyRecord {
            uuid: parse_uuid(&uuid_text, "copies.uuid")?,
            title_uuid: parse_uuid(&title_uuid_text, "copies.title_uuid")?,
            accession_code: row.get("accession_code")?,
            current_location: row.get("current_location")?,
            status,
        },
        title_name: row.get("title_name")?,
    })
}
