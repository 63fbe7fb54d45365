//! Title repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist catalog entries and enforce case-insensitive name uniqueness.
//! - Provide the single-statement upsert used by merge imports.
//!
//! # Invariants
//! - `name_key` is always `fold_key(name)`; the UNIQUE constraint on it is
//!   the only uniqueness authority (no read-then-write checks).
//! - Upserts never rename an existing title; they overwrite creator,
//!   category and default location only.

use crate::error::{LibraryError, LibraryResult};
use crate::model::name_key::{fold_key, fold_optional, folded_contains};
use crate::model::title::{Title, TitleDraft, TitleFilter, TitleId};
use crate::repo::codec::{begin_write, ensure_connection_ready, is_unique_violation, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const TITLE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    creator,
    category,
    default_location
FROM titles";

const TITLE_UPSERT_SQL: &str = "INSERT INTO titles (
    uuid,
    name,
    name_key,
    creator,
    category,
    default_location,
    default_location_key
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(name_key) DO UPDATE SET
    creator = excluded.creator,
    category = excluded.category,
    default_location = excluded.default_location,
    default_location_key = excluded.default_location_key,
    updated_at = (strftime('%s', 'now') * 1000)
WHERE titles.creator IS NOT excluded.creator
   OR titles.category IS NOT excluded.category
   OR titles.default_location IS NOT excluded.default_location
RETURNING uuid;";

/// Result of upserting one title draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No title with this name existed; a new row was created.
    Inserted(TitleId),
    /// An existing title had its fields overwritten.
    Updated(TitleId),
    /// An existing title already carried identical values.
    Unchanged(TitleId),
}

impl UpsertOutcome {
    pub fn title_id(self) -> TitleId {
        match self {
            Self::Inserted(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Repository interface for catalog entries.
pub trait TitleRepository {
    /// Inserts a new title; fails with `DuplicateTitle` on a name collision.
    fn create_title(&self, draft: &TitleDraft) -> LibraryResult<Title>;
    /// Upserts every draft in input order inside one transaction.
    ///
    /// Later drafts win over earlier drafts with the same folded name.
    fn upsert_titles(&self, drafts: &[TitleDraft]) -> LibraryResult<Vec<UpsertOutcome>>;
    fn get_title(&self, id: TitleId) -> LibraryResult<Option<Title>>;
    /// Looks a title up by case-insensitive name.
    fn find_title_by_name(&self, name: &str) -> LibraryResult<Option<Title>>;
    /// Lists titles sorted by name, optionally filtered.
    fn list_titles(&self, filter: &TitleFilter) -> LibraryResult<Vec<Title>>;
}

/// SQLite-backed title repository.
pub struct SqliteTitleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTitleRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TitleRepository for SqliteTitleRepository<'_> {
    fn create_title(&self, draft: &TitleDraft) -> LibraryResult<Title> {
        let draft = draft.normalized()?;
        let uuid = Uuid::new_v4();

        let inserted = self.conn.execute(
            "INSERT INTO titles (
                uuid,
                name,
                name_key,
                creator,
                category,
                default_location,
                default_location_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                uuid.to_string(),
                draft.name.as_str(),
                fold_key(&draft.name),
                draft.creator.as_str(),
                draft.category.as_str(),
                draft.default_location.as_deref(),
                fold_optional(draft.default_location.as_deref()),
            ],
        );

        match inserted {
            Ok(_) => Ok(Title {
                uuid,
                name: draft.name,
                creator: draft.creator,
                category: draft.category,
                default_location: draft.default_location,
            }),
            Err(err) if is_unique_violation(&err) => Err(LibraryError::DuplicateTitle(draft.name)),
            Err(err) => Err(err.into()),
        }
    }

    fn upsert_titles(&self, drafts: &[TitleDraft]) -> LibraryResult<Vec<UpsertOutcome>> {
        let normalized = drafts
            .iter()
            .map(TitleDraft::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        let tx = begin_write(self.conn)?;
        let mut outcomes = Vec::with_capacity(normalized.len());
        {
            let mut upsert = tx.prepare(TITLE_UPSERT_SQL)?;
            let mut lookup = tx.prepare("SELECT uuid FROM titles WHERE name_key = ?1;")?;

            for draft in &normalized {
                let proposed = Uuid::new_v4();
                let name_key = fold_key(&draft.name);
                let written: Option<String> = upsert
                    .query_row(
                        params![
                            proposed.to_string(),
                            draft.name.as_str(),
                            name_key.as_str(),
                            draft.creator.as_str(),
                            draft.category.as_str(),
                            draft.default_location.as_deref(),
                            fold_optional(draft.default_location.as_deref()),
                        ],
                        |row| row.get(0),
                    )
                    .optional()?;

                let outcome = match written {
                    Some(uuid_text) => {
                        let id = parse_uuid(&uuid_text, "titles.uuid")?;
                        if id == proposed {
                            UpsertOutcome::Inserted(id)
                        } else {
                            UpsertOutcome::Updated(id)
                        }
                    }
                    None => {
                        let uuid_text: String =
                            lookup.query_row([name_key.as_str()], |row| row.get(0))?;
                        UpsertOutcome::Unchanged(parse_uuid(&uuid_text, "titles.uuid")?)
                    }
                };
                outcomes.push(outcome);
            }
        }
        tx.commit()?;

        Ok(outcomes)
    }

    fn get_title(&self, id: TitleId) -> LibraryResult<Option<Title>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TITLE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_title_row(row)?));
        }
        Ok(None)
    }

    fn find_title_by_name(&self, name: &str) -> LibraryResult<Option<Title>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TITLE_SELECT_SQL} WHERE name_key = ?1;"))?;
        let mut rows = stmt.query([fold_key(name)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_title_row(row)?));
        }
        Ok(None)
    }

    fn list_titles(&self, filter: &TitleFilter) -> LibraryResult<Vec<Title>> {
        let needle = filter
            .text
            .as_deref()
            .map(fold_key)
            .filter(|needle| !needle.is_empty());

        let mut stmt = self.conn.prepare(&format!(
            "{TITLE_SELECT_SQL} ORDER BY name_key ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            let title = parse_title_row(row)?;
            if let Some(needle) = needle.as_deref() {
                if !title_matches(&title, needle) {
                    continue;
                }
            }
            titles.push(title);
        }
        Ok(titles)
    }
}

fn title_matches(title: &Title, needle: &str) -> bool {
    folded_contains(&title.name, needle)
        || folded_contains(&title.creator, needle)
        || folded_contains(&title.category, needle)
}

pub(crate) fn parse_title_row(row: &Row<'_>) -> LibraryResult<Title> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Title {
        uuid: parse_uuid(&uuid_text, "titles.uuid")?,
        name: row.get("name")?,
        creator: row.get("creator")?,
        category: row.get("category")?,
        default_location: row.get("default_location")?,
    })
}
