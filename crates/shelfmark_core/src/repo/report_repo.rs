//! Read-only aggregations over catalog, inventory and ledger state.
//!
//! # Invariants
//! - No query here writes; results are read-committed snapshots.
//! - Location matching uses the folded key columns, so titles (by default
//!   location) and copies (by current location) are matched independently.

use crate::error::LibraryResult;
use crate::model::copy::CopyListing;
use crate::model::name_key::fold_key;
use crate::model::title::Title;
use crate::repo::codec::ensure_connection_ready;
use crate::repo::copy_repo::{parse_copy_listing_row, COPY_LISTING_SELECT_SQL};
use crate::repo::title_repo::parse_title_row;
use rusqlite::Connection;
use serde::Serialize;

/// Label used for titles with a blank category.
pub const UNCATEGORIZED_LABEL: &str = "(none)";

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryTotals {
    pub titles: u64,
    pub copies: u64,
    pub open_entries: u64,
}

/// Title counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub titles: u64,
    /// Titles with at least one copy currently out.
    pub issued_now: u64,
}

/// Everything associated with one location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOccupancy {
    pub location: String,
    /// Titles whose default location matches.
    pub titles: Vec<Title>,
    /// Copies whose current location matches.
    pub copies: Vec<CopyListing>,
}

/// Per-location counters for registered locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyCount {
    pub location: String,
    pub titles: u64,
    pub copies: u64,
}

/// Repository interface for reporting queries.
pub trait ReportRepository {
    fn totals(&self) -> LibraryResult<LibraryTotals>;
    /// Category counts, largest first; blank categories fold into `(none)`.
    fn category_breakdown(&self) -> LibraryResult<Vec<CategoryCount>>;
    fn location_occupancy(&self, location: &str) -> LibraryResult<LocationOccupancy>;
    /// Counts for every registered location in insertion order.
    fn occupancy_summary(&self) -> LibraryResult<Vec<OccupancyCount>>;
}

/// SQLite-backed reporting queries.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn totals(&self) -> LibraryResult<LibraryTotals> {
        let totals = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM titles),
                (SELECT COUNT(*) FROM copies),
                (SELECT COUNT(*) FROM circulation_entries WHERE return_date IS NULL);",
            [],
            |row| {
                Ok(LibraryTotals {
                    titles: row.get(0)?,
                    copies: row.get(1)?,
                    open_entries: row.get(2)?,
                })
            },
        )?;
        Ok(totals)
    }

    fn category_breakdown(&self) -> LibraryResult<Vec<CategoryCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                CASE WHEN t.category = '' THEN ?1 ELSE t.category END AS category,
                COUNT(*) AS titles,
                SUM(
                    CASE WHEN EXISTS(
                        SELECT 1
                        FROM copies c
                        INNER JOIN circulation_entries e ON e.copy_uuid = c.uuid
                        WHERE c.title_uuid = t.uuid
                          AND e.return_date IS NULL
                    ) THEN 1 ELSE 0 END
                ) AS issued_now
             FROM titles t
             GROUP BY 1
             ORDER BY titles DESC, category ASC;",
        )?;
        let mut rows = stmt.query([UNCATEGORIZED_LABEL])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push(CategoryCount {
                category: row.get("category")?,
                titles: row.get("titles")?,
                issued_now: row.get("issued_now")?,
            });
        }
        Ok(counts)
    }

    fn location_occupancy(&self, location: &str) -> LibraryResult<LocationOccupancy> {
        let key = fold_key(location);

        let mut titles_stmt = self.conn.prepare(
            "SELECT uuid, name, creator, category, default_location
             FROM titles
             WHERE default_location_key = ?1
             ORDER BY name_key ASC, uuid ASC;",
        )?;
        let mut rows = titles_stmt.query([key.as_str()])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(parse_title_row(row)?);
        }

        let mut copies_stmt = self.conn.prepare(&format!(
            "{COPY_LISTING_SELECT_SQL}
             WHERE c.current_location_key = ?1
             ORDER BY t.name_key ASC, c.accession_code ASC, c.uuid ASC;"
        ))?;
        let mut rows = copies_stmt.query([key.as_str()])?;
        let mut copies = Vec::new();
        while let Some(row) = rows.next()? {
            copies.push(parse_copy_listing_row(row)?);
        }

        Ok(LocationOccupancy {
            location: location.trim().to_string(),
            titles,
            copies,
        })
    }

    fn occupancy_summary(&self) -> LibraryResult<Vec<OccupancyCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.name,
                (SELECT COUNT(*) FROM titles t WHERE t.default_location_key = l.name_key)
                    AS titles,
                (SELECT COUNT(*) FROM copies c WHERE c.current_location_key = l.name_key)
                    AS copies
             FROM locations l
             ORDER BY l.seq ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push(OccupancyCount {
                location: row.get("name")?,
                titles: row.get("titles")?,
                copies: row.get("copies")?,
            });
        }
        Ok(counts)
    }
}
