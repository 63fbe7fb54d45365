//! Merge-import pipeline: upsert external title rows keyed on name.
//!
//! # Invariants
//! - Blank-name rows are skipped and reported, never raised.
//! - Each kept row becomes one atomic `INSERT .. ON CONFLICT DO UPDATE`;
//!   the whole batch commits in one transaction.
//! - Rows apply in input order, so the last row for a name wins.
//! - Re-importing the same rows leaves the catalog unchanged.

use crate::error::LibraryResult;
use crate::import::csv_format::{read_import_rows, write_titles};
use crate::import::{
    ImportCounts, ImportReport, ImportResult, ImportRow, SkipReason, SkippedRow,
};
use crate::model::title::{TitleDraft, TitleFilter};
use crate::repo::title_repo::{TitleRepository, UpsertOutcome};
use log::info;
use std::io::{Read, Write};
use std::time::Instant;

/// Reconciliation importer over a title repository.
pub struct MergeImporter<R: TitleRepository> {
    repo: R,
}

impl<R: TitleRepository> MergeImporter<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Merges `rows` into the catalog.
    ///
    /// Existing titles (matched ignoring case) get creator, category and
    /// default location overwritten; unknown names are inserted.
    pub fn merge_import(&self, rows: &[ImportRow]) -> LibraryResult<ImportReport> {
        let started_at = Instant::now();
        let mut skipped_rows = Vec::new();
        let mut drafts = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            if row.name.trim().is_empty() {
                skipped_rows.push(SkippedRow {
                    row: index + 1,
                    reason: SkipReason::BlankTitle,
                });
                continue;
            }
            drafts.push(TitleDraft::new(
                row.name.as_str(),
                row.creator.as_str(),
                row.category.as_str(),
                Some(row.default_location.as_str()),
            ));
        }

        let mut counts = ImportCounts {
            skipped: skipped_rows.len(),
            ..ImportCounts::default()
        };
        if !drafts.is_empty() {
            for outcome in self.repo.upsert_titles(&drafts)? {
                match outcome {
                    UpsertOutcome::Inserted(_) => counts.inserted += 1,
                    UpsertOutcome::Updated(_) => counts.updated += 1,
                    UpsertOutcome::Unchanged(_) => counts.unchanged += 1,
                }
            }
        }

        info!(
            "event=merge_import module=import status=ok rows={} inserted={} updated={} unchanged={} skipped={} duration_ms={}",
            rows.len(),
            counts.inserted,
            counts.updated,
            counts.unchanged,
            counts.skipped,
            started_at.elapsed().as_millis()
        );

        Ok(ImportReport {
            counts,
            skipped_rows,
        })
    }

    /// Reads a title CSV and merges it.
    pub fn import_csv<In: Read>(&self, reader: In) -> ImportResult<ImportReport> {
        let rows = read_import_rows(reader)?;
        Ok(self.merge_import(&rows)?)
    }

    /// Writes the whole catalog in import shape, ordered by title name.
    pub fn export_csv<Out: Write>(&self, writer: Out) -> ImportResult<usize> {
        let titles = self.repo.list_titles(&TitleFilter::default())?;
        write_titles(writer, &titles)?;
        info!(
            "event=export module=import status=ok titles={}",
            titles.len()
        );
        Ok(titles.len())
    }
}
