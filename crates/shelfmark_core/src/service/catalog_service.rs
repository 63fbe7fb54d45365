//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide direct-entry title creation with reject-on-duplicate semantics.
//! - Offer the merge (upsert) path for callers that choose it explicitly.
//!
//! # Invariants
//! - Plain add never overwrites an existing title.
//! - No location validation happens here; default locations are advisory.

use crate::error::{LibraryError, LibraryResult};
use crate::model::title::{Title, TitleDraft, TitleFilter, TitleId};
use crate::repo::title_repo::{TitleRepository, UpsertOutcome};
use log::{info, warn};

/// Use-case service for catalog entries.
pub struct CatalogService<R: TitleRepository> {
    repo: R,
}

impl<R: TitleRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new title.
    ///
    /// # Errors
    /// - `DuplicateTitle` when another title has the same name ignoring case.
    /// - `InvalidInput` when the name is blank.
    pub fn add_title(&self, draft: &TitleDraft) -> LibraryResult<Title> {
        match self.repo.create_title(draft) {
            Ok(title) => {
                info!(
                    "event=title_add module=catalog status=ok title_id={}",
                    title.uuid
                );
                Ok(title)
            }
            Err(err) => {
                warn!(
                    "event=title_add module=catalog status=error error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Inserts the title or overwrites creator, category and default location
    /// of the existing title with the same name.
    pub fn upsert_title(&self, draft: &TitleDraft) -> LibraryResult<UpsertOutcome> {
        let outcome = self
            .repo
            .upsert_titles(std::slice::from_ref(draft))?
            .into_iter()
            .next()
            .ok_or_else(|| LibraryError::InvalidData("title upsert returned no outcome".to_string()))?;
        info!(
            "event=title_upsert module=catalog status=ok title_id={} outcome={}",
            outcome.title_id(),
            outcome_label(outcome)
        );
        Ok(outcome)
    }

    pub fn get_title(&self, id: TitleId) -> LibraryResult<Option<Title>> {
        self.repo.get_title(id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_title_by_name(&self, name: &str) -> LibraryResult<Option<Title>> {
        self.repo.find_title_by_name(name)
    }

    /// Lists titles by name; the filter matches name, creator or category.
    pub fn list_titles(&self, filter: &TitleFilter) -> LibraryResult<Vec<Title>> {
        self.repo.list_titles(filter)
    }
}

pub(crate) fn outcome_label(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Inserted(_) => "inserted",
        UpsertOutcome::Updated(_) => "updated",
        UpsertOutcome::Unchanged(_) => "unchanged",
    }
}
