//! Copy inventory service.
//!
//! # Invariants
//! - Exposes no status mutation; issue/return belong to circulation.

use crate::error::LibraryResult;
use crate::model::copy::{CopyFilter, CopyId, CopyListing, CopyRecord};
use crate::model::title::TitleId;
use crate::repo::copy_repo::CopyRepository;
use log::info;

/// Use-case service for physical copies.
pub struct InventoryService<R: CopyRepository> {
    repo: R,
}

impl<R: CopyRepository> InventoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds an available copy of `title_id`.
    ///
    /// `location` is stored as free text and not checked against the registry.
    pub fn add_copy(
        &self,
        title_id: TitleId,
        accession_code: &str,
        location: Option<&str>,
    ) -> LibraryResult<CopyRecord> {
        let copy = self.repo.create_copy(title_id, accession_code, location)?;
        info!(
            "event=copy_add module=inventory status=ok copy_id={} title_id={}",
            copy.uuid, title_id
        );
        Ok(copy)
    }

    pub fn get_copy(&self, id: CopyId) -> LibraryResult<Option<CopyListing>> {
        self.repo.get_copy(id)
    }

    /// Lists copies joined with their title name, ordered by title name.
    pub fn list_copies(&self, filter: &CopyFilter) -> LibraryResult<Vec<CopyListing>> {
        self.repo.list_copies(filter)
    }

    /// Relocates a copy regardless of its circulation status.
    pub fn set_location(&self, id: CopyId, location: Option<&str>) -> LibraryResult<()> {
        self.repo.set_location(id, location)?;
        info!(
            "event=copy_relocate module=inventory status=ok copy_id={}",
            id
        );
        Ok(())
    }
}
