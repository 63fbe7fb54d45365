//! Location registry service.

use crate::error::LibraryResult;
use crate::model::location::Location;
use crate::repo::location_repo::LocationRepository;
use log::info;

/// Use-case service for shelving locations.
pub struct LocationService<R: LocationRepository> {
    repo: R,
}

impl<R: LocationRepository> LocationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Guarantees `Compartment 1..=count` exist; returns how many were created.
    ///
    /// Idempotent: repeating the call with the same or a smaller `count`
    /// creates nothing.
    pub fn seed_range(&self, count: u32) -> LibraryResult<u32> {
        let created = self.repo.seed_range(count)?;
        info!(
            "event=location_seed module=locations status=ok requested={} created={}",
            count, created
        );
        Ok(created)
    }

    /// Adds a location; `DuplicateLocation` when the name is taken ignoring case.
    pub fn add_location(&self, name: &str, description: &str) -> LibraryResult<Location> {
        let location = self.repo.add_location(name, description)?;
        info!("event=location_add module=locations status=ok");
        Ok(location)
    }

    pub fn get_location(&self, name: &str) -> LibraryResult<Option<Location>> {
        self.repo.get_location(name)
    }

    /// Lists locations in insertion order.
    pub fn list_locations(&self) -> LibraryResult<Vec<Location>> {
        self.repo.list_locations()
    }
}
