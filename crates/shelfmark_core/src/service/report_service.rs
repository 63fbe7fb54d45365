//! Reporting facade consumed by dashboards and location browsers.

use crate::error::LibraryResult;
use crate::repo::report_repo::{
    CategoryCount, LibraryTotals, LocationOccupancy, OccupancyCount, ReportRepository,
};

/// Read-only aggregation service.
pub struct ReportService<R: ReportRepository> {
    repo: R,
}

impl<R: ReportRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Title, copy and open-entry counts.
    pub fn totals(&self) -> LibraryResult<LibraryTotals> {
        self.repo.totals()
    }

    /// Titles per category with "issued now" sub-counts.
    pub fn category_breakdown(&self) -> LibraryResult<Vec<CategoryCount>> {
        self.repo.category_breakdown()
    }

    /// Titles shelved by default and copies currently at `location`.
    pub fn location_occupancy(&self, location: &str) -> LibraryResult<LocationOccupancy> {
        self.repo.location_occupancy(location)
    }

    pub fn occupancy_summary(&self) -> LibraryResult<Vec<OccupancyCount>> {
        self.repo.occupancy_summary()
    }
}
