//! Inventory and circulation engine for a physical library.
//! This crate is the single source of truth for catalog, copy and loan
//! invariants; presentation layers call into it in-process.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LibraryConfig;
pub use error::{LibraryError, LibraryResult};
pub use import::merge::MergeImporter;
pub use import::{
    ImportCounts, ImportError, ImportReport, ImportResult, ImportRow, SkipReason, SkippedRow,
};
pub use logging::{init_logging, LoggingError};
pub use model::circulation::{CirculationEntry, EntryId, OpenLoan, OpenLoanOrder};
pub use model::copy::{CopyFilter, CopyId, CopyListing, CopyRecord, CopyStatus};
pub use model::location::Location;
pub use model::member::{Member, MemberId};
pub use model::title::{Title, TitleDraft, TitleFilter, TitleId};
pub use model::validation::ValidationError;
pub use repo::circulation_repo::{CirculationRepository, SqliteCirculationRepository};
pub use repo::copy_repo::{CopyRepository, SqliteCopyRepository};
pub use repo::location_repo::{LocationRepository, SqliteLocationRepository};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::report_repo::{
    CategoryCount, LibraryTotals, LocationOccupancy, OccupancyCount, ReportRepository,
    SqliteReportRepository,
};
pub use repo::title_repo::{SqliteTitleRepository, TitleRepository, UpsertOutcome};
pub use service::catalog_service::CatalogService;
pub use service::circulation_service::CirculationService;
pub use service::inventory_service::InventoryService;
pub use service::location_service::LocationService;
pub use service::member_service::MemberService;
pub use service::report_service::ReportService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
