//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per aggregate.
//! - Keep SQL, transactions and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Repositories borrow one migrated connection; they never open their own.
//! - Multi-statement writes run inside an `IMMEDIATE` transaction that is
//!   rolled back when dropped on any error path.
//! - Copy status is written only by the circulation repository.

pub mod circulation_repo;
pub mod copy_repo;
pub mod location_repo;
pub mod member_repo;
pub mod report_repo;
pub mod title_repo;

mod codec;
