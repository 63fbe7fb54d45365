//! Domain model for catalog, inventory and circulation records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the case-folding rule shared by every uniqueness and location match.
//!
//! # Invariants
//! - Titles, copies, members and circulation entries carry stable UUIDs.
//! - Locations are identified by name; names compare case-insensitively.
//! - Free-text locations are advisory and never resolved against the
//!   location registry.

pub mod circulation;
pub mod copy;
pub mod location;
pub mod member;
pub mod name_key;
pub mod title;
pub mod validation;
