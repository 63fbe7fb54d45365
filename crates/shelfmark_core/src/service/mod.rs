//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Stamp dates, apply configuration defaults and emit operation logs.
//! - Keep presentation callers decoupled from storage details.

pub mod catalog_service;
pub mod circulation_service;
pub mod inventory_service;
pub mod location_service;
pub mod member_service;
pub mod report_service;
