//! Repository layer abstractions and in-memory tables.
//!
//! # Responsibility
//! - Define data access contracts used by the dispatch store.
//! - Keep table layout and id allocation out of use-case orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`*NotFound`, `Duplicate*`)
//!   instead of silently ignoring bad ids.

pub mod dispatch_repo;
pub mod seed;
