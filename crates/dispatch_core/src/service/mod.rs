//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into dispatcher-level operations.
//! - Keep views decoupled from table layout and id allocation.

pub mod dispatch_store;
