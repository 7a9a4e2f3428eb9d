//! Dispatch domain model.
//!
//! # Responsibility
//! - Define the emergency and responder records owned by the dispatch store.
//! - Keep textual encodings (`snake_case`) in one place for CLI and serde.
//!
//! # Invariants
//! - Every record is identified by an id that is never reused.
//! - Nothing is hard-deleted; resolution is a status change.

pub mod emergency;
pub mod responder;
