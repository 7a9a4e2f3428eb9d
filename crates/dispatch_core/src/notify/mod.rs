//! Change notifications for external consumers.
//!
//! # Responsibility
//! - Describe store mutations as `StoreEvent` values for re-rendering views.
//! - Derive user-facing `Notification`s (toasts) from those events.
//!
//! # Invariants
//! - Delivery is fire-and-forget; sinks and observers cannot fail a mutation.
//! - Exactly one notification per successful report and per assignment.

pub mod event;
pub mod sink;
