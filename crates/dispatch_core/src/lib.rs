//! Core dispatch logic for the emergency console.
//! This crate is the single source of truth for emergency/responder
//! lifecycle invariants; views only read it and call its operations.

pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod source;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::emergency::{
    Emergency, EmergencyId, EmergencyStatus, EmergencyType, EmergencyValidationError, GeoPoint,
    Location, Priority, ResponderSnapshot, DESCRIPTION_PLACEHOLDER, LOCATION_PLACEHOLDER,
};
pub use model::responder::{Responder, ResponderId, ResponderStatus};
pub use notify::event::{Notification, NotificationLevel, StoreEvent};
pub use notify::sink::{LogSink, NotificationSink, RecordingObserver, RecordingSink, StoreObserver};
pub use repo::dispatch_repo::{
    DispatchRepository, EmergencyFilter, EmergencyListQuery, InMemoryDispatchRepository,
    RepoError, RepoResult,
};
pub use repo::seed::{seed_dataset, SeedData};
pub use service::dispatch_store::{
    DispatchError, DispatchStore, DispatchSummary, NewEmergency, RecordRef, StoreConfig,
};
pub use source::clock::{Clock, FixedClock, SystemClock};
pub use source::eta::{EtaSource, FixedEta, RandomEta, ETA_MAX_MINUTES, ETA_MIN_MINUTES};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
