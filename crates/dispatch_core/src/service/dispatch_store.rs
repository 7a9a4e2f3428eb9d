//! Dispatch store use-case service.
//!
//! # Responsibility
//! - Expose the report/assign/status/lookup operations consumed by views.
//! - Derive status transitions from mutations and fan out change events.
//! - Inject clock, ETA and notification collaborators explicitly.
//!
//! # Invariants
//! - Every mutation takes `&mut self`; readers never see a half-applied
//!   assignment.
//! - Unknown ids surface `DispatchError::NotFound` and change nothing.
//! - Assignment is permissive: type mismatch or a non-available unit is
//!   logged, never rejected.
//! - ETA snapshots always lie in `ETA_MIN_MINUTES..=ETA_MAX_MINUTES`.

use crate::model::emergency::{
    Emergency, EmergencyId, EmergencyStatus, EmergencyType, EmergencyValidationError, Location,
    Priority, ResponderSnapshot,
};
use crate::model::responder::{Responder, ResponderId, ResponderStatus};
use crate::notify::event::{Notification, StoreEvent};
use crate::notify::sink::{LogSink, NotificationSink, StoreObserver};
use crate::repo::dispatch_repo::{
    DispatchRepository, EmergencyFilter, EmergencyListQuery, InMemoryDispatchRepository,
    RepoError,
};
use crate::repo::seed::seed_dataset;
use crate::source::clock::{Clock, SystemClock};
use crate::source::eta::{EtaSource, RandomEta, ETA_MAX_MINUTES, ETA_MIN_MINUTES};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifies the record an operation could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Emergency(EmergencyId),
    Responder(ResponderId),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Emergency(id) => write!(f, "emergency `{id}`"),
            Self::Responder(id) => write!(f, "responder `{id}`"),
        }
    }
}

/// Store-boundary error for dispatch use-cases.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The id was stale or never existed; nothing was changed.
    NotFound(RecordRef),
    /// Report input was rejected before admission.
    InvalidInput(EmergencyValidationError),
    /// Repository rejected a write (duplicate ids in seed data).
    Repo(RepoError),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(record) => write!(f, "{record} not found"),
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EmergencyValidationError> for DispatchError {
    fn from(value: EmergencyValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for DispatchError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err),
            RepoError::EmergencyNotFound(id) => Self::NotFound(RecordRef::Emergency(id)),
            RepoError::ResponderNotFound(id) => Self::NotFound(RecordRef::Responder(id)),
            other => Self::Repo(other),
        }
    }
}

/// Start-up options for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Fixed RNG seed for reproducible ETAs; entropy when `None`.
    pub eta_seed: Option<u64>,
}

impl StoreConfig {
    pub fn eta_source(&self) -> RandomEta {
        match self.eta_seed {
            Some(seed) => RandomEta::seeded(seed),
            None => RandomEta::from_entropy(),
        }
    }
}

/// Request model for reporting a new emergency.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmergency {
    pub kind: EmergencyType,
    pub location: Location,
    /// May be blank; a placeholder is stored instead.
    pub description: String,
    /// Derived from `kind` when `None`.
    pub priority: Option<Priority>,
}

impl NewEmergency {
    pub fn new(kind: EmergencyType, location: Location, description: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            description: description.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub pending: usize,
    /// Assigned or in progress.
    pub active: usize,
    pub resolved: usize,
    pub available_responders: usize,
}

/// Single-writer registry of emergencies and responders.
pub struct DispatchStore<R: DispatchRepository = InMemoryDispatchRepository> {
    repo: R,
    clock: Box<dyn Clock>,
    eta: Box<dyn EtaSource>,
    sink: Box<dyn NotificationSink>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl DispatchStore<InMemoryDispatchRepository> {
    /// Creates a store pre-loaded with the demo dataset.
    ///
    /// Seed timestamps are anchored at the system clock.
    pub fn seeded(config: &StoreConfig) -> Result<Self, DispatchError> {
        let clock = SystemClock;
        let repo = InMemoryDispatchRepository::with_seed(seed_dataset(clock.now_ms()))?;
        info!(
            "event=store_init module=store status=ok emergencies={} responders={} eta_seeded={}",
            repo.emergencies().len(),
            repo.responders().len(),
            config.eta_seed.is_some()
        );
        Ok(Self::new(repo)
            .with_clock(clock)
            .with_eta_source(config.eta_source()))
    }
}

impl<R: DispatchRepository> DispatchStore<R> {
    /// Creates a store over `repo` with system clock, entropy ETA and log sink.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: Box::new(SystemClock),
            eta: Box::new(RandomEta::from_entropy()),
            sink: Box::new(LogSink),
            observers: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_eta_source(mut self, eta: impl EtaSource + 'static) -> Self {
        self.eta = Box::new(eta);
        self
    }

    pub fn with_notification_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Registers a view that wants every committed change.
    pub fn add_observer(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current time according to the injected clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Reports a new emergency.
    ///
    /// # Contract
    /// - New record is `pending` with no responder and a never-used id.
    /// - `reported_at_ms` comes from the injected clock.
    /// - Emits one "Emergency reported" notification.
    ///
    /// # Errors
    /// - `InvalidInput` for non-finite or out-of-range coordinates.
    pub fn add_emergency(&mut self, request: NewEmergency) -> Result<Emergency, DispatchError> {
        request.location.point.validate()?;

        let id = self.repo.allocate_emergency_id();
        let emergency = Emergency::new(
            id,
            request.kind,
            request.location,
            request.description,
            request.priority,
            self.clock.now_ms(),
        );
        self.repo.create_emergency(emergency.clone())?;

        info!(
            "event=emergency_reported module=store status=ok emergency_id={} type={} priority={}",
            emergency.id, emergency.kind, emergency.priority
        );
        self.publish(StoreEvent::EmergencyReported {
            emergency_id: emergency.id.clone(),
            kind: emergency.kind,
            priority: emergency.priority,
        });

        Ok(emergency)
    }

    /// Dispatches a responder to an emergency.
    ///
    /// # Contract
    /// - Responder becomes `busy`; emergency becomes `assigned` and stores a
    ///   value snapshot of the responder with a fresh ETA.
    /// - Type mismatch or an already busy/offline responder is accepted.
    /// - Re-assignment replaces the snapshot; the earlier unit stays as is.
    /// - Emits one "Responder assigned" notification.
    ///
    /// # Errors
    /// - `NotFound` when either id is unknown; no record is modified.
    pub fn assign_responder(
        &mut self,
        emergency_id: &EmergencyId,
        responder_id: &ResponderId,
    ) -> Result<ResponderSnapshot, DispatchError> {
        let mut emergency = self
            .repo
            .get_emergency(emergency_id)
            .cloned()
            .ok_or_else(|| {
                lookup_miss(
                    "assign_responder",
                    RecordRef::Emergency(emergency_id.clone()),
                )
            })?;
        let mut responder = self
            .repo
            .get_responder(responder_id)
            .cloned()
            .ok_or_else(|| {
                lookup_miss(
                    "assign_responder",
                    RecordRef::Responder(responder_id.clone()),
                )
            })?;

        if responder.kind != emergency.kind || !responder.is_available() {
            warn!(
                "event=assignment_permissive module=store status=accepted emergency_id={} emergency_type={} responder_id={} responder_type={} responder_status={}",
                emergency.id, emergency.kind, responder.id, responder.kind, responder.status
            );
        }

        let eta_minutes = self
            .eta
            .next_eta_minutes()
            .clamp(ETA_MIN_MINUTES, ETA_MAX_MINUTES);
        let snapshot = ResponderSnapshot {
            id: responder.id.clone(),
            name: responder.name.clone(),
            vehicle: responder.vehicle.clone(),
            eta_minutes,
        };

        responder.status = ResponderStatus::Busy;
        emergency.status = EmergencyStatus::Assigned;
        emergency.responder = Some(snapshot.clone());
        self.repo.commit_assignment(emergency, responder)?;

        info!(
            "event=responder_assigned module=store status=ok emergency_id={} responder_id={} eta_minutes={}",
            emergency_id, responder_id, eta_minutes
        );
        self.publish(StoreEvent::ResponderAssigned {
            emergency_id: emergency_id.clone(),
            responder_id: responder_id.clone(),
            responder_name: snapshot.name.clone(),
            eta_minutes,
        });

        Ok(snapshot)
    }

    /// Sets an emergency status without transition checks.
    ///
    /// Returns the previous status. Moving back to `pending` drops the
    /// responder snapshot so the emergency re-enters the unassigned queue;
    /// every other status keeps it.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    pub fn update_emergency_status(
        &mut self,
        emergency_id: &EmergencyId,
        status: EmergencyStatus,
    ) -> Result<EmergencyStatus, DispatchError> {
        let mut emergency = self
            .repo
            .get_emergency(emergency_id)
            .cloned()
            .ok_or_else(|| {
                lookup_miss(
                    "update_emergency_status",
                    RecordRef::Emergency(emergency_id.clone()),
                )
            })?;

        let previous = emergency.status;
        emergency.status = status;
        if status == EmergencyStatus::Pending {
            emergency.responder = None;
        }
        self.repo.update_emergency(emergency)?;

        info!(
            "event=emergency_status_changed module=store status=ok emergency_id={} from={} to={}",
            emergency_id, previous, status
        );
        self.publish(StoreEvent::EmergencyStatusChanged {
            emergency_id: emergency_id.clone(),
            from: previous,
            to: status,
        });

        Ok(previous)
    }

    /// Read reference into current state.
    pub fn get_emergency(&self, id: &EmergencyId) -> Option<&Emergency> {
        self.repo.get_emergency(id)
    }

    /// Read reference into current state.
    pub fn get_responder(&self, id: &ResponderId) -> Option<&Responder> {
        self.repo.get_responder(id)
    }

    /// All emergencies in report order.
    pub fn emergencies(&self) -> &[Emergency] {
        self.repo.emergencies()
    }

    pub fn responders(&self) -> &[Responder] {
        self.repo.responders()
    }

    pub fn list_emergencies(&self, query: &EmergencyListQuery) -> Vec<&Emergency> {
        self.repo.list_emergencies(query)
    }

    /// Responders a dispatcher would be offered for this emergency:
    /// same type and currently available, in stored order.
    ///
    /// # Errors
    /// - `NotFound` for an unknown emergency id.
    pub fn available_responders_for(
        &self,
        emergency_id: &EmergencyId,
    ) -> Result<Vec<&Responder>, DispatchError> {
        let emergency = self.repo.get_emergency(emergency_id).ok_or_else(|| {
            lookup_miss(
                "available_responders_for",
                RecordRef::Emergency(emergency_id.clone()),
            )
        })?;
        Ok(self
            .repo
            .responders()
            .iter()
            .filter(|responder| responder.is_eligible_for(emergency.kind))
            .collect())
    }

    pub fn summary(&self) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for emergency in self.repo.emergencies() {
            if EmergencyFilter::Pending.matches(emergency.status) {
                summary.pending += 1;
            } else if EmergencyFilter::Active.matches(emergency.status) {
                summary.active += 1;
            } else if EmergencyFilter::Resolved.matches(emergency.status) {
                summary.resolved += 1;
            }
        }
        summary.available_responders = self
            .repo
            .responders()
            .iter()
            .filter(|responder| responder.is_available())
            .count();
        summary
    }

    fn publish(&mut self, event: StoreEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        if let Some(notification) = Notification::for_event(&event) {
            self.sink.notify(&notification);
        }
    }
}

fn lookup_miss(operation: &str, record: RecordRef) -> DispatchError {
    debug!(
        "event=lookup_miss module=store status=not_found operation={} record={}",
        operation, record
    );
    DispatchError::NotFound(record)
}
