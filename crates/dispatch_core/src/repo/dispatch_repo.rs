//! Dispatch repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own the ordered emergency and responder tables.
//! - Allocate emergency ids that are never reused.
//! - Apply paired writes (assignment) all-or-nothing.
//!
//! # Invariants
//! - Emergencies keep insertion order; ids are unique in each table.
//! - Write paths call `Emergency::validate()` before mutation.
//! - A failed write leaves both tables untouched.

use crate::model::emergency::{
    Emergency, EmergencyId, EmergencyStatus, EmergencyType, EmergencyValidationError,
};
use crate::model::responder::{Responder, ResponderId};
use crate::repo::seed::SeedData;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMERGENCY_ID_PREFIX: char = 'e';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for dispatch table writes.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    Validation(EmergencyValidationError),
    EmergencyNotFound(EmergencyId),
    ResponderNotFound(ResponderId),
    DuplicateEmergency(EmergencyId),
    DuplicateResponder(ResponderId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmergencyNotFound(id) => write!(f, "emergency not found: {id}"),
            Self::ResponderNotFound(id) => write!(f, "responder not found: {id}"),
            Self::DuplicateEmergency(id) => write!(f, "emergency id already exists: {id}"),
            Self::DuplicateResponder(id) => write!(f, "responder id already exists: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmergencyValidationError> for RepoError {
    fn from(value: EmergencyValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Status bucket used by dispatcher list tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmergencyFilter {
    #[default]
    All,
    Pending,
    /// Assigned or in progress.
    Active,
    Resolved,
}

impl EmergencyFilter {
    pub fn matches(self, status: EmergencyStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == EmergencyStatus::Pending,
            Self::Active => status.is_active(),
            Self::Resolved => status == EmergencyStatus::Resolved,
        }
    }
}

/// Query options for listing emergencies.
#[derive(Debug, Clone, Default)]
pub struct EmergencyListQuery {
    pub filter: EmergencyFilter,
    pub kind: Option<EmergencyType>,
}

/// Storage interface for the dispatch tables.
pub trait DispatchRepository {
    /// Returns an id no stored or previously allocated emergency uses.
    fn allocate_emergency_id(&mut self) -> EmergencyId;
    fn create_emergency(&mut self, emergency: Emergency) -> RepoResult<EmergencyId>;
    fn create_responder(&mut self, responder: Responder) -> RepoResult<ResponderId>;
    fn update_emergency(&mut self, emergency: Emergency) -> RepoResult<()>;
    /// Writes an emergency and a responder together, or neither.
    fn commit_assignment(&mut self, emergency: Emergency, responder: Responder) -> RepoResult<()>;
    fn get_emergency(&self, id: &EmergencyId) -> Option<&Emergency>;
    fn get_responder(&self, id: &ResponderId) -> Option<&Responder>;
    fn emergencies(&self) -> &[Emergency];
    fn responders(&self) -> &[Responder];
    fn list_emergencies(&self, query: &EmergencyListQuery) -> Vec<&Emergency>;
}

/// Process-lifetime, vector-backed tables.
#[derive(Debug, Clone)]
pub struct InMemoryDispatchRepository {
    emergencies: Vec<Emergency>,
    responders: Vec<Responder>,
    next_emergency_seq: u64,
}

impl InMemoryDispatchRepository {
    pub fn new() -> Self {
        Self {
            emergencies: Vec::new(),
            responders: Vec::new(),
            next_emergency_seq: 1,
        }
    }

    /// Builds a repository pre-filled with `seed`.
    ///
    /// # Errors
    /// - Returns duplicate/validation errors if the seed itself is inconsistent.
    pub fn with_seed(seed: SeedData) -> RepoResult<Self> {
        let mut repo = Self::new();
        for responder in seed.responders {
            repo.create_responder(responder)?;
        }
        for emergency in seed.emergencies {
            repo.create_emergency(emergency)?;
        }
        Ok(repo)
    }

    fn emergency_index(&self, id: &EmergencyId) -> Option<usize> {
        self.emergencies.iter().position(|item| &item.id == id)
    }

    fn responder_index(&self, id: &ResponderId) -> Option<usize> {
        self.responders.iter().position(|item| &item.id == id)
    }

    /// Keeps the counter ahead of externally supplied `e<N>` ids.
    fn observe_emergency_id(&mut self, id: &EmergencyId) {
        if let Some(seq) = parse_emergency_seq(id.as_str()) {
            self.next_emergency_seq = self.next_emergency_seq.max(seq.saturating_add(1));
        }
    }
}

impl Default for InMemoryDispatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchRepository for InMemoryDispatchRepository {
    fn allocate_emergency_id(&mut self) -> EmergencyId {
        loop {
            let candidate =
                EmergencyId::new(format!("{EMERGENCY_ID_PREFIX}{}", self.next_emergency_seq));
            self.next_emergency_seq = self.next_emergency_seq.saturating_add(1);
            if self.emergency_index(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn create_emergency(&mut self, emergency: Emergency) -> RepoResult<EmergencyId> {
        emergency.validate()?;
        if self.emergency_index(&emergency.id).is_some() {
            return Err(RepoError::DuplicateEmergency(emergency.id));
        }

        self.observe_emergency_id(&emergency.id);
        let id = emergency.id.clone();
        self.emergencies.push(emergency);
        Ok(id)
    }

    fn create_responder(&mut self, responder: Responder) -> RepoResult<ResponderId> {
        responder.location.validate()?;
        if self.responder_index(&responder.id).is_some() {
            return Err(RepoError::DuplicateResponder(responder.id));
        }

        let id = responder.id.clone();
        self.responders.push(responder);
        Ok(id)
    }

    fn update_emergency(&mut self, emergency: Emergency) -> RepoResult<()> {
        let index = self
            .emergency_index(&emergency.id)
            .ok_or_else(|| RepoError::EmergencyNotFound(emergency.id.clone()))?;
        self.emergencies[index] = emergency;
        Ok(())
    }

    fn commit_assignment(&mut self, emergency: Emergency, responder: Responder) -> RepoResult<()> {
        // Resolve both slots before touching either table.
        let emergency_index = self
            .emergency_index(&emergency.id)
            .ok_or_else(|| RepoError::EmergencyNotFound(emergency.id.clone()))?;
        let responder_index = self
            .responder_index(&responder.id)
            .ok_or_else(|| RepoError::ResponderNotFound(responder.id.clone()))?;

        self.responders[responder_index] = responder;
        self.emergencies[emergency_index] = emergency;
        Ok(())
    }

    fn get_emergency(&self, id: &EmergencyId) -> Option<&Emergency> {
        self.emergencies.iter().find(|item| &item.id == id)
    }

    fn get_responder(&self, id: &ResponderId) -> Option<&Responder> {
        self.responders.iter().find(|item| &item.id == id)
    }

    fn emergencies(&self) -> &[Emergency] {
        &self.emergencies
    }

    fn responders(&self) -> &[Responder] {
        &self.responders
    }

    fn list_emergencies(&self, query: &EmergencyListQuery) -> Vec<&Emergency> {
        self.emergencies
            .iter()
            .filter(|item| query.filter.matches(item.status))
            .filter(|item| query.kind.map_or(true, |kind| item.kind == kind))
            .collect()
    }
}

fn parse_emergency_seq(value: &str) -> Option<u64> {
    let digits = value.strip_prefix(EMERGENCY_ID_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_emergency_seq, DispatchRepository, EmergencyFilter, EmergencyListQuery,
        InMemoryDispatchRepository, RepoError,
    };
    use crate::model::emergency::{
        Emergency, EmergencyId, EmergencyStatus, EmergencyType, GeoPoint, Location,
    };
    use crate::model::responder::{Responder, ResponderId, ResponderStatus};

    fn emergency(id: &str, kind: EmergencyType) -> Emergency {
        Emergency::new(
            EmergencyId::new(id),
            kind,
            Location::new(19.07, 72.87, "Dadar"),
            "test",
            None,
            0,
        )
    }

    #[test]
    fn parse_emergency_seq_accepts_only_canonical_ids() {
        assert_eq!(parse_emergency_seq("e12"), Some(12));
        assert_eq!(parse_emergency_seq("e"), None);
        assert_eq!(parse_emergency_seq("e4-1234"), None);
        assert_eq!(parse_emergency_seq("r3"), None);
    }

    #[test]
    fn allocated_ids_skip_past_inserted_ones() {
        let mut repo = InMemoryDispatchRepository::new();
        repo.create_emergency(emergency("e5", EmergencyType::Fire))
            .unwrap();

        assert_eq!(repo.allocate_emergency_id().as_str(), "e6");
        assert_eq!(repo.allocate_emergency_id().as_str(), "e7");
    }

    #[test]
    fn allocated_ids_are_not_reused_even_if_never_inserted() {
        let mut repo = InMemoryDispatchRepository::new();
        let first = repo.allocate_emergency_id();
        let second = repo.allocate_emergency_id();
        assert_ne!(first, second);
    }

    #[test]
    fn duplicate_emergency_is_rejected() {
        let mut repo = InMemoryDispatchRepository::new();
        repo.create_emergency(emergency("e1", EmergencyType::Police))
            .unwrap();
        let err = repo
            .create_emergency(emergency("e1", EmergencyType::Fire))
            .unwrap_err();
        assert_eq!(err, RepoError::DuplicateEmergency(EmergencyId::new("e1")));
        assert_eq!(repo.emergencies().len(), 1);
    }

    #[test]
    fn commit_assignment_is_all_or_nothing() {
        let mut repo = InMemoryDispatchRepository::new();
        repo.create_emergency(emergency("e1", EmergencyType::Medical))
            .unwrap();

        let mut changed = emergency("e1", EmergencyType::Medical);
        changed.status = EmergencyStatus::Assigned;
        let ghost = Responder::new(
            "r404",
            "Ghost",
            EmergencyType::Medical,
            GeoPoint::new(0.0, 0.0),
            ResponderStatus::Busy,
            None,
        );

        let err = repo.commit_assignment(changed, ghost).unwrap_err();
        assert_eq!(err, RepoError::ResponderNotFound(ResponderId::new("r404")));
        assert_eq!(
            repo.get_emergency(&EmergencyId::new("e1")).unwrap().status,
            EmergencyStatus::Pending
        );
    }

    #[test]
    fn list_filters_by_status_bucket_and_kind() {
        let mut repo = InMemoryDispatchRepository::new();
        let mut active = emergency("e1", EmergencyType::Fire);
        active.status = EmergencyStatus::InProgress;
        repo.create_emergency(active).unwrap();
        repo.create_emergency(emergency("e2", EmergencyType::Fire))
            .unwrap();
        repo.create_emergency(emergency("e3", EmergencyType::Police))
            .unwrap();

        let pending = repo.list_emergencies(&EmergencyListQuery {
            filter: EmergencyFilter::Pending,
            ..EmergencyListQuery::default()
        });
        let ids: Vec<&str> = pending.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e3"]);

        let active_fire = repo.list_emergencies(&EmergencyListQuery {
            filter: EmergencyFilter::Active,
            kind: Some(EmergencyType::Fire),
        });
        assert_eq!(active_fire.len(), 1);
        assert_eq!(active_fire[0].id.as_str(), "e1");
    }
}
