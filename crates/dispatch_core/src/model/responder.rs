//! Responder domain model.
//!
//! # Invariants
//! - `id` and `kind` are fixed for the responder lifetime.
//! - Only store operations change `status`.

use super::emergency::{EmergencyType, GeoPoint};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of one dispatchable unit (`r1`, `r2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponderId(String);

impl ResponderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResponderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ResponderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Availability of a responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderStatus {
    Available,
    Busy,
    Offline,
}

impl ResponderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl Display for ResponderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Dispatchable unit (ambulance, fire truck, police cruiser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responder {
    pub id: ResponderId,
    pub name: String,
    /// Serialized as `type` to match the UI schema.
    #[serde(rename = "type")]
    pub kind: EmergencyType,
    #[serde(flatten)]
    pub location: GeoPoint,
    pub status: ResponderStatus,
    pub vehicle: Option<String>,
}

impl Responder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: EmergencyType,
        location: GeoPoint,
        status: ResponderStatus,
        vehicle: Option<&str>,
    ) -> Self {
        Self {
            id: ResponderId::new(id),
            name: name.into(),
            kind,
            location,
            status,
            vehicle: vehicle.map(str::to_string),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == ResponderStatus::Available
    }

    /// Whether this unit would be offered for an emergency of `kind`.
    pub fn is_eligible_for(&self, kind: EmergencyType) -> bool {
        self.is_available() && self.kind == kind
    }
}
