//! Emergency domain model.
//!
//! # Responsibility
//! - Define the canonical incident record tracked by the dispatch store.
//! - Validate report input before an emergency is admitted.
//!
//! # Invariants
//! - `id`, `kind` and `reported_at_ms` never change after creation.
//! - `status` is `assigned`/`in_progress` only while `responder` is set.
//! - `status == pending` implies `responder == None`.
//! - A `resolved` emergency may keep its responder snapshot as history.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Description substituted when a report carries no text.
pub const DESCRIPTION_PLACEHOLDER: &str = "No description provided";

/// Location label substituted when a report carries no address.
pub const LOCATION_PLACEHOLDER: &str = "Current Location (automatically detected)";

/// Stable identifier of one emergency (`e1`, `e2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmergencyId(String);

impl EmergencyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EmergencyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EmergencyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Incident category. Also selects which responders are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyType {
    Medical,
    Fire,
    Police,
}

impl EmergencyType {
    pub const ALL: [EmergencyType; 3] = [Self::Medical, Self::Fire, Self::Police];

    /// Wire/CLI name (`medical|fire|police`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Fire => "fire",
            Self::Police => "police",
        }
    }

    /// Human-readable label used by list and selector views.
    pub fn label(self) -> &'static str {
        match self {
            Self::Medical => "Medical Emergency",
            Self::Fire => "Fire Emergency",
            Self::Police => "Police Emergency",
        }
    }

    /// Priority assigned to a fresh report when the caller gives none.
    ///
    /// Medical reports are always critical; everything else starts high.
    pub fn default_priority(self) -> Priority {
        match self {
            Self::Medical => Priority::Critical,
            Self::Fire | Self::Police => Priority::High,
        }
    }
}

impl Display for EmergencyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EmergencyType {
    type Err = EmergencyValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "medical" => Ok(Self::Medical),
            "fire" => Ok(Self::Fire),
            "police" => Ok(Self::Police),
            other => Err(EmergencyValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Urgency level. Set at creation, never changed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = EmergencyValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(EmergencyValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// Emergency lifecycle state.
///
/// The store does not police transitions: any status may follow any other
/// through an explicit status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyStatus {
    /// Reported, no responder yet.
    Pending,
    /// Responder dispatched.
    Assigned,
    /// Responder on scene.
    InProgress,
    /// Closed. Terminal in practice, not enforced.
    Resolved,
}

impl EmergencyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Whether a responder is currently working this emergency.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }
}

impl Display for EmergencyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EmergencyStatus {
    type Err = EmergencyValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(EmergencyValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rejects non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), EmergencyValidationError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(EmergencyValidationError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Incident position plus the free-text address shown to dispatchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub label: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            point: GeoPoint::new(latitude, longitude),
            label: label.into(),
        }
    }
}

/// Copy of a responder taken at assignment time.
///
/// Deliberately a value, not a reference: later changes to the live
/// responder record do not flow back into the emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderSnapshot {
    pub id: super::responder::ResponderId,
    pub name: String,
    pub vehicle: Option<String>,
    /// Estimated arrival in minutes, within `ETA_MIN_MINUTES..=ETA_MAX_MINUTES`.
    pub eta_minutes: u32,
}

/// Input validation failures for emergency reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EmergencyValidationError {
    UnknownType(String),
    UnknownPriority(String),
    UnknownStatus(String),
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl Display for EmergencyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(value) => {
                write!(f, "unknown emergency type `{value}`; expected medical|fire|police")
            }
            Self::UnknownPriority(value) => write!(
                f,
                "unknown priority `{value}`; expected low|medium|high|critical"
            ),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown status `{value}`; expected pending|assigned|in_progress|resolved"
            ),
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(f, "invalid coordinates ({latitude}, {longitude})"),
        }
    }
}

impl Error for EmergencyValidationError {}

/// Canonical incident record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emergency {
    pub id: EmergencyId,
    /// Serialized as `type` to match the UI schema.
    #[serde(rename = "type")]
    pub kind: EmergencyType,
    pub location: Location,
    pub description: String,
    pub priority: Priority,
    pub status: EmergencyStatus,
    pub responder: Option<ResponderSnapshot>,
    /// Unix epoch milliseconds.
    pub reported_at_ms: i64,
}

impl Emergency {
    /// Builds a fresh pending emergency.
    ///
    /// Blank descriptions and location labels are replaced with
    /// [`DESCRIPTION_PLACEHOLDER`] and [`LOCATION_PLACEHOLDER`]; a missing
    /// priority falls back to [`EmergencyType::default_priority`].
    pub fn new(
        id: EmergencyId,
        kind: EmergencyType,
        mut location: Location,
        description: impl Into<String>,
        priority: Option<Priority>,
        reported_at_ms: i64,
    ) -> Self {
        let description = description.into();
        let description = if description.trim().is_empty() {
            DESCRIPTION_PLACEHOLDER.to_string()
        } else {
            description
        };
        if location.label.trim().is_empty() {
            location.label = LOCATION_PLACEHOLDER.to_string();
        }

        Self {
            id,
            kind,
            location,
            description,
            priority: priority.unwrap_or_else(|| kind.default_priority()),
            status: EmergencyStatus::Pending,
            responder: None,
            reported_at_ms,
        }
    }

    /// Checks creation-time input constraints.
    pub fn validate(&self) -> Result<(), EmergencyValidationError> {
        self.location.point.validate()
    }

    /// Still shown on the map (anything but resolved).
    pub fn is_open(&self) -> bool {
        self.status != EmergencyStatus::Resolved
    }

    /// A responder is currently working it.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whole minutes elapsed since the report, floored at zero.
    pub fn minutes_since_report(&self, now_ms: i64) -> i64 {
        (now_ms - self.reported_at_ms).max(0) / 60_000
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Emergency, EmergencyId, EmergencyStatus, EmergencyType, EmergencyValidationError,
        GeoPoint, Location, Priority, DESCRIPTION_PLACEHOLDER, LOCATION_PLACEHOLDER,
    };

    fn report(kind: EmergencyType, description: &str) -> Emergency {
        Emergency::new(
            EmergencyId::new("e9"),
            kind,
            Location::new(28.61, 77.21, "Connaught Place"),
            description,
            None,
            1_000,
        )
    }

    #[test]
    fn priority_defaults_follow_type() {
        assert_eq!(report(EmergencyType::Medical, "x").priority, Priority::Critical);
        assert_eq!(report(EmergencyType::Fire, "x").priority, Priority::High);
        assert_eq!(report(EmergencyType::Police, "x").priority, Priority::High);
    }

    #[test]
    fn blank_description_gets_placeholder() {
        assert_eq!(
            report(EmergencyType::Fire, "   ").description,
            DESCRIPTION_PLACEHOLDER
        );
        assert_eq!(report(EmergencyType::Fire, "smoke").description, "smoke");
    }

    #[test]
    fn blank_location_label_gets_placeholder() {
        let emergency = Emergency::new(
            EmergencyId::new("e9"),
            EmergencyType::Medical,
            Location::new(28.61, 77.21, ""),
            "x",
            None,
            0,
        );
        assert_eq!(emergency.location.label, LOCATION_PLACEHOLDER);
    }

    #[test]
    fn coordinates_must_be_finite_and_in_range() {
        assert!(GeoPoint::new(12.97, 77.59).validate().is_ok());
        assert!(GeoPoint::new(90.0, -180.0).validate().is_ok());
        for point in [
            GeoPoint::new(f64::NAN, 0.0),
            GeoPoint::new(0.0, f64::INFINITY),
            GeoPoint::new(91.0, 0.0),
            GeoPoint::new(0.0, -180.5),
        ] {
            assert!(matches!(
                point.validate(),
                Err(EmergencyValidationError::InvalidCoordinates { .. })
            ));
        }
    }

    #[test]
    fn parses_textual_enums_case_insensitively() {
        assert_eq!("Medical".parse::<EmergencyType>().unwrap(), EmergencyType::Medical);
        assert_eq!(
            " in_progress ".parse::<EmergencyStatus>().unwrap(),
            EmergencyStatus::InProgress
        );
        assert_eq!("CRITICAL".parse::<Priority>().unwrap(), Priority::Critical);
        assert!(matches!(
            "flood".parse::<EmergencyType>(),
            Err(EmergencyValidationError::UnknownType(value)) if value == "flood"
        ));
    }

    #[test]
    fn map_visibility_follows_status() {
        let mut emergency = report(EmergencyType::Fire, "x");
        assert!(emergency.is_open());
        assert!(!emergency.is_active());

        emergency.status = EmergencyStatus::InProgress;
        assert!(emergency.is_open());
        assert!(emergency.is_active());

        emergency.status = EmergencyStatus::Resolved;
        assert!(!emergency.is_open());
        assert!(!emergency.is_active());
    }

    #[test]
    fn minutes_since_report_floors_and_clamps() {
        let emergency = report(EmergencyType::Police, "x");
        assert_eq!(emergency.minutes_since_report(1_000 + 5 * 60_000 + 59_000), 5);
        assert_eq!(emergency.minutes_since_report(0), 0);
    }
}
