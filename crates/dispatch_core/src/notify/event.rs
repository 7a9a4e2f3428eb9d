//! Store change events and toast notifications.

use crate::model::emergency::{EmergencyId, EmergencyStatus, EmergencyType, Priority};
use crate::model::responder::ResponderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One committed store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    EmergencyReported {
        emergency_id: EmergencyId,
        kind: EmergencyType,
        priority: Priority,
    },
    ResponderAssigned {
        emergency_id: EmergencyId,
        responder_id: ResponderId,
        responder_name: String,
        eta_minutes: u32,
    },
    EmergencyStatusChanged {
        emergency_id: EmergencyId,
        from: EmergencyStatus,
        to: EmergencyStatus,
    },
}

impl StoreEvent {
    pub fn emergency_id(&self) -> &EmergencyId {
        match self {
            Self::EmergencyReported { emergency_id, .. }
            | Self::ResponderAssigned { emergency_id, .. }
            | Self::EmergencyStatusChanged { emergency_id, .. } => emergency_id,
        }
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
}

/// User-facing toast derived from a store event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique per toast so UIs can de-duplicate redelivery.
    pub id: Uuid,
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub emergency_id: EmergencyId,
}

impl Notification {
    /// Builds the toast for `event`, if that event is toast-worthy.
    ///
    /// Status changes are observable through `StoreEvent` only.
    pub fn for_event(event: &StoreEvent) -> Option<Self> {
        let (title, description) = match event {
            StoreEvent::EmergencyReported { .. } => {
                ("Emergency reported".to_string(), "Help is on the way!".to_string())
            }
            StoreEvent::ResponderAssigned { responder_name, .. } => (
                "Responder assigned".to_string(),
                format!("{responder_name} has been assigned to the emergency"),
            ),
            StoreEvent::EmergencyStatusChanged { .. } => return None,
        };

        Some(Self {
            id: Uuid::new_v4(),
            level: NotificationLevel::Success,
            title,
            description,
            emergency_id: event.emergency_id().clone(),
        })
    }
}
