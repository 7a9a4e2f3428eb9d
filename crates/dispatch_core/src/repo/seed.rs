//! Demonstration dataset loaded at store start-up.
//!
//! Three incidents and five units spread over New Delhi, Mumbai and
//! Bengaluru. Timestamps are relative to the caller's clock so "minutes
//! since report" reads naturally in the console.

use crate::model::emergency::{
    Emergency, EmergencyId, EmergencyStatus, EmergencyType, GeoPoint, Location, Priority,
    ResponderSnapshot,
};
use crate::model::responder::{Responder, ResponderStatus};

const MINUTE_MS: i64 = 60_000;

/// Initial tables for a fresh store.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub emergencies: Vec<Emergency>,
    pub responders: Vec<Responder>,
}

/// Returns the built-in demo dataset anchored at `now_ms`.
pub fn seed_dataset(now_ms: i64) -> SeedData {
    let responders = vec![
        Responder::new(
            "r1",
            "Ambulance Unit 7",
            EmergencyType::Medical,
            GeoPoint::new(28.6100, 77.2300),
            ResponderStatus::Busy,
            Some("Type II Ambulance"),
        ),
        Responder::new(
            "r2",
            "Ambulance Unit 3",
            EmergencyType::Medical,
            GeoPoint::new(28.6300, 77.2200),
            ResponderStatus::Available,
            Some("Type I Ambulance"),
        ),
        Responder::new(
            "r3",
            "Fire Unit 2",
            EmergencyType::Fire,
            GeoPoint::new(19.0900, 72.8900),
            ResponderStatus::Busy,
            Some("Fire Truck"),
        ),
        Responder::new(
            "r4",
            "Fire Unit 5",
            EmergencyType::Fire,
            GeoPoint::new(19.0800, 72.8600),
            ResponderStatus::Available,
            Some("Fire Engine"),
        ),
        Responder::new(
            "r5",
            "Police Unit 12",
            EmergencyType::Police,
            GeoPoint::new(12.9800, 77.5800),
            ResponderStatus::Available,
            Some("Police Cruiser"),
        ),
    ];

    let mut cardiac = Emergency::new(
        EmergencyId::new("e1"),
        EmergencyType::Medical,
        Location::new(28.6139, 77.2090, "AIIMS Hospital, Ansari Nagar East, New Delhi"),
        "Heart attack reported, 65-year-old male",
        Some(Priority::Critical),
        now_ms - 15 * MINUTE_MS,
    );
    cardiac.status = EmergencyStatus::InProgress;
    cardiac.responder = Some(snapshot_of(&responders[0], 3));

    let mut kitchen_fire = Emergency::new(
        EmergencyId::new("e2"),
        EmergencyType::Fire,
        Location::new(19.0760, 72.8777, "Dharavi Slum Area, Mumbai"),
        "Kitchen fire reported in residential building",
        Some(Priority::High),
        now_ms - 5 * MINUTE_MS,
    );
    kitchen_fire.status = EmergencyStatus::Assigned;
    kitchen_fire.responder = Some(snapshot_of(&responders[2], 8));

    let break_in = Emergency::new(
        EmergencyId::new("e3"),
        EmergencyType::Police,
        Location::new(12.9716, 77.5946, "MG Road, Bengaluru"),
        "Break-in reported, suspect still on premises",
        Some(Priority::Medium),
        now_ms - 2 * MINUTE_MS,
    );

    SeedData {
        emergencies: vec![cardiac, kitchen_fire, break_in],
        responders,
    }
}

fn snapshot_of(responder: &Responder, eta_minutes: u32) -> ResponderSnapshot {
    ResponderSnapshot {
        id: responder.id.clone(),
        name: responder.name.clone(),
        vehicle: responder.vehicle.clone(),
        eta_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::seed_dataset;
    use std::collections::HashSet;

    #[test]
    fn seed_respects_status_and_snapshot_invariant() {
        let seed = seed_dataset(10_000_000);
        for emergency in &seed.emergencies {
            assert_eq!(
                emergency.status.is_active(),
                emergency.responder.is_some(),
                "emergency {} breaks the status/responder invariant",
                emergency.id
            );
        }
    }

    #[test]
    fn seed_ids_are_unique() {
        let seed = seed_dataset(0);
        let emergency_ids: HashSet<_> = seed.emergencies.iter().map(|e| e.id.clone()).collect();
        let responder_ids: HashSet<_> = seed.responders.iter().map(|r| r.id.clone()).collect();
        assert_eq!(emergency_ids.len(), seed.emergencies.len());
        assert_eq!(responder_ids.len(), seed.responders.len());
    }
}
