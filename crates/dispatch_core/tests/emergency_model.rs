use dispatch_core::{
    seed_dataset, Emergency, EmergencyId, EmergencyStatus, EmergencyType, Location, Priority,
    Responder,
};
use serde_json::json;

#[test]
fn emergency_serializes_with_ui_field_names() {
    let emergency = Emergency::new(
        EmergencyId::new("e4"),
        EmergencyType::Medical,
        Location::new(28.61, 77.21, "Connaught Place"),
        "chest pain",
        None,
        1_000,
    );

    let value = serde_json::to_value(&emergency).unwrap();
    assert_eq!(value["id"], json!("e4"));
    assert_eq!(value["type"], json!("medical"));
    assert_eq!(value["priority"], json!("critical"));
    assert_eq!(value["status"], json!("pending"));
    assert_eq!(value["responder"], json!(null));
    assert_eq!(value["location"]["latitude"], json!(28.61));
    assert_eq!(value["location"]["label"], json!("Connaught Place"));
}

#[test]
fn seeded_records_survive_json_roundtrip() {
    let seed = seed_dataset(1_750_000_000_000);

    let text = serde_json::to_string(&seed.emergencies).unwrap();
    let back: Vec<Emergency> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, seed.emergencies);
    assert_eq!(back[0].status, EmergencyStatus::InProgress);

    let text = serde_json::to_string(&seed.responders).unwrap();
    let back: Vec<Responder> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, seed.responders);
}

#[test]
fn in_progress_status_uses_snake_case() {
    assert_eq!(
        serde_json::to_value(EmergencyStatus::InProgress).unwrap(),
        json!("in_progress")
    );
    let parsed: Priority = serde_json::from_value(json!("medium")).unwrap();
    assert_eq!(parsed, Priority::Medium);
}

#[test]
fn type_labels_match_selector_copy() {
    let labels: Vec<&str> = EmergencyType::ALL.iter().map(|kind| kind.label()).collect();
    assert_eq!(
        labels,
        vec!["Medical Emergency", "Fire Emergency", "Police Emergency"]
    );
}
