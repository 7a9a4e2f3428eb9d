//! Dispatcher console session.
//!
//! # Responsibility
//! - Apply parsed commands to one `DispatchStore`.
//! - Render list/detail views and flush toasts after each command.
//!
//! # Invariants
//! - Store errors are printed and the session continues.

use crate::command::{Command, HELP};
use dispatch_core::{
    DispatchError, DispatchStore, Emergency, EmergencyListQuery, Location, NewEmergency,
    RecordingSink, Responder,
};
use std::io::{self, Write};

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Console {
    store: DispatchStore,
    toasts: RecordingSink,
}

impl Console {
    /// Wires `store` so its toasts are printed by this console.
    pub fn new(store: DispatchStore) -> Self {
        let toasts = RecordingSink::new();
        let store = store.with_notification_sink(toasts.clone());
        Self { store, toasts }
    }

    pub fn store(&self) -> &DispatchStore {
        &self.store
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::List(filter) => {
                let query = EmergencyListQuery {
                    filter,
                    ..EmergencyListQuery::default()
                };
                let now_ms = self.store.now_ms();
                let items = self.store.list_emergencies(&query);
                if items.is_empty() {
                    writeln!(out, "no emergencies")?;
                }
                for emergency in items {
                    write_emergency(out, emergency, now_ms)?;
                }
            }
            Command::Responders => {
                for responder in self.store.responders() {
                    write_responder(out, responder)?;
                }
            }
            Command::Report {
                kind,
                latitude,
                longitude,
                description,
                label,
            } => {
                let request =
                    NewEmergency::new(kind, Location::new(latitude, longitude, label), description);
                match self.store.add_emergency(request) {
                    Ok(created) => writeln!(
                        out,
                        "reported {} priority={}",
                        created.id, created.priority
                    )?,
                    Err(err) => write_error(out, &err)?,
                }
            }
            Command::Assign {
                emergency_id,
                responder_id,
            } => match self.store.assign_responder(&emergency_id, &responder_id) {
                Ok(snapshot) => writeln!(
                    out,
                    "assigned {} to {emergency_id}, eta {} min",
                    snapshot.name, snapshot.eta_minutes
                )?,
                Err(err) => write_error(out, &err)?,
            },
            Command::Status {
                emergency_id,
                status,
            } => match self.store.update_emergency_status(&emergency_id, status) {
                Ok(previous) => writeln!(out, "{emergency_id}: {previous} -> {status}")?,
                Err(err) => write_error(out, &err)?,
            },
            Command::Eligible(emergency_id) => {
                match self.store.available_responders_for(&emergency_id) {
                    Ok(candidates) if candidates.is_empty() => {
                        writeln!(out, "no available responders for this emergency type")?
                    }
                    Ok(candidates) => {
                        for responder in candidates {
                            write_responder(out, responder)?;
                        }
                    }
                    Err(err) => write_error(out, &err)?,
                }
            }
            Command::Summary => {
                let summary = self.store.summary();
                writeln!(
                    out,
                    "pending={} active={} resolved={} available_responders={}",
                    summary.pending, summary.active, summary.resolved, summary.available_responders
                )?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Stop),
        }

        for toast in self.toasts.drain() {
            writeln!(out, "[{}] {}", toast.title, toast.description)?;
        }
        Ok(Flow::Continue)
    }
}

fn write_error(out: &mut impl Write, err: &DispatchError) -> io::Result<()> {
    writeln!(out, "error: {err}")
}

fn write_emergency(out: &mut impl Write, emergency: &Emergency, now_ms: i64) -> io::Result<()> {
    writeln!(
        out,
        "{:<6} {:<9} {:<8} {:<11} {:>3}m ago  {} ({:.4}, {:.4})",
        emergency.id,
        emergency.kind,
        emergency.priority,
        emergency.status,
        emergency.minutes_since_report(now_ms),
        emergency.location.label,
        emergency.location.point.latitude,
        emergency.location.point.longitude,
    )?;
    writeln!(out, "       {}", emergency.description)?;
    if let Some(responder) = &emergency.responder {
        writeln!(
            out,
            "       responder: {} ({}) eta {} min",
            responder.name,
            responder.vehicle.as_deref().unwrap_or(emergency.kind.label()),
            responder.eta_minutes
        )?;
    }
    Ok(())
}

fn write_responder(out: &mut impl Write, responder: &Responder) -> io::Result<()> {
    writeln!(
        out,
        "{:<6} {:<18} {:<9} {:<10} {}",
        responder.id,
        responder.name,
        responder.kind,
        responder.status,
        responder.vehicle.as_deref().unwrap_or(responder.kind.label()),
    )
}

#[cfg(test)]
mod tests {
    use super::{Console, Flow};
    use crate::command::parse_command;
    use dispatch_core::{
        seed_dataset, DispatchStore, EmergencyId, EmergencyStatus, FixedClock, FixedEta,
        InMemoryDispatchRepository, ResponderId, ResponderStatus,
    };

    const NOW_MS: i64 = 1_750_000_000_000;

    fn console() -> Console {
        let repo = InMemoryDispatchRepository::with_seed(seed_dataset(NOW_MS)).unwrap();
        Console::new(
            DispatchStore::new(repo)
                .with_clock(FixedClock(NOW_MS))
                .with_eta_source(FixedEta::new(4)),
        )
    }

    fn run(console: &mut Console, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let command = parse_command(line).unwrap().unwrap();
        let flow = console.execute(command, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn report_and_assign_print_toasts() {
        let mut console = console();

        let (_, output) = run(&mut console, "report medical 28.61 77.21 chest pain");
        assert!(output.contains("reported e4 priority=critical"));
        assert!(output.contains("[Emergency reported] Help is on the way!"));

        let (_, output) = run(&mut console, "assign e4 r2");
        assert!(output.contains("assigned Ambulance Unit 3 to e4, eta 4 min"));
        assert!(output.contains("[Responder assigned]"));

        let store = console.store();
        assert_eq!(
            store.get_emergency(&EmergencyId::new("e4")).unwrap().status,
            EmergencyStatus::Assigned
        );
        assert_eq!(
            store.get_responder(&ResponderId::new("r2")).unwrap().status,
            ResponderStatus::Busy
        );
    }

    #[test]
    fn store_errors_are_printed_and_session_continues() {
        let mut console = console();

        let (flow, output) = run(&mut console, "assign bad-id r2");
        assert_eq!(flow, Flow::Continue);
        assert!(output.contains("error: emergency `bad-id` not found"));
        assert!(!output.contains("[Responder assigned]"));
    }

    #[test]
    fn eligible_lists_matching_available_units() {
        let mut console = console();
        let (_, output) = run(&mut console, "eligible e2");
        assert!(output.contains("Fire Unit 5"));
        assert!(!output.contains("Fire Unit 2"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut console = console();
        let (flow, _) = run(&mut console, "quit");
        assert_eq!(flow, Flow::Stop);
    }
}
