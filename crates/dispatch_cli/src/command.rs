//! Console command grammar.
//!
//! One command per line; tokens are whitespace separated. Parsing is pure
//! so the grammar can be tested without a store.

use dispatch_core::{EmergencyFilter, EmergencyId, EmergencyStatus, EmergencyType, ResponderId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Separates the description from an explicit location label in `report`.
const LABEL_MARKER: &str = "@";

pub const HELP: &str = "\
commands:
  list [pending|active|resolved]        list emergencies (all by default)
  responders                            list responders
  report <type> <lat> <lon> [text] [@ label]
                                        report an emergency (type: medical|fire|police)
  assign <emergency_id> <responder_id>  dispatch a responder
  status <emergency_id> <status>        set status (pending|assigned|in_progress|resolved)
  eligible <emergency_id>               available responders of the matching type
  summary                               dashboard counters
  help                                  show this text
  quit                                  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List(EmergencyFilter),
    Responders,
    Report {
        kind: EmergencyType,
        latitude: f64,
        longitude: f64,
        description: String,
        label: String,
    },
    Assign {
        emergency_id: EmergencyId,
        responder_id: ResponderId,
    },
    Status {
        emergency_id: EmergencyId,
        status: EmergencyStatus,
    },
    Eligible(EmergencyId),
    Summary,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, message: String },
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(value) => {
                write!(f, "unknown command `{value}`; type `help` for usage")
            }
            Self::MissingArgument(name) => write!(f, "missing argument <{name}>"),
            Self::InvalidArgument { name, message } => write!(f, "invalid <{name}>: {message}"),
        }
    }
}

impl Error for CommandError {}

/// Parses one console line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List(parse_filter(args.first().copied())?),
        "responders" => Command::Responders,
        "report" => parse_report(&args)?,
        "assign" => Command::Assign {
            emergency_id: EmergencyId::new(required(&args, 0, "emergency_id")?),
            responder_id: ResponderId::new(required(&args, 1, "responder_id")?),
        },
        "status" => Command::Status {
            emergency_id: EmergencyId::new(required(&args, 0, "emergency_id")?),
            status: required(&args, 1, "status")?
                .parse::<EmergencyStatus>()
                .map_err(|err| CommandError::InvalidArgument {
                    name: "status",
                    message: format!("{err}"),
                })?,
        },
        "eligible" => Command::Eligible(EmergencyId::new(required(&args, 0, "emergency_id")?)),
        "summary" => Command::Summary,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_filter(value: Option<&str>) -> Result<EmergencyFilter, CommandError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("all") => Ok(EmergencyFilter::All),
        Some("pending") => Ok(EmergencyFilter::Pending),
        Some("active") => Ok(EmergencyFilter::Active),
        Some("resolved") => Ok(EmergencyFilter::Resolved),
        Some(other) => Err(CommandError::InvalidArgument {
            name: "filter",
            message: format!("`{other}`; expected all|pending|active|resolved"),
        }),
    }
}

fn parse_report(args: &[&str]) -> Result<Command, CommandError> {
    let kind = required(args, 0, "type")?
        .parse::<EmergencyType>()
        .map_err(|err| CommandError::InvalidArgument {
            name: "type",
            message: format!("{err}"),
        })?;
    let latitude = parse_coordinate(required(args, 1, "lat")?, "lat")?;
    let longitude = parse_coordinate(required(args, 2, "lon")?, "lon")?;

    let rest = &args[3..];
    let (description, label) = match rest.iter().position(|token| *token == LABEL_MARKER) {
        Some(index) => (rest[..index].join(" "), rest[index + 1..].join(" ")),
        None => (rest.join(" "), String::new()),
    };

    Ok(Command::Report {
        kind,
        latitude,
        longitude,
        description,
        label,
    })
}

fn parse_coordinate(value: &str, name: &'static str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .map_err(|err| CommandError::InvalidArgument {
            name,
            message: format!("`{value}`: {err}"),
        })
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    name: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument(name))
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command, CommandError};
    use dispatch_core::{EmergencyFilter, EmergencyId, EmergencyStatus, EmergencyType, ResponderId};

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# seed check").unwrap(), None);
    }

    #[test]
    fn parses_report_with_description_and_label() {
        let command = parse_command("report medical 28.61 77.21 chest pain @ Connaught Place")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            Command::Report {
                kind: EmergencyType::Medical,
                latitude: 28.61,
                longitude: 77.21,
                description: "chest pain".to_string(),
                label: "Connaught Place".to_string(),
            }
        );
    }

    #[test]
    fn parses_report_without_description() {
        let command = parse_command("report FIRE 19.07 72.87").unwrap().unwrap();
        assert!(matches!(
            command,
            Command::Report { kind: EmergencyType::Fire, ref description, ref label, .. }
                if description.is_empty() && label.is_empty()
        ));
    }

    #[test]
    fn parses_assign_and_status() {
        assert_eq!(
            parse_command("assign e4 r2").unwrap().unwrap(),
            Command::Assign {
                emergency_id: EmergencyId::new("e4"),
                responder_id: ResponderId::new("r2"),
            }
        );
        assert_eq!(
            parse_command("status e1 in_progress").unwrap().unwrap(),
            Command::Status {
                emergency_id: EmergencyId::new("e1"),
                status: EmergencyStatus::InProgress,
            }
        );
    }

    #[test]
    fn list_defaults_to_all() {
        assert_eq!(
            parse_command("list").unwrap().unwrap(),
            Command::List(EmergencyFilter::All)
        );
        assert_eq!(
            parse_command("list active").unwrap().unwrap(),
            Command::List(EmergencyFilter::Active)
        );
    }

    #[test]
    fn reports_missing_and_invalid_arguments() {
        assert_eq!(
            parse_command("assign e4").unwrap_err(),
            CommandError::MissingArgument("responder_id")
        );
        assert!(matches!(
            parse_command("report flood 1 2").unwrap_err(),
            CommandError::InvalidArgument { name: "type", .. }
        ));
        assert!(matches!(
            parse_command("report police north 2").unwrap_err(),
            CommandError::InvalidArgument { name: "lat", .. }
        ));
        assert_eq!(
            parse_command("dance").unwrap_err(),
            CommandError::UnknownCommand("dance".to_string())
        );
    }
}
