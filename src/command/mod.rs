use serde_json::Value;
use std::fmt;

mod pipeline;
mod source;

pub use pipeline::{apply, CommandOutcome};
pub use source::{CommandSource, JsonCommands, KeywordCommands};

use crate::state::{DoorState, FanSpeed, Scene, TEMPERATURE_RANGE};

/// A validated control command, ready for the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetTemperature(f64),
    SetFan(FanSpeed),
    SetLight(u8),
    SetWindow(u8),
    SetDoor(DoorState),
    CreateSchedule { device: String, schedule: Value },
    CreateScene(Scene),
    ActivateScene(String),
}

/// Outcome of parsing one inbound frame.
///
/// `Invalid` and `Unknown` are deliberate no-ops: a well-formed frame with a
/// bad value or an unrecognized tag is dropped without a reply, while a
/// malformed frame (`ParseError`) is reported back to the sender.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    Command(Command),
    Invalid { kind: String, reason: String },
    Unknown { kind: String },
}

/// Malformed inbound payload: not parseable into any command shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    NotJson(String),
    NotAnObject,
    MissingType,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotJson(e) => write!(f, "invalid JSON: {}", e),
            ParseError::NotAnObject => write!(f, "command must be a JSON object"),
            ParseError::MissingType => write!(f, "command must carry a string 'type' field"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one inbound text frame.
///
/// Value validation happens here so the pipeline only ever sees commands it
/// can apply; range and enum rules follow the clamped state setters.
pub fn parse(raw: &str) -> Result<Parsed, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::NotJson(e.to_string()))?;
    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingType)?;

    let parsed = match kind {
        "SET_TEMPERATURE" => match obj.get("value").and_then(Value::as_f64) {
            Some(v) if TEMPERATURE_RANGE.contains(&v) => {
                Parsed::Command(Command::SetTemperature(v))
            }
            Some(v) => invalid(kind, format!("temperature {} out of range", v)),
            None => invalid(kind, "value must be a number".to_string()),
        },
        "SET_FAN" => match obj.get("value").cloned() {
            Some(v) => match serde_json::from_value::<FanSpeed>(v) {
                Ok(speed) => Parsed::Command(Command::SetFan(speed)),
                Err(_) => invalid(kind, "value must be one of OFF, LOW, MEDIUM, HIGH".to_string()),
            },
            None => invalid(kind, "value is required".to_string()),
        },
        "SET_LIGHT" => match obj.get("value").and_then(Value::as_u64) {
            Some(v) if v <= 255 => Parsed::Command(Command::SetLight(v as u8)),
            Some(v) => invalid(kind, format!("light level {} out of range", v)),
            None => invalid(kind, "value must be an integer".to_string()),
        },
        "SET_WINDOW" => match obj.get("value").and_then(Value::as_u64) {
            Some(v) if v <= 100 => Parsed::Command(Command::SetWindow(v as u8)),
            Some(v) => invalid(kind, format!("window opening {} out of range", v)),
            None => invalid(kind, "value must be an integer".to_string()),
        },
        "SET_DOOR" => match obj.get("value").cloned() {
            Some(v) => match serde_json::from_value::<DoorState>(v) {
                Ok(door) => Parsed::Command(Command::SetDoor(door)),
                Err(_) => invalid(kind, "value must be LOCKED or UNLOCKED".to_string()),
            },
            None => invalid(kind, "value is required".to_string()),
        },
        "CREATE_SCHEDULE" => {
            let device = obj.get("device").and_then(Value::as_str);
            match (device, obj.get("schedule")) {
                (Some(device), Some(schedule)) => Parsed::Command(Command::CreateSchedule {
                    device: device.to_string(),
                    schedule: schedule.clone(),
                }),
                _ => invalid(kind, "requires 'device' and 'schedule' fields".to_string()),
            }
        }
        "CREATE_SCENE" => match obj.get("scene").cloned() {
            Some(v) => match serde_json::from_value::<Scene>(v) {
                Ok(scene) if scene.is_valid() => Parsed::Command(Command::CreateScene(scene)),
                Ok(scene) => invalid(kind, format!("scene '{}' fails validation", scene.name)),
                Err(e) => invalid(kind, format!("bad scene payload: {}", e)),
            },
            None => invalid(kind, "requires a 'scene' payload".to_string()),
        },
        "ACTIVATE_SCENE" => match obj.get("name").and_then(Value::as_str) {
            Some(name) => Parsed::Command(Command::ActivateScene(name.to_string())),
            None => invalid(kind, "requires a 'name' field".to_string()),
        },
        _ => Parsed::Unknown {
            kind: kind.to_string(),
        },
    };

    Ok(parsed)
}

fn invalid(kind: &str, reason: String) -> Parsed {
    Parsed::Invalid {
        kind: kind.to_string(),
        reason,
    }
}
