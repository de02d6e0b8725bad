use crate::command::{parse, Command, Parsed, ParseError};
use crate::state::{DoorState, TEMPERATURE_RANGE};

/// Produces a structured command from one raw inbound frame.
///
/// The structured-JSON variant is the wire default. The keyword variant
/// covers free-text phrases, and a richer language mapper can sit behind
/// the same seam without touching the pipeline.
pub trait CommandSource: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Parsed, ParseError>;
}

/// Structured JSON command frames
pub struct JsonCommands;

impl CommandSource for JsonCommands {
    fn parse(&self, raw: &str) -> Result<Parsed, ParseError> {
        parse(raw)
    }
}

/// Free-text phrase mapper ("lights on", "set temperature to 24", ...)
pub struct KeywordCommands;

impl CommandSource for KeywordCommands {
    fn parse(&self, raw: &str) -> Result<Parsed, ParseError> {
        let text = raw.trim().to_ascii_lowercase();

        let parsed = if text.contains("lights on") {
            Parsed::Command(Command::SetLight(255))
        } else if text.contains("lights off") {
            Parsed::Command(Command::SetLight(0))
        } else if text.contains("open windows") {
            Parsed::Command(Command::SetWindow(100))
        } else if text.contains("close windows") {
            Parsed::Command(Command::SetWindow(0))
        } else if text.contains("unlock") {
            Parsed::Command(Command::SetDoor(DoorState::Unlocked))
        } else if text.contains("lock") {
            Parsed::Command(Command::SetDoor(DoorState::Locked))
        } else if text.contains("temperature") {
            match target_value(&text) {
                Some(v) if TEMPERATURE_RANGE.contains(&v) => {
                    Parsed::Command(Command::SetTemperature(v))
                }
                Some(v) => Parsed::Invalid {
                    kind: "SET_TEMPERATURE".to_string(),
                    reason: format!("temperature {} out of range", v),
                },
                None => Parsed::Invalid {
                    kind: "SET_TEMPERATURE".to_string(),
                    reason: "no target temperature in phrase".to_string(),
                },
            }
        } else {
            Parsed::Unknown { kind: text }
        };

        Ok(parsed)
    }
}

/// "increase temperature to 24 degrees" -> 24.0
fn target_value(text: &str) -> Option<f64> {
    text.split(" to ")
        .nth(1)?
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
}
