use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::command::{Command, Parsed};
use crate::state::health;
use crate::state::notifications::Severity;
use crate::state::{DoorState, Scene, SystemState};

/// Result of running one parsed frame through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State mutated and a notification emitted
    Applied,
    /// Well-formed but rejected; logged only, no reply to the sender
    Dropped,
}

/// Validate and apply one parsed command against the state.
///
/// Device health is refreshed on every invocation, whether or not the
/// command itself was applied.
pub fn apply(
    state: &mut SystemState,
    parsed: Parsed,
    at: DateTime<Utc>,
    rng: &mut impl Rng,
) -> CommandOutcome {
    let outcome = match parsed {
        Parsed::Command(command) => apply_command(state, command, at),
        Parsed::Invalid { kind, reason } => {
            warn!(kind = %kind, reason = %reason, "Dropping command with invalid value");
            CommandOutcome::Dropped
        }
        Parsed::Unknown { kind } => {
            warn!(kind = %kind, "Ignoring unrecognized command type");
            CommandOutcome::Dropped
        }
    };

    health::refresh(state, at, rng);
    outcome
}

fn apply_command(state: &mut SystemState, command: Command, at: DateTime<Utc>) -> CommandOutcome {
    match command {
        Command::SetTemperature(value) => {
            state.set_temperature(value);
            info!(value = value, "Temperature setpoint changed");
            state.notify(
                Severity::Info,
                format!("Temperature set to {:.1}°C", value),
                at,
            );
        }
        Command::SetFan(speed) => {
            state.fan_speed = speed;
            info!(speed = %speed, "Fan speed changed");
            state.notify(Severity::Info, format!("Fan speed set to {}", speed), at);
        }
        Command::SetLight(level) => {
            state.set_light_level(level);
            info!(level = level, "Light level changed");
            state.notify(Severity::Info, format!("Light level set to {}", level), at);
        }
        Command::SetWindow(percent) => {
            state.set_window_opening(percent);
            info!(percent = percent, "Window opening changed");
            state.notify(
                Severity::Info,
                format!("Window opening set to {}%", percent),
                at,
            );
        }
        Command::SetDoor(door) => {
            state.door_state = door;
            info!(door = %door, "Door state changed");
            let message = match door {
                DoorState::Locked => "Door locked",
                DoorState::Unlocked => "Door unlocked",
            };
            state.notify(Severity::Info, message.to_string(), at);
        }
        Command::CreateSchedule { device, schedule } => {
            info!(device = %device, "Schedule stored");
            state.schedules.insert(device.clone(), schedule);
            state.notify(
                Severity::Info,
                format!("Schedule updated for {}", device),
                at,
            );
        }
        Command::CreateScene(scene) => {
            let name = scene.name.clone();
            let efficiency = scene.efficiency();
            info!(scene = %name, efficiency = efficiency, "Scene stored");
            state.scenes.insert(name.clone(), scene);
            state.notify(
                Severity::Info,
                format!("Scene '{}' saved ({:.0}% efficient)", name, efficiency),
                at,
            );
        }
        Command::ActivateScene(name) => match state.scenes.get(&name).cloned() {
            Some(scene) => apply_scene(state, &scene, at),
            None => {
                warn!(scene = %name, "Scene not found");
                return CommandOutcome::Dropped;
            }
        },
    }

    CommandOutcome::Applied
}

/// Apply a stored scene preset through the same clamped setters a direct
/// command would use.
fn apply_scene(state: &mut SystemState, scene: &Scene, at: DateTime<Utc>) {
    state.set_temperature(scene.temperature);
    state.set_light_level(scene.light_level);
    state.fan_speed = scene.fan_speed;
    state.set_window_opening(if scene.windows_open { 100 } else { 0 });
    if let Some(security) = scene.security {
        state.security_status = security;
    }
    info!(scene = %scene.name, "Scene activated");
    state.notify(
        Severity::Info,
        format!("Scene '{}' activated", scene.name),
        at,
    );
}
