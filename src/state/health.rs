use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;

use crate::state::model::SystemState;
use crate::state::notifications::Severity;

/// Device categories checked on every command-pipeline invocation.
pub const DEVICE_ROSTER: [&str; 5] = ["HVAC", "Lights", "Security", "Windows", "Doors"];

/// Probability per check that a device flips to WARNING.
const WARNING_PROBABILITY: f64 = 0.01;

/// Lead time for the maintenance visit scheduled on a WARNING flip.
const MAINTENANCE_LEAD_DAYS: i64 = 7;

/// Device health status. WARNING has no recovery transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Ok,
    Warning,
}

/// Health record for one device category
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceHealth {
    pub status: DeviceStatus,
    pub last_check: DateTime<Utc>,
    pub error_count: u32,
    pub next_maintenance: Option<DateTime<Utc>>,
}

/// Refresh the health entry of every roster device.
///
/// Entries are created lazily on first check and never removed.
pub fn refresh(state: &mut SystemState, at: DateTime<Utc>, rng: &mut impl Rng) {
    let mut flagged = Vec::new();

    for device in DEVICE_ROSTER {
        let entry = state
            .device_health
            .entry(device.to_string())
            .or_insert_with(|| DeviceHealth {
                status: DeviceStatus::Ok,
                last_check: at,
                error_count: 0,
                next_maintenance: None,
            });

        entry.last_check = at;

        if rng.gen_bool(WARNING_PROBABILITY) {
            entry.status = DeviceStatus::Warning;
            entry.error_count += 1;
            entry.next_maintenance = Some(at + Duration::days(MAINTENANCE_LEAD_DAYS));
            flagged.push(device);
        }
    }

    for device in flagged {
        state.notify(
            Severity::Warning,
            format!("{} requires maintenance", device),
            at,
        );
    }
}
