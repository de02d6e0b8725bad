use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::analytics::AnalyticsSummary;
use crate::state::health::DeviceHealth;
use crate::state::notifications::{Notification, NotificationLog, Severity};

/// Closed ranges enforced after every write to a bounded field.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 15.0..=35.0;
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 30.0..=70.0;
pub const LIGHT_RANGE: RangeInclusive<f64> = 0.0..=1000.0;
pub const AIR_QUALITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const BATTERY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const COMFORT_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Fan speed setting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FanSpeed {
    Off,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    /// Position on the OFF..HIGH scale, used for energy estimates.
    pub fn power_index(self) -> f64 {
        match self {
            FanSpeed::Off => 0.0,
            FanSpeed::Low => 1.0,
            FanSpeed::Medium => 2.0,
            FanSpeed::High => 3.0,
        }
    }
}

impl Default for FanSpeed {
    fn default() -> Self {
        FanSpeed::Off
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanSpeed::Off => write!(f, "OFF"),
            FanSpeed::Low => write!(f, "LOW"),
            FanSpeed::Medium => write!(f, "MEDIUM"),
            FanSpeed::High => write!(f, "HIGH"),
        }
    }
}

/// Door lock state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorState {
    Locked,
    Unlocked,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorState::Locked => write!(f, "LOCKED"),
            DoorState::Unlocked => write!(f, "UNLOCKED"),
        }
    }
}

/// Alarm arming state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityStatus {
    Armed,
    Disarmed,
}

/// A named preset of actuator settings.
///
/// Activating a scene routes every setting through the same clamped setters
/// a direct command would use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub name: String,
    pub temperature: f64,
    #[serde(default)]
    pub light_level: u8,
    #[serde(default)]
    pub fan_speed: FanSpeed,
    #[serde(default)]
    pub windows_open: bool,
    #[serde(default)]
    pub security: Option<SecurityStatus>,
    #[serde(default)]
    pub description: String,
}

impl Scene {
    /// Scene presets accept a narrower comfort band than the raw sensor range.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && (16.0..=30.0).contains(&self.temperature)
    }

    /// Estimated energy efficiency of the preset, 0-100.
    pub fn efficiency(&self) -> f64 {
        let usage = f64::from(self.light_level) / 255.0
            + self.fan_speed.power_index() / 3.0
            + (self.temperature - 22.0).abs() / 10.0;
        (100.0 - usage * 33.33).max(0.0)
    }
}

/// The canonical mutable record of the home.
///
/// Owned by `HomeEngine`; mutated only by the simulation step and the
/// command pipeline, both of which write bounded fields through the
/// clamped setters below.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub temperature: f64,
    pub humidity: f64,
    pub motion: bool,
    pub light: f64,
    pub air_quality: f64,
    pub door_state: DoorState,
    pub window_opening: u8,
    pub fan_speed: FanSpeed,
    pub light_level: u8,
    pub energy_consumption: f64,
    pub solar_production: f64,
    pub battery_level: f64,
    pub occupancy: bool,
    pub comfort_index: f64,
    pub security_status: SecurityStatus,
    pub notifications: NotificationLog,
    pub device_health: HashMap<String, DeviceHealth>,
    pub scenes: HashMap<String, Scene>,
    pub schedules: HashMap<String, Value>,
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            temperature: 22.0,
            humidity: 45.0,
            motion: false,
            light: 500.0,
            air_quality: 95.0,
            door_state: DoorState::Locked,
            window_opening: 0,
            fan_speed: FanSpeed::Off,
            light_level: 0,
            energy_consumption: 0.0,
            solar_production: 0.0,
            battery_level: 80.0,
            occupancy: false,
            comfort_index: 100.0,
            security_status: SecurityStatus::Disarmed,
            notifications: NotificationLog::default(),
            device_health: HashMap::new(),
            scenes: HashMap::new(),
            schedules: HashMap::new(),
        }
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value.clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end());
    }

    pub fn set_humidity(&mut self, value: f64) {
        self.humidity = value.clamp(*HUMIDITY_RANGE.start(), *HUMIDITY_RANGE.end());
    }

    pub fn set_light(&mut self, value: f64) {
        self.light = value.clamp(*LIGHT_RANGE.start(), *LIGHT_RANGE.end());
    }

    pub fn set_air_quality(&mut self, value: f64) {
        self.air_quality = value.clamp(*AIR_QUALITY_RANGE.start(), *AIR_QUALITY_RANGE.end());
    }

    pub fn set_battery_level(&mut self, value: f64) {
        self.battery_level = value.clamp(*BATTERY_RANGE.start(), *BATTERY_RANGE.end());
    }

    pub fn set_comfort_index(&mut self, value: f64) {
        self.comfort_index = value.clamp(*COMFORT_RANGE.start(), *COMFORT_RANGE.end());
    }

    pub fn set_window_opening(&mut self, percent: u8) {
        self.window_opening = percent.min(100);
    }

    pub fn set_light_level(&mut self, level: u8) {
        self.light_level = level;
    }

    /// Append a notification, evicting the oldest past the cap.
    pub fn notify(&mut self, severity: Severity, message: String, at: DateTime<Utc>) {
        self.notifications.push(Notification::new(severity, message, at));
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable copy of the state at a point in time, sent to observers.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub state: SystemState,
    pub analytics: AnalyticsSummary,
    pub timestamp: DateTime<Utc>,
}

impl StateSnapshot {
    pub fn new(state: SystemState, analytics: AnalyticsSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            state,
            analytics,
            timestamp,
        }
    }
}
