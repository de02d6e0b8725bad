use super::health::{self, DeviceStatus};
use super::notifications::Severity;
use super::*;
use crate::analytics::AnalyticsWindow;
use crate::command::{parse, Parsed};
use crate::config::HearthConfig;
use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

// ── clamped setters ──────────────────────────────────────────────────────────

#[test]
fn setters_clamp_to_declared_ranges() {
    let mut state = SystemState::new();

    state.set_temperature(50.0);
    assert_eq!(state.temperature, 35.0);
    state.set_temperature(-10.0);
    assert_eq!(state.temperature, 15.0);

    state.set_humidity(5.0);
    assert_eq!(state.humidity, 30.0);
    state.set_humidity(95.0);
    assert_eq!(state.humidity, 70.0);

    state.set_light(2000.0);
    assert_eq!(state.light, 1000.0);

    state.set_air_quality(150.0);
    assert_eq!(state.air_quality, 100.0);

    state.set_battery_level(-5.0);
    assert_eq!(state.battery_level, 0.0);

    state.set_window_opening(250);
    assert_eq!(state.window_opening, 100);
}

// ── device health ────────────────────────────────────────────────────────────

#[test]
fn health_entries_created_lazily_and_never_removed() {
    let mut state = SystemState::new();
    let mut rng = StdRng::seed_from_u64(1);

    health::refresh(&mut state, now(), &mut rng);
    assert_eq!(state.device_health.len(), 5);

    let later = now() + Duration::minutes(5);
    health::refresh(&mut state, later, &mut rng);
    assert_eq!(state.device_health.len(), 5);
    assert!(state.device_health.values().all(|h| h.last_check == later));
}

#[test]
fn warning_flip_schedules_maintenance_and_notifies() {
    let mut state = SystemState::new();
    let mut rng = StdRng::seed_from_u64(1);

    // 2000 refreshes x 5 devices at p=0.01 make at least one flip certain
    for i in 0..2000 {
        health::refresh(&mut state, now() + Duration::seconds(i), &mut rng);
    }

    let warned: Vec<_> = state
        .device_health
        .values()
        .filter(|h| h.status == DeviceStatus::Warning)
        .collect();
    assert!(!warned.is_empty());
    assert!(warned.iter().all(|h| h.error_count >= 1));
    assert!(warned.iter().all(|h| h.next_maintenance.is_some()));
    assert!(state
        .notifications
        .iter()
        .any(|n| n.severity == Severity::Warning && n.message.contains("maintenance")));
}

// ── scenes ───────────────────────────────────────────────────────────────────

#[test]
fn scene_efficiency_matches_formula() {
    let idle = Scene {
        name: "Idle".to_string(),
        temperature: 22.0,
        light_level: 0,
        fan_speed: FanSpeed::Off,
        windows_open: false,
        security: None,
        description: String::new(),
    };
    assert_eq!(idle.efficiency(), 100.0);

    let heavy = Scene {
        name: "Heavy".to_string(),
        temperature: 22.0,
        light_level: 255,
        fan_speed: FanSpeed::High,
        windows_open: false,
        security: None,
        description: String::new(),
    };
    // usage = 1 + 1 + 0 -> 100 - 66.66
    assert!((heavy.efficiency() - 33.34).abs() < 0.01);
}

// ── snapshot serialization ───────────────────────────────────────────────────

#[test]
fn snapshot_serializes_camel_case_with_iso_timestamp() {
    let snapshot = StateSnapshot::new(
        SystemState::new(),
        AnalyticsWindow::new(24).summary(),
        now(),
    );
    let json = serde_json::to_string(&snapshot).unwrap();

    assert!(json.contains("\"airQuality\":95.0"));
    assert!(json.contains("\"doorState\":\"LOCKED\""));
    assert!(json.contains("\"fanSpeed\":\"OFF\""));
    assert!(json.contains("\"windowOpening\":0"));
    assert!(json.contains("\"lightLevel\":0"));
    assert!(json.contains("\"securityStatus\":\"DISARMED\""));
    assert!(json.contains("\"sampleCount\":0"));
    assert!(json.contains("\"timestamp\":\"2024-06-01T12:00:00Z\""));
}

// ── engine ───────────────────────────────────────────────────────────────────

#[test]
fn tick_keeps_bounds_and_feeds_analytics() {
    let engine = HomeEngine::new(&HearthConfig::default());

    let first = engine.tick();
    assert!(TEMPERATURE_RANGE.contains(&first.state.temperature));
    assert_eq!(first.analytics.sample_count, 1);

    let second = engine.tick();
    assert_eq!(second.analytics.sample_count, 2);
}

#[test]
fn snapshot_does_not_advance_simulation() {
    let engine = HomeEngine::new(&HearthConfig::default());
    engine.tick();

    let a = engine.snapshot();
    let b = engine.snapshot();
    assert_eq!(a.state.temperature, b.state.temperature);
    assert_eq!(a.analytics.sample_count, b.analytics.sample_count);
}

#[test]
fn engine_applies_parsed_commands() {
    let engine = HomeEngine::new(&HearthConfig::default());
    let parsed = parse(r#"{"type":"SET_DOOR","value":"UNLOCKED"}"#).unwrap();
    assert!(matches!(parsed, Parsed::Command(_)));

    engine.apply(parsed);
    assert_eq!(engine.snapshot().state.door_state, DoorState::Unlocked);
}

#[test]
fn connection_gauge_tracks_open_and_close() {
    let engine = HomeEngine::new(&HearthConfig::default());
    assert_eq!(engine.connection_count(), 0);
    assert_eq!(engine.connection_opened(), 1);
    assert_eq!(engine.connection_opened(), 2);
    assert_eq!(engine.connection_closed(), 1);
    assert_eq!(engine.connection_count(), 1);
}
