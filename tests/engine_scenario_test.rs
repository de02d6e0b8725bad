// Observer session flow exercised against the engine API: initial snapshot,
// tick, permissive command handling, and the malformed-frame error path.

use hearth::command::{parse, CommandOutcome, Parsed};
use hearth::config::HearthConfig;
use hearth::state::{DoorState, HomeEngine, TEMPERATURE_RANGE};

#[test]
fn observer_session_flow() {
    let engine = HomeEngine::new(&HearthConfig::default());

    // Connect: the initial snapshot is already in range
    let initial = engine.snapshot();
    assert!(TEMPERATURE_RANGE.contains(&initial.state.temperature));
    assert_eq!(initial.state.door_state, DoorState::Locked);

    // One tick later: updated snapshot, still in range
    let update = engine.tick();
    assert!(TEMPERATURE_RANGE.contains(&update.state.temperature));
    assert_eq!(update.analytics.sample_count, 1);

    // Out-of-range setpoint: parsed but dropped, no error, no mutation
    let parsed = parse(r#"{"type":"SET_TEMPERATURE","value":40}"#).unwrap();
    assert!(matches!(parsed, Parsed::Invalid { .. }));
    assert_eq!(engine.apply(parsed), CommandOutcome::Dropped);
    let after_drop = engine.snapshot();
    assert_eq!(after_drop.state.temperature, update.state.temperature);

    // Unlock the door: applied, notification mentions "unlocked"
    let parsed = parse(r#"{"type":"SET_DOOR","value":"UNLOCKED"}"#).unwrap();
    assert_eq!(engine.apply(parsed), CommandOutcome::Applied);
    let after_unlock = engine.snapshot();
    assert_eq!(after_unlock.state.door_state, DoorState::Unlocked);
    assert!(after_unlock
        .state
        .notifications
        .iter()
        .any(|n| n.message.contains("unlocked")));

    // Malformed frame fails at parse and never reaches the engine
    let err = parse("not-json").unwrap_err();
    assert!(err.to_string().contains("invalid JSON"));
    let after_malformed = engine.snapshot();
    assert_eq!(
        after_malformed.state.door_state,
        after_unlock.state.door_state
    );
    assert_eq!(
        after_malformed.state.notifications.len(),
        after_unlock.state.notifications.len()
    );
}
