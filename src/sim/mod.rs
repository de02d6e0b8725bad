use chrono::{DateTime, Timelike, Utc};
use rand::Rng;
use std::f64::consts::PI;

use crate::analytics::TickSample;
use crate::state::notifications::Severity;
use crate::state::{SecurityStatus, SystemState};

/// Baseline draw of the house with everything idle, in watts.
const BASE_LOAD_W: f64 = 150.0;

/// Added while the temperature sits more than 2°C from the 22°C setpoint.
const HVAC_SURCHARGE_W: f64 = 800.0;

/// Lighting draw at light level 255.
const LIGHTING_MAX_W: f64 = 200.0;

/// Added while the home is occupied.
const OCCUPANCY_SURCHARGE_W: f64 = 120.0;

/// Array output at peak efficiency (noon).
const SOLAR_PEAK_W: f64 = 1500.0;

/// Battery percent gained per watt of solar surplus per tick.
const BATTERY_RATE: f64 = 0.0001;

/// Probability per tick that occupancy is re-evaluated.
const OCCUPANCY_REEVAL_PROBABILITY: f64 = 0.05;

/// Advance the shared state by one tick at `at`.
///
/// Steps run in order and each reads the values written by the previous
/// one, so intra-tick coupling (energy following the new temperature and
/// light level) is intentional. Every bounded write goes through a clamped
/// setter; an out-of-range value cannot escape a tick.
pub fn advance(state: &mut SystemState, at: DateTime<Utc>, rng: &mut impl Rng) -> TickSample {
    let hour = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;

    // Occupancy re-evaluates occasionally instead of flickering every tick
    if rng.gen_bool(OCCUPANCY_REEVAL_PROBABILITY) {
        state.occupancy = rng.gen::<f64>() < occupied_probability(at.hour());
    }

    // Diurnal temperature curve plus noise
    let temperature = 22.0 + 3.0 * (2.0 * PI * hour / 24.0).sin() + rng.gen_range(-0.5..0.5);
    state.set_temperature(temperature);

    // Humidity drifts toward dampness when occupied, dryness when not
    let bias = if state.occupancy { 0.1 } else { -0.1 };
    state.set_humidity(state.humidity + rng.gen_range(-0.3..0.3) + bias);

    // Motion fires more often when occupied
    let threshold = if state.occupancy { 0.7 } else { 0.95 };
    state.motion = rng.gen::<f64>() > threshold;

    // Ambient light redrawn from the day or night band
    let lux = if is_daylight(at.hour()) {
        rng.gen_range(500.0..800.0)
    } else {
        rng.gen_range(50.0..150.0)
    };
    state.set_light(lux);

    // Air quality decays under occupancy, recovers otherwise
    let delta = if state.occupancy { -0.3 } else { 0.1 };
    state.set_air_quality(state.air_quality + delta);

    // Energy: base load, HVAC far from setpoint, lighting, occupancy
    let mut consumption = BASE_LOAD_W;
    if (state.temperature - 22.0).abs() > 2.0 {
        consumption += HVAC_SURCHARGE_W;
    }
    consumption += f64::from(state.light_level) / 255.0 * LIGHTING_MAX_W;
    if state.occupancy {
        consumption += OCCUPANCY_SURCHARGE_W;
    }
    state.energy_consumption = consumption;

    // Solar: triangular efficiency curve peaking at noon
    state.solar_production = if is_daylight(at.hour()) {
        let efficiency = (1.0 - (hour - 12.0).abs() / 6.0).max(0.0);
        SOLAR_PEAK_W * efficiency * rng.gen_range(0.8..1.2)
    } else {
        0.0
    };

    // Battery follows the solar surplus
    state.set_battery_level(
        state.battery_level + (state.solar_production - state.energy_consumption) * BATTERY_RATE,
    );

    // Comfort index from temperature, humidity and air quality
    let temp_factor = 1.0 - (state.temperature - 22.0).abs() / 10.0;
    let humidity_factor = 1.0 - (state.humidity - 50.0).abs() / 30.0;
    let air_factor = state.air_quality / 100.0;
    state.set_comfort_index((temp_factor + humidity_factor + air_factor) / 3.0 * 100.0);

    // Motion while armed is a security event
    if state.motion && state.security_status == SecurityStatus::Armed {
        state.notify(Severity::Alert, "Motion detected while armed".to_string(), at);
    }

    TickSample {
        timestamp: at,
        consumption: state.energy_consumption,
        production: state.solar_production,
        temperature: state.temperature,
        humidity: state.humidity,
    }
}

fn is_daylight(hour: u32) -> bool {
    (6..=18).contains(&hour)
}

fn occupied_probability(hour: u32) -> f64 {
    if (8..18).contains(&hour) {
        0.3
    } else {
        0.9
    }
}
