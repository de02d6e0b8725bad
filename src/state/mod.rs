// Shared state model and engine

mod engine;
pub mod health;
mod model;
pub mod notifications;

pub use engine::HomeEngine;
pub use model::{
    DoorState, FanSpeed, Scene, SecurityStatus, StateSnapshot, SystemState, AIR_QUALITY_RANGE,
    BATTERY_RANGE, COMFORT_RANGE, HUMIDITY_RANGE, LIGHT_RANGE, TEMPERATURE_RANGE,
};

#[cfg(test)]
mod tests;
