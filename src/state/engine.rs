use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::analytics::AnalyticsWindow;
use crate::command::{self, CommandOutcome, Parsed};
use crate::config::HearthConfig;
use crate::sim;
use crate::state::model::{StateSnapshot, SystemState};

/// Owns the shared home state and its derived analytics.
///
/// All mutation funnels through `tick` and `apply`; observers only ever see
/// immutable snapshots. The lock is held for one tick or one command at a
/// time, so mutations form a simple linear history.
pub struct HomeEngine {
    state: RwLock<SystemState>,
    analytics: RwLock<AnalyticsWindow>,
    connections: AtomicU64,
}

impl HomeEngine {
    pub fn new(config: &HearthConfig) -> Self {
        Self {
            state: RwLock::new(SystemState::new()),
            analytics: RwLock::new(AnalyticsWindow::new(config.analytics.retention_hours)),
            connections: AtomicU64::new(0),
        }
    }

    /// Advance the simulation one tick and return the post-tick snapshot.
    pub fn tick(&self) -> StateSnapshot {
        let at = Utc::now();
        let mut state = self.state.write().unwrap();
        let sample = sim::advance(&mut state, at, &mut rand::thread_rng());

        let mut analytics = self.analytics.write().unwrap();
        analytics.record(sample);

        StateSnapshot::new(state.clone(), analytics.summary(), at)
    }

    /// Run one parsed command through the pipeline.
    pub fn apply(&self, parsed: Parsed) -> CommandOutcome {
        let at = Utc::now();
        let mut state = self.state.write().unwrap();
        command::apply(&mut state, parsed, at, &mut rand::thread_rng())
    }

    /// Immutable copy of the current state without advancing the simulation.
    pub fn snapshot(&self) -> StateSnapshot {
        let at = Utc::now();
        let state = self.state.read().unwrap();
        let summary = self.analytics.read().unwrap().summary();
        StateSnapshot::new(state.clone(), summary, at)
    }

    pub fn connection_opened(&self) -> u64 {
        self.connections.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn connection_closed(&self) -> u64 {
        self.connections.fetch_sub(1, Ordering::Relaxed) - 1
    }

    pub fn connection_count(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }
}
