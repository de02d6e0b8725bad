use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// One tick's worth of tracked metrics, fed by the simulation step.
#[derive(Clone, Copy, Debug)]
pub struct TickSample {
    pub timestamp: DateTime<Utc>,
    pub consumption: f64,
    pub production: f64,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySample {
    pub timestamp: DateTime<Utc>,
    pub consumption: f64,
    pub production: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Rolling time-windowed history for energy, temperature and humidity.
///
/// No retained sample is older than the retention horizon; eviction runs on
/// every record call, not on a separate timer. O(window size) per tick,
/// bounded by the horizon and the tick rate.
pub struct AnalyticsWindow {
    retention: Duration,
    energy: VecDeque<EnergySample>,
    temperature: VecDeque<MetricSample>,
    humidity: VecDeque<MetricSample>,
}

impl AnalyticsWindow {
    pub fn new(retention_hours: i64) -> Self {
        Self {
            retention: Duration::hours(retention_hours),
            energy: VecDeque::new(),
            temperature: VecDeque::new(),
            humidity: VecDeque::new(),
        }
    }

    /// Append one sample per tracked metric, then evict everything older
    /// than the retention horizon.
    pub fn record(&mut self, sample: TickSample) {
        self.energy.push_back(EnergySample {
            timestamp: sample.timestamp,
            consumption: sample.consumption,
            production: sample.production,
        });
        self.temperature.push_back(MetricSample {
            timestamp: sample.timestamp,
            value: sample.temperature,
        });
        self.humidity.push_back(MetricSample {
            timestamp: sample.timestamp,
            value: sample.humidity,
        });

        self.prune(sample.timestamp);
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let horizon = now - self.retention;
        while self.energy.front().map_or(false, |s| s.timestamp < horizon) {
            self.energy.pop_front();
        }
        while self
            .temperature
            .front()
            .map_or(false, |s| s.timestamp < horizon)
        {
            self.temperature.pop_front();
        }
        while self
            .humidity
            .front()
            .map_or(false, |s| s.timestamp < horizon)
        {
            self.humidity.pop_front();
        }
    }

    pub fn sample_count(&self) -> usize {
        self.energy.len()
    }

    /// Window aggregates embedded in state snapshots.
    pub fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary {
            sample_count: self.energy.len(),
            average_consumption: mean(self.energy.iter().map(|s| s.consumption)),
            average_production: mean(self.energy.iter().map(|s| s.production)),
            average_temperature: mean(self.temperature.iter().map(|s| s.value)),
            average_humidity: mean(self.humidity.iter().map(|s| s.value)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Aggregates over the retained window at a point in time
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub sample_count: usize,
    pub average_consumption: f64,
    pub average_production: f64,
    pub average_temperature: f64,
    pub average_humidity: f64,
}
