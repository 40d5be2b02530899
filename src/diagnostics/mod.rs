//! Timing and input descriptors attached to every detector run.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock time spent in one named stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Per-stage timings of one run, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Record a stage that started at `since` and ended now.
    pub fn record(&mut self, label: impl Into<String>, since: Instant) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms: since.elapsed().as_secs_f64() * 1000.0,
        });
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_recorded_in_order() {
        let mut timings = TimingBreakdown::default();
        let t0 = Instant::now();
        timings.record("skew", t0);
        timings.record("table", t0);
        let labels: Vec<&str> = timings.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["skew", "table"]);
        assert!(timings.stage_ms("table").is_some());
        assert!(timings.stage_ms("glyphs").is_none());
    }
}
