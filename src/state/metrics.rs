//! Roster aggregates, derived on read.

use super::models::{RosterPlayer, DEFAULT_NIL_POOL};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetrics {
    /// Mean KPI, one decimal.
    pub team_kpi: f64,
    pub system_fit: f64,
    pub confidence_avg: f64,
    pub scholarship_used: f64,
    /// Percent of the NIL pool committed to the roster.
    pub nil_utilized: f64,
}

impl TeamMetrics {
    /// Aggregate `roster` against `nil_pool`. A missing or non-positive pool
    /// falls back to the default pool. An empty roster is all zeros.
    #[must_use]
    pub fn compute(roster: &[RosterPlayer], nil_pool: Option<f64>) -> Self {
        if roster.is_empty() {
            return Self::default();
        }

        #[allow(clippy::cast_precision_loss)]
        let count = roster.len() as f64;
        let mean = |value: fn(&RosterPlayer) -> f64| roster.iter().map(value).sum::<f64>() / count;

        let total_nil: f64 = roster.iter().map(|player| player.nil).sum();
        let pool = nil_pool
            .filter(|pool| *pool > 0.0)
            .unwrap_or(DEFAULT_NIL_POOL);

        Self {
            team_kpi: (mean(|player| player.kpi) * 10.0).round() / 10.0,
            system_fit: mean(|player| player.fit).round(),
            confidence_avg: mean(|player| player.confidence).round(),
            scholarship_used: roster.iter().map(|player| player.scholarship).sum(),
            nil_utilized: (total_nil / pool * 100.0).round(),
        }
    }
}
