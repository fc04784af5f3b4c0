//! Cost and score functions for driver candidates

use crate::config::ScoringConfig;

/// Weights for combining candidate factors into one cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Cost per mile between the driver's nearest stop and the delivery
    pub distance: f64,

    /// Cost per mile added to the route at the best insertion point
    pub disruption: f64,

    /// Cost per stop already on the driver's route that day
    pub load_per_stop: f64,

    /// Cost at which the score is 0.5
    pub scale: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 0.4,
            disruption: 0.6,
            load_per_stop: 0.5,
            scale: 1.0,
        }
    }
}

impl From<&ScoringConfig> for ScoringWeights {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            distance: config.distance_weight,
            disruption: config.disruption_weight,
            load_per_stop: config.load_penalty_per_stop,
            scale: config.score_scale,
        }
    }
}

impl ScoringWeights {
    /// Combined cost of a candidate; lower is better.
    pub fn cost(&self, distance: f64, disruption: f64, stops: usize) -> f64 {
        distance * self.distance + disruption * self.disruption + stops as f64 * self.load_per_stop
    }

    /// Map a cost onto (0, 1]; zero cost scores exactly 1.
    ///
    /// Strictly decreasing in cost, so ranking by score is ranking by cost.
    pub fn score(&self, cost: f64) -> f64 {
        let cost = if cost.is_finite() { cost.max(0.0) } else { f64::MAX };
        1.0 / (1.0 + cost / self.scale)
    }
}

/// Operator-facing explanation of a candidate.
pub fn reason(stops: usize, distance: f64, disruption: f64) -> String {
    if stops == 0 {
        "No existing deliveries - fresh route".to_string()
    } else if disruption < 2.0 {
        format!("Minimal disruption ({:.1}mi added)", disruption)
    } else if distance < 5.0 {
        format!("Close to existing route ({:.1}mi away)", distance)
    } else {
        format!("{} stops, {:.1}mi added", stops, disruption)
    }
}
