use serde::{Deserialize, Serialize};

use crate::models::blind_test::BLIND_TEST_MAX;
use crate::models::rating::RATING_MAX;
use crate::models::workload::WORKLOAD_POINT_MAX;

/// Weighting policy for the composite employee score.
///
/// Each signal is normalized to 0-100 against its scale maximum, then the
/// weighted sum is taken. Weights sum to 1.0 so the composite stays on the
/// 0-100 scale.
pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    workload: 0.40,
    rating: 0.30,
    blind_test: 0.30,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub workload: f64,
    pub rating: f64,
    pub blind_test: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.workload + self.rating + self.blind_test
    }

    /// Combine raw signal values into the composite score.
    ///
    /// Inputs are the raw signals as stored (workload point 0-200, rating
    /// 0-10, blind test 0-100); out-of-range values are clamped before
    /// weighting.
    pub fn combine(&self, workload_point: f64, rating_score: f64, blind_test_score: f64) -> f64 {
        let workload = (workload_point / WORKLOAD_POINT_MAX * 100.0).clamp(0.0, 100.0);
        let rating = (rating_score / RATING_MAX * 100.0).clamp(0.0, 100.0);
        let blind_test = blind_test_score.clamp(0.0, BLIND_TEST_MAX);

        workload * self.workload + rating * self.rating + blind_test * self.blind_test
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntryRecord {
    pub employee_id: String,
    pub workload_point: f64,
    pub rating_score: f64,
    pub blind_test_score: f64,
    pub total_score: f64,
    /// Dense 1-based position; unique per employee, no gaps.
    pub rank: i64,
}
