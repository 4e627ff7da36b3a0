use serde::{Deserialize, Serialize};

/// Upper bound of the rating scale used for score normalization.
pub const RATING_MAX: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub employee_id: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub rated_at: String,
}
