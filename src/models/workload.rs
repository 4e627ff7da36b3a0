use serde::{Deserialize, Serialize};

/// Upper bound of the workload-point scale used for score normalization.
pub const WORKLOAD_POINT_MAX: f64 = 200.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadRecord {
    pub employee_id: String,
    /// ISO-8601 week label, e.g. "2026-W35". Lexicographic order is
    /// chronological order, so "latest" is the greatest week string.
    pub week: String,
    pub total_work_count: i64,
    pub workload_point: f64,
}
