use rusqlite::Connection;

use crate::db::repositories::blind_test_repository::BlindTestRepository;
use crate::db::repositories::rating_repository::RatingRepository;
use crate::db::repositories::workload_repository::WorkloadRepository;
use crate::error::AppResult;

/// Read-only accessors for the three ranking signals.
///
/// A missing record is a normal state (new hires, no reviews yet) and
/// defaults to zero. A storage error is not, and propagates so the caller
/// aborts instead of silently ranking on a substituted zero.
pub struct SignalReader;

impl SignalReader {
    /// Workload point of the employee's most recent tracked week, 0 if none.
    pub fn latest_workload_point(conn: &Connection, employee_id: &str) -> AppResult<f64> {
        let latest = WorkloadRepository::latest_for_employee(conn, employee_id)?;
        Ok(latest.map(|record| record.workload_point).unwrap_or(0.0))
    }

    /// Mean of all ratings ever recorded for the employee, 0 if none.
    pub fn average_rating(conn: &Connection, employee_id: &str) -> AppResult<f64> {
        let average = RatingRepository::average_for_employee(conn, employee_id)?;
        Ok(average.unwrap_or(0.0))
    }

    /// Score of the employee's most recent blind test, 0 if none.
    pub fn latest_blind_test_score(conn: &Connection, employee_id: &str) -> AppResult<f64> {
        let latest = BlindTestRepository::latest_for_employee(conn, employee_id)?;
        Ok(latest.map(|record| record.score).unwrap_or(0.0))
    }
}
