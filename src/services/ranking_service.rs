use std::cmp::Ordering;
use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::db::repositories::employee_repository::EmployeeRepository;
use crate::db::repositories::ranking_repository::RankingRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::ranking::{RankingEntryRecord, SCORE_WEIGHTS};
use crate::services::signal_service::SignalReader;

/// Ranking engine: aggregates the three per-employee signals into a
/// composite score, orders all employees by it and atomically refreshes the
/// employee_rankings table.
pub struct RankingService {
    db: DbPool,
    // Serializes overlapping recomputation runs in-process so two half
    // written rank tables can never interleave.
    run_guard: Mutex<()>,
}

impl RankingService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            run_guard: Mutex::new(()),
        }
    }

    /// Recompute the composite score and dense rank for every employee and
    /// replace the persisted ranking table in a single transaction.
    ///
    /// Three phases: read every signal, compute and sort in memory, then
    /// write the whole batch atomically. A failure anywhere rolls the table
    /// back to its pre-run state.
    pub fn recompute_all_rankings(&self) -> AppResult<Vec<RankingEntryRecord>> {
        let _guard = self
            .run_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut conn = self.db.get_connection()?;

        let employee_ids = EmployeeRepository::list_ids(&conn)?;

        let mut entries = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            let workload_point = SignalReader::latest_workload_point(&conn, &employee_id)?;
            let rating_score = SignalReader::average_rating(&conn, &employee_id)?;
            let blind_test_score = SignalReader::latest_blind_test_score(&conn, &employee_id)?;

            let total_score = SCORE_WEIGHTS.combine(workload_point, rating_score, blind_test_score);

            entries.push(RankingEntryRecord {
                employee_id,
                workload_point,
                rating_score,
                blind_test_score,
                total_score,
                rank: 0,
            });
        }

        // Total score descending; ties broken by employee id ascending so
        // repeated runs over unchanged data rank identically.
        entries.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position as i64 + 1;
        }

        let tx = conn.transaction()?;
        let tx_conn = tx.deref();

        for entry in &entries {
            RankingRepository::upsert_entry(tx_conn, entry)?;
        }

        let stale = RankingRepository::delete_stale(tx_conn)?;

        tx.commit()?;

        info!(
            target: "app::ranking",
            ranked = entries.len(),
            stale_removed = stale,
            "rankings recomputed"
        );

        Ok(entries)
    }

    /// Persisted ranking table, best rank first.
    pub fn list_rankings(&self) -> AppResult<Vec<RankingEntryRecord>> {
        let conn = self.db.get_connection()?;
        RankingRepository::list_all(&conn)
    }
}
