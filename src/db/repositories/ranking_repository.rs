use std::convert::TryFrom;

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::ranking::RankingEntryRecord;

#[derive(Debug, Clone)]
pub struct RankingEntryRow {
    pub employee_id: String,
    pub workload_point: f64,
    pub rating_score: f64,
    pub blind_test_score: f64,
    pub total_score: f64,
    pub rank: i64,
}

impl RankingEntryRow {
    pub fn from_record(record: &RankingEntryRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            workload_point: record.workload_point,
            rating_score: record.rating_score,
            blind_test_score: record.blind_test_score,
            total_score: record.total_score,
            rank: record.rank,
        }
    }

    pub fn into_record(self) -> RankingEntryRecord {
        RankingEntryRecord {
            employee_id: self.employee_id,
            workload_point: self.workload_point,
            rating_score: self.rating_score,
            blind_test_score: self.blind_test_score,
            total_score: self.total_score,
            rank: self.rank,
        }
    }
}

impl TryFrom<&Row<'_>> for RankingEntryRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.get("employee_id")?,
            workload_point: row.get("workload_point")?,
            rating_score: row.get("rating_score")?,
            blind_test_score: row.get("blind_test_score")?,
            total_score: row.get("total_score")?,
            rank: row.get("rank")?,
        })
    }
}

/// The employee_rankings table is written exclusively through this
/// repository by the ranking engine; every other collaborator reads only.
pub struct RankingRepository;

impl RankingRepository {
    pub fn upsert_entry(conn: &Connection, record: &RankingEntryRecord) -> AppResult<()> {
        let row = RankingEntryRow::from_record(record);
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO employee_rankings (
                    employee_id,
                    workload_point,
                    rating_score,
                    blind_test_score,
                    total_score,
                    rank,
                    updated_at
                ) VALUES (
                    :employee_id,
                    :workload_point,
                    :rating_score,
                    :blind_test_score,
                    :total_score,
                    :rank,
                    :updated_at
                )
                ON CONFLICT(employee_id) DO UPDATE SET
                    workload_point = excluded.workload_point,
                    rating_score = excluded.rating_score,
                    blind_test_score = excluded.blind_test_score,
                    total_score = excluded.total_score,
                    rank = excluded.rank,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":employee_id": &row.employee_id,
                ":workload_point": &row.workload_point,
                ":rating_score": &row.rating_score,
                ":blind_test_score": &row.blind_test_score,
                ":total_score": &row.total_score,
                ":rank": &row.rank,
                ":updated_at": &now,
            },
        )?;

        Ok(())
    }

    /// Remove entries for employees that no longer exist, so a shrinking
    /// employee set cannot leave dangling ranks behind. Runs inside the same
    /// transaction as the upsert batch.
    pub fn delete_stale(conn: &Connection) -> AppResult<usize> {
        let deleted = conn.execute(
            r#"
                DELETE FROM employee_rankings
                WHERE employee_id NOT IN (SELECT id FROM employees)
            "#,
            [],
        )?;

        Ok(deleted)
    }

    pub fn find_by_employee(
        conn: &Connection,
        employee_id: &str,
    ) -> AppResult<Option<RankingEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    workload_point,
                    rating_score,
                    blind_test_score,
                    total_score,
                    rank
                FROM employee_rankings
                WHERE employee_id = :employee_id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":employee_id": employee_id}, |row| {
                RankingEntryRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(|row| row.into_record()))
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<RankingEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    workload_point,
                    rating_score,
                    blind_test_score,
                    total_score,
                    rank
                FROM employee_rankings
                ORDER BY rank ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| RankingEntryRow::try_from(row))?
            .map(|row| row.map(RankingEntryRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count(conn: &Connection) -> AppResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM employee_rankings", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}
