use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::workload::WorkloadRecord;

#[derive(Debug, Clone)]
pub struct WorkloadRow {
    pub employee_id: String,
    pub week: String,
    pub total_work_count: i64,
    pub workload_point: f64,
}

impl WorkloadRow {
    pub fn from_record(record: &WorkloadRecord) -> AppResult<Self> {
        Ok(Self {
            employee_id: record.employee_id.clone(),
            week: validate_week(&record.week)?,
            total_work_count: record.total_work_count,
            workload_point: record.workload_point,
        })
    }

    pub fn into_record(self) -> WorkloadRecord {
        WorkloadRecord {
            employee_id: self.employee_id,
            week: self.week,
            total_work_count: self.total_work_count,
            workload_point: self.workload_point,
        }
    }
}

impl TryFrom<&Row<'_>> for WorkloadRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.get("employee_id")?,
            week: row.get("week")?,
            total_work_count: row.get("total_work_count")?,
            workload_point: row.get("workload_point")?,
        })
    }
}

pub struct WorkloadRepository;

impl WorkloadRepository {
    /// One record per employee per week; re-submitting a week overwrites it.
    pub fn upsert(conn: &Connection, record: &WorkloadRecord) -> AppResult<()> {
        let row = WorkloadRow::from_record(record)?;

        conn.execute(
            r#"
                INSERT INTO workload_records (
                    employee_id,
                    week,
                    total_work_count,
                    workload_point
                ) VALUES (
                    :employee_id,
                    :week,
                    :total_work_count,
                    :workload_point
                )
                ON CONFLICT(employee_id, week) DO UPDATE SET
                    total_work_count = excluded.total_work_count,
                    workload_point = excluded.workload_point
            "#,
            named_params! {
                ":employee_id": &row.employee_id,
                ":week": &row.week,
                ":total_work_count": &row.total_work_count,
                ":workload_point": &row.workload_point,
            },
        )?;

        Ok(())
    }

    /// The record with the greatest week for the employee, if any.
    pub fn latest_for_employee(
        conn: &Connection,
        employee_id: &str,
    ) -> AppResult<Option<WorkloadRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    week,
                    total_work_count,
                    workload_point
                FROM workload_records
                WHERE employee_id = :employee_id
                ORDER BY week DESC
                LIMIT 1
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":employee_id": employee_id}, |row| {
                WorkloadRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(|row| row.into_record()))
    }

    pub fn list_for_employee(
        conn: &Connection,
        employee_id: &str,
    ) -> AppResult<Vec<WorkloadRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    week,
                    total_work_count,
                    workload_point
                FROM workload_records
                WHERE employee_id = :employee_id
                ORDER BY week DESC
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":employee_id": employee_id}, |row| {
                WorkloadRow::try_from(row)
            })?
            .map(|row| row.map(WorkloadRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }
}

// ISO-8601 week label, e.g. "2026-W35". Lexicographic order must match
// chronological order, so the shape is fixed.
fn validate_week(value: &str) -> AppResult<String> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 8
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5] == b'W'
        && bytes[6..].iter().all(|b| b.is_ascii_digit())
        && matches!(value[6..].parse::<u8>(), Ok(1..=53));

    if well_formed {
        Ok(value.to_string())
    } else {
        Err(AppError::validation(format!("周标识格式非法: {value}")))
    }
}
