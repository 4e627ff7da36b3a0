use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::blind_test::{BlindTestGrade, BlindTestRecord, BLIND_TEST_MAX};

#[derive(Debug, Clone)]
pub struct BlindTestRow {
    pub employee_id: String,
    pub test_date: String,
    pub score: f64,
}

impl BlindTestRow {
    pub fn from_record(record: &BlindTestRecord) -> AppResult<Self> {
        if !(0.0..=BLIND_TEST_MAX).contains(&record.score) {
            return Err(AppError::validation(format!(
                "盲测成绩超出范围 (0-{BLIND_TEST_MAX}): {}",
                record.score
            )));
        }

        Ok(Self {
            employee_id: record.employee_id.clone(),
            test_date: validate_date(&record.test_date)?,
            score: record.score,
        })
    }

    pub fn into_record(self) -> BlindTestRecord {
        BlindTestRecord {
            employee_id: self.employee_id,
            test_date: self.test_date,
            score: self.score,
        }
    }
}

impl TryFrom<&Row<'_>> for BlindTestRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.get("employee_id")?,
            test_date: row.get("test_date")?,
            score: row.get("score")?,
        })
    }
}

pub struct BlindTestRepository;

impl BlindTestRepository {
    /// One result per employee per test date; a re-administered test on the
    /// same date overwrites the earlier entry.
    pub fn upsert(conn: &Connection, record: &BlindTestRecord) -> AppResult<()> {
        let row = BlindTestRow::from_record(record)?;

        conn.execute(
            r#"
                INSERT INTO blind_test_records (
                    employee_id,
                    test_date,
                    score
                ) VALUES (
                    :employee_id,
                    :test_date,
                    :score
                )
                ON CONFLICT(employee_id, test_date) DO UPDATE SET
                    score = excluded.score
            "#,
            named_params! {
                ":employee_id": &row.employee_id,
                ":test_date": &row.test_date,
                ":score": &row.score,
            },
        )?;

        Ok(())
    }

    /// Entry point for forms that submit a categorical outcome instead of a
    /// percentage. The label goes through the published grade mapping;
    /// unknown labels are rejected.
    pub fn upsert_graded(
        conn: &Connection,
        employee_id: &str,
        test_date: &str,
        grade_label: &str,
    ) -> AppResult<()> {
        let grade = BlindTestGrade::try_from(grade_label).map_err(AppError::validation)?;

        Self::upsert(
            conn,
            &BlindTestRecord {
                employee_id: employee_id.to_string(),
                test_date: test_date.to_string(),
                score: grade.score(),
            },
        )
    }

    /// The record with the greatest test date for the employee, if any.
    pub fn latest_for_employee(
        conn: &Connection,
        employee_id: &str,
    ) -> AppResult<Option<BlindTestRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    test_date,
                    score
                FROM blind_test_records
                WHERE employee_id = :employee_id
                ORDER BY test_date DESC
                LIMIT 1
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":employee_id": employee_id}, |row| {
                BlindTestRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(|row| row.into_record()))
    }
}

fn validate_date(value: &str) -> AppResult<String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| value.to_string())
        .map_err(|_| AppError::validation(format!("日期格式非法: {value}")))
}
