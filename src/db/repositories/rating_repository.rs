use std::convert::TryFrom;

use chrono::DateTime;
use rusqlite::{named_params, Connection, Row};

use crate::error::{AppError, AppResult};
use crate::models::rating::{RatingRecord, RATING_MAX};

#[derive(Debug, Clone)]
pub struct RatingRow {
    pub employee_id: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub rated_at: String,
}

impl RatingRow {
    pub fn from_record(record: &RatingRecord) -> AppResult<Self> {
        if !(0.0..=RATING_MAX).contains(&record.rating) {
            return Err(AppError::validation(format!(
                "评分超出范围 (0-{RATING_MAX}): {}",
                record.rating
            )));
        }

        Ok(Self {
            employee_id: record.employee_id.clone(),
            rating: record.rating,
            comment: record.comment.clone(),
            rated_at: validate_datetime(&record.rated_at)?,
        })
    }

    pub fn into_record(self) -> RatingRecord {
        RatingRecord {
            employee_id: self.employee_id,
            rating: self.rating,
            comment: self.comment,
            rated_at: self.rated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for RatingRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.get("employee_id")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            rated_at: row.get("rated_at")?,
        })
    }
}

pub struct RatingRepository;

impl RatingRepository {
    pub fn insert(conn: &Connection, record: &RatingRecord) -> AppResult<()> {
        let row = RatingRow::from_record(record)?;

        conn.execute(
            r#"
                INSERT INTO rating_records (
                    employee_id,
                    rating,
                    comment,
                    rated_at
                ) VALUES (
                    :employee_id,
                    :rating,
                    :comment,
                    :rated_at
                )
            "#,
            named_params! {
                ":employee_id": &row.employee_id,
                ":rating": &row.rating,
                ":comment": &row.comment,
                ":rated_at": &row.rated_at,
            },
        )?;

        Ok(())
    }

    /// Arithmetic mean over every rating the employee has ever received.
    /// `None` when no rating exists.
    pub fn average_for_employee(conn: &Connection, employee_id: &str) -> AppResult<Option<f64>> {
        let average = conn.query_row(
            "SELECT AVG(rating) FROM rating_records WHERE employee_id = :employee_id",
            named_params! {":employee_id": employee_id},
            |row| row.get::<_, Option<f64>>(0),
        )?;

        Ok(average)
    }

    pub fn list_for_employee(conn: &Connection, employee_id: &str) -> AppResult<Vec<RatingRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    employee_id,
                    rating,
                    comment,
                    rated_at
                FROM rating_records
                WHERE employee_id = :employee_id
                ORDER BY rated_at DESC
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":employee_id": employee_id}, |row| {
                RatingRow::try_from(row)
            })?
            .map(|row| row.map(RatingRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }
}

fn validate_datetime(value: &str) -> AppResult<String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_rfc3339())
        .map_err(|_| AppError::validation("时间格式非法"))
}
