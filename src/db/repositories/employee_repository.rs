use std::convert::TryFrom;

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::employee::{EmployeeCreateInput, EmployeeRecord, EmployeeStatus};

#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub id: String,
    pub employee_number: String,
    pub display_name: String,
    pub employment_type: String,
    pub status: String,
    pub created_at: String,
}

impl EmployeeRow {
    pub fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id.clone(),
            employee_number: record.employee_number.clone(),
            display_name: record.display_name.clone(),
            employment_type: record.employment_type.clone(),
            status: record.status.as_str().to_string(),
            created_at: record.created_at.clone(),
        }
    }

    pub fn into_record(self) -> AppResult<EmployeeRecord> {
        Ok(EmployeeRecord {
            id: self.id,
            employee_number: self.employee_number,
            display_name: self.display_name,
            employment_type: self.employment_type,
            status: EmployeeStatus::try_from(self.status.as_str()).map_err(AppError::validation)?,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for EmployeeRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            employee_number: row.get("employee_number")?,
            display_name: row.get("display_name")?,
            employment_type: row.get("employment_type")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct EmployeeRepository;

impl EmployeeRepository {
    /// Onboarding entry point: generates the id and timestamps, defaults
    /// status to active.
    pub fn create(conn: &Connection, input: &EmployeeCreateInput) -> AppResult<EmployeeRecord> {
        if input.employee_number.trim().is_empty() {
            return Err(AppError::validation("工号不能为空"));
        }
        if input.display_name.trim().is_empty() {
            return Err(AppError::validation("姓名不能为空"));
        }

        let record = EmployeeRecord {
            id: Uuid::new_v4().to_string(),
            employee_number: input.employee_number.clone(),
            display_name: input.display_name.clone(),
            employment_type: input.employment_type.clone(),
            status: input.status.unwrap_or(EmployeeStatus::Active),
            created_at: Utc::now().to_rfc3339(),
        };

        Self::insert(conn, &record)?;

        Ok(record)
    }

    pub fn insert(conn: &Connection, record: &EmployeeRecord) -> AppResult<()> {
        let row = EmployeeRow::from_record(record);

        conn.execute(
            r#"
                INSERT INTO employees (
                    id,
                    employee_number,
                    display_name,
                    employment_type,
                    status,
                    created_at
                ) VALUES (
                    :id,
                    :employee_number,
                    :display_name,
                    :employment_type,
                    :status,
                    :created_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":employee_number": &row.employee_number,
                ":display_name": &row.display_name,
                ":employment_type": &row.employment_type,
                ":status": &row.status,
                ":created_at": &row.created_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<EmployeeRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    id,
                    employee_number,
                    display_name,
                    employment_type,
                    status,
                    created_at
                FROM employees
                WHERE id = :id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| EmployeeRow::try_from(row))
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    /// All employee ids in a stable order. No status filter: inactive and
    /// on-leave employees are ranked alongside active ones.
    pub fn list_ids(conn: &Connection) -> AppResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT id FROM employees ORDER BY id ASC")?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<usize> {
        let deleted = conn.execute(
            "DELETE FROM employees WHERE id = :id",
            named_params! {":id": id},
        )?;

        Ok(deleted)
    }

    pub fn count(conn: &Connection) -> AppResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count)
    }
}
