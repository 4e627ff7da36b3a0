use chrono::Utc;
use crewrank_app_lib::db::repositories::blind_test_repository::BlindTestRepository;
use crewrank_app_lib::db::repositories::employee_repository::EmployeeRepository;
use crewrank_app_lib::db::repositories::rating_repository::RatingRepository;
use crewrank_app_lib::db::repositories::workload_repository::WorkloadRepository;
use crewrank_app_lib::db::DbPool;
use crewrank_app_lib::error::AppError;
use crewrank_app_lib::models::blind_test::BlindTestRecord;
use crewrank_app_lib::models::employee::{EmployeeRecord, EmployeeStatus};
use crewrank_app_lib::models::rating::RatingRecord;
use crewrank_app_lib::models::workload::WorkloadRecord;
use crewrank_app_lib::services::signal_service::SignalReader;
use tempfile::tempdir;

fn setup() -> (DbPool, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let pool = DbPool::new(dir.path().join("crewrank.sqlite")).unwrap();
    (pool, dir)
}

fn insert_employee(pool: &DbPool, id: &str, number: &str) {
    let conn = pool.get_connection().unwrap();
    EmployeeRepository::insert(
        &conn,
        &EmployeeRecord {
            id: id.to_string(),
            employee_number: number.to_string(),
            display_name: format!("Employee {number}"),
            employment_type: "full_time".to_string(),
            status: EmployeeStatus::Active,
            created_at: Utc::now().to_rfc3339(),
        },
    )
    .unwrap();
}

#[test]
fn test_latest_workload_is_by_week_not_max_or_mean() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    // Latest week carries neither the max nor the mean of the points
    for (week, point) in [("2026-W01", 90.0), ("2026-W02", 20.0), ("2026-W03", 60.0)] {
        WorkloadRepository::upsert(
            &conn,
            &WorkloadRecord {
                employee_id: "e1".to_string(),
                week: week.to_string(),
                total_work_count: 3,
                workload_point: point,
            },
        )
        .unwrap();
    }

    assert_eq!(
        SignalReader::latest_workload_point(&conn, "e1").unwrap(),
        60.0
    );
}

#[test]
fn test_workload_resubmission_overwrites_week() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    for point in [40.0, 70.0] {
        WorkloadRepository::upsert(
            &conn,
            &WorkloadRecord {
                employee_id: "e1".to_string(),
                week: "2026-W33".to_string(),
                total_work_count: 3,
                workload_point: point,
            },
        )
        .unwrap();
    }

    let records = WorkloadRepository::list_for_employee(&conn, "e1").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].workload_point, 70.0);
}

#[test]
fn test_malformed_week_label_is_rejected() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    let result = WorkloadRepository::upsert(
        &conn,
        &WorkloadRecord {
            employee_id: "e1".to_string(),
            week: "week 33".to_string(),
            total_work_count: 3,
            workload_point: 50.0,
        },
    );

    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn test_rating_out_of_range_is_rejected() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    let result = RatingRepository::insert(
        &conn,
        &RatingRecord {
            employee_id: "e1".to_string(),
            rating: 11.0,
            comment: None,
            rated_at: Utc::now().to_rfc3339(),
        },
    );

    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn test_rating_comments_are_stored() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    RatingRepository::insert(
        &conn,
        &RatingRecord {
            employee_id: "e1".to_string(),
            rating: 4.0,
            comment: Some("consistent output this quarter".to_string()),
            rated_at: Utc::now().to_rfc3339(),
        },
    )
    .unwrap();

    let ratings = RatingRepository::list_for_employee(&conn, "e1").unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(
        ratings[0].comment.as_deref(),
        Some("consistent output this quarter")
    );
}

#[test]
fn test_graded_blind_test_entry_maps_to_numeric_score() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    BlindTestRepository::upsert_graded(&conn, "e1", "2026-08-20", "Excellent").unwrap();

    let latest = BlindTestRepository::latest_for_employee(&conn, "e1")
        .unwrap()
        .unwrap();
    assert_eq!(latest.score, 100.0);
}

#[test]
fn test_unknown_blind_test_grade_is_rejected() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    let result = BlindTestRepository::upsert_graded(&conn, "e1", "2026-08-20", "outstanding");
    assert!(matches!(result, Err(AppError::Validation { .. })));

    assert!(BlindTestRepository::latest_for_employee(&conn, "e1")
        .unwrap()
        .is_none());
}

#[test]
fn test_blind_test_score_out_of_range_is_rejected() {
    let (pool, _dir) = setup();
    insert_employee(&pool, "e1", "EMP-001");
    let conn = pool.get_connection().unwrap();

    let result = BlindTestRepository::upsert(
        &conn,
        &BlindTestRecord {
            employee_id: "e1".to_string(),
            test_date: "2026-08-20".to_string(),
            score: 130.0,
        },
    );

    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn test_signals_for_unknown_employee_default_to_zero() {
    let (pool, _dir) = setup();
    let conn = pool.get_connection().unwrap();

    // Absence of records is a normal state, not an error
    assert_eq!(
        SignalReader::latest_workload_point(&conn, "ghost").unwrap(),
        0.0
    );
    assert_eq!(SignalReader::average_rating(&conn, "ghost").unwrap(), 0.0);
    assert_eq!(
        SignalReader::latest_blind_test_score(&conn, "ghost").unwrap(),
        0.0
    );
}
