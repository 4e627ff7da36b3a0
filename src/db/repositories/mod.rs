pub mod blind_test_repository;
pub mod employee_repository;
pub mod ranking_repository;
pub mod rating_repository;
pub mod workload_repository;
