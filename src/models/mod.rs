pub mod employee;
pub mod ranking;
pub mod rating;
pub mod workload;
