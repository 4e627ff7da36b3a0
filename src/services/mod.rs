pub mod ranking_service;
pub mod signal_service;
