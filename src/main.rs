use std::path::PathBuf;

use tracing::{error, info};

use crewrank_app_lib::db::DbPool;
use crewrank_app_lib::services::ranking_service::RankingService;
use crewrank_app_lib::utils::logger;

fn main() {
    if let Err(err) = try_run() {
        eprintln!("ranking recomputation failed: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = std::env::var("CREWRANK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    std::fs::create_dir_all(&data_dir)?;

    logger::init_logging(&data_dir).map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

    let pool =
        DbPool::open_in_dir(&data_dir).map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
    info!(target: "app::db", db = %pool.path().display(), "workforce database ready");

    let service = RankingService::new(pool);
    match service.recompute_all_rankings() {
        Ok(entries) => {
            info!(target: "app::ranking", ranked = entries.len(), "ranking recomputation finished");
            Ok(())
        }
        Err(err) => {
            error!(target: "app::ranking", error = %err, "ranking recomputation failed");
            Err(Box::new(err))
        }
    }
}
