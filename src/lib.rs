pub mod commands;
pub mod core;
pub mod db;
pub mod story;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use crate::core::{config::AppConfig, errors::AppResult};
use db::Database;
use story::sync::SnapshotSync;

fn log_level_from_env() -> LevelFilter {
    match std::env::var("STORYLINE_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn sqlx_debug_enabled() -> bool {
    matches!(
        std::env::var("STORYLINE_SQLX_DEBUG")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init_logging() {
    let mut filter = EnvFilter::default().add_directive(log_level_from_env().into());
    if !sqlx_debug_enabled() {
        if let Ok(directive) = "sqlx::query=warn".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub snapshot: SnapshotSync,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            snapshot: SnapshotSync::from_config(&config),
            db,
            config,
        }
    }

    pub async fn initialize(config: AppConfig) -> AppResult<Self> {
        let db = Database::new(&config.data_dir).await?;
        tracing::info!(
            data_dir = %config.data_dir.display(),
            snapshot = %config.snapshot_path.display(),
            "storyline initialized"
        );
        Ok(Self::new(db, config))
    }
}
