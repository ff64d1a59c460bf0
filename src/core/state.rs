use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// Shared server state - one clone per request, all members cheap to copy
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | configuration (immutable) |
/// | pool | SqlitePool | SQLite connection pool |
/// | jwt_service | Arc<JwtService> | token service |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Initialize the server state:
    ///
    /// 1. ensure the work directory exists
    /// 2. open the database at `work_dir/comptoir.db` and run migrations
    /// 3. build the JWT service from config
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized; the server cannot
    /// run without it.
    pub async fn initialize(config: &Config) -> Self {
        let work_dir = PathBuf::from(&config.work_dir);
        if !work_dir.exists() {
            std::fs::create_dir_all(&work_dir).expect("Failed to create work directory");
        }

        let db_path = work_dir.join("comptoir.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db_service.pool, jwt_service)
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
