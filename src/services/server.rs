use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::admission::{AdmissionController, EventLocks};
use crate::api::create_router;
use crate::api::handlers::AppState;
use crate::config::settings::AppConfig;
use crate::database;
use crate::services::events::EventService;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let state = build_state(self.config.clone())?;

        let app = create_router(state)
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Opens the database, makes sure the schema exists and wires the services
/// that share one set of per-event locks.
pub fn build_state(config: AppConfig) -> Result<Arc<AppState>> {
    let pool = database::create_pool(&config.database)?;
    {
        let conn = database::get_connection(&pool)?;
        database::setup::initialize_schema(&conn)?;
    }
    info!("Using database at {}", config.database.path);

    let locks = Arc::new(EventLocks::new());
    let lock_timeout = Duration::from_millis(config.admission.lock_timeout_ms);

    Ok(Arc::new(AppState {
        admission: AdmissionController::new(pool.clone(), Arc::clone(&locks), config.admission.clone()),
        events: EventService::new(pool, locks, lock_timeout),
        config,
    }))
}
