#![allow(dead_code)]

use std::sync::Arc;

use event_admission::api::handlers::AppState;
use event_admission::config::settings::AppConfig;
use event_admission::database::{Event, NewEvent};
use event_admission::services::server::build_state;
use tempfile::TempDir;

/// App state backed by a throwaway SQLite file. Keep the `TempDir` alive for
/// as long as the state is in use.
pub struct TestApp {
    pub state: Arc<AppState>,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::new();
        config.database.path = dir.path().join("events.db").to_string_lossy().into_owned();
        adjust(&mut config);

        Self {
            state: build_state(config).unwrap(),
            _dir: dir,
        }
    }

    pub fn event(&self, max_players: i64) -> Event {
        self.state
            .events
            .create_event(&NewEvent {
                name: "Thursday Doubles".to_string(),
                max_players,
                min_players: 0,
            })
            .unwrap()
    }
}
