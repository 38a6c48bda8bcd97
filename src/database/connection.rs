use std::time::Duration;

use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::settings::DatabaseSettings;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn create_pool(settings: &DatabaseSettings) -> Result<DbPool> {
    let manager = build_manager(&settings.path, settings.busy_timeout_ms);
    build_pool(manager, settings.pool_size)
}

fn build_manager(path: &str, busy_timeout_ms: u64) -> SqliteConnectionManager {
    let busy_timeout = Duration::from_millis(busy_timeout_ms);
    SqliteConnectionManager::file(path).with_init(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    })
}

fn build_pool(manager: SqliteConnectionManager, pool_size: u32) -> Result<DbPool> {
    r2d2::Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}
