pub mod connection;
pub mod events;
pub mod models;
pub mod registrations;
pub mod setup;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
