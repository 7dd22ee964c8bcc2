pub mod columns;
pub mod connection;
pub mod matches;
pub mod players;
pub mod settings;
pub mod setup;
pub mod stats;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use setup::initialize_database;
