// Database service module
// SQLite connection, schema management and the SQLite schedule store

mod connection;
pub mod migrations;
mod schema;
mod store;

pub use connection::Database;
pub use store::SqliteScheduleStore;
