pub mod database;
pub mod errors;
pub mod models;
pub mod schema;
pub mod store;

// Re-export key types for easy access
pub use database::{get_database_path, Database};
pub use errors::StorageError;
pub use models::{GameId, GameRecord, Role};
pub use store::{AuthStore, GameStore, MemoryStore};
