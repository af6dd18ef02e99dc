pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStorage;
pub use repository::PgStorage;
pub use store::{PostStore, Storage, UserStore};
