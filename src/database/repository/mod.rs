pub mod posts;
pub mod users;

use async_trait::async_trait;

pub use posts::PostRepository;
pub use users::UserRepository;

use super::manager::{DatabaseError, DatabaseManager};
use super::store::{PostStore, Storage, UserStore};

/// PostgreSQL-backed storage: one repository per table over a shared pool.
pub struct PgStorage {
    manager: DatabaseManager,
    users: UserRepository,
    posts: PostRepository,
}

impl PgStorage {
    pub fn new(manager: DatabaseManager) -> Self {
        let pool = manager.pool().clone();
        Self {
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool),
            manager,
        }
    }
}

#[async_trait]
impl Storage for PgStorage {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn posts(&self) -> &dyn PostStore {
        &self.posts
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}
