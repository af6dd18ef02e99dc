use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{NewPost, NewUser, Post, PostChanges, User, UserChanges};
use crate::types::{PostId, UserId};

/// Row access for `users`. Every read and write only sees live rows
/// (`is_active AND NOT is_deleted`); lookups return `None` for anything else.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_active(&self, id: UserId) -> Result<Option<User>, DatabaseError>;

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `UniqueViolation` when email or username is taken by a live row.
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Returns the updated row, or `None` if no live row has this id.
    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<Option<User>, DatabaseError>;

    /// Flags the row deleted and returns it as it was just before.
    async fn soft_delete(&self, id: UserId) -> Result<Option<User>, DatabaseError>;
}

/// Row access for `posts`, with the same live-row rule as `UserStore`.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_visible(&self) -> Result<Vec<Post>, DatabaseError>;

    async fn find_visible(&self, id: PostId) -> Result<Option<Post>, DatabaseError>;

    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError>;

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, DatabaseError>;

    async fn soft_delete(&self, id: PostId) -> Result<Option<Post>, DatabaseError>;
}

/// A storage backend: both tables plus a liveness check.
#[async_trait]
pub trait Storage: Send + Sync {
    fn users(&self) -> &dyn UserStore;

    fn posts(&self) -> &dyn PostStore;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
