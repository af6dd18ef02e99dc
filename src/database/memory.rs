//! In-process storage with the same semantics as the PostgreSQL backend,
//! including the live-row uniqueness rule. Used by `--in-memory` runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::migrations::{USERS_EMAIL_KEY, USERS_USERNAME_KEY};
use super::models::{NewPost, NewUser, Post, PostChanges, User, UserChanges};
use super::store::{PostStore, Storage, UserStore};
use crate::types::{PostId, UserId};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    next_user_id: UserId,
    next_post_id: PostId,
}

impl Tables {
    fn live_user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id && u.is_visible())
    }

    fn visible_post_mut(&mut self, id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id && p.is_visible())
    }

    /// Mirrors the partial unique indexes: only rows not deleted count.
    fn check_unique(&self, except: Option<UserId>, email: Option<&str>, username: Option<&str>) -> Result<(), DatabaseError> {
        let others = self
            .users
            .iter()
            .filter(|u| !u.is_deleted && Some(u.id) != except);

        for user in others {
            if email == Some(user.email.as_str()) {
                return Err(DatabaseError::UniqueViolation {
                    constraint: USERS_EMAIL_KEY.to_string(),
                });
            }
            if username == Some(user.username.as_str()) {
                return Err(DatabaseError::UniqueViolation {
                    constraint: USERS_USERNAME_KEY.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn list_active(&self) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().filter(|u| u.is_visible()).cloned().collect())
    }

    async fn find_active(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id && u.is_visible()).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email && u.is_visible()).cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username && u.is_visible()).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_unique(None, Some(&user.email), Some(&user.username))?;

        tables.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: tables.next_user_id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password_hash,
            is_active: true,
            is_deleted: false,
            date_created: now,
            last_updated: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.live_user_mut(id).is_none() {
            return Ok(None);
        }
        tables.check_unique(Some(id), changes.email.as_deref(), None)?;

        let Some(user) = tables.live_user_mut(id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &changes.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = last_name.clone();
        }
        user.last_updated = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn soft_delete(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.live_user_mut(id).map(|user| {
            let snapshot = user.clone();
            user.is_active = false;
            user.is_deleted = true;
            user.last_updated = Utc::now();
            snapshot
        }))
    }
}

#[async_trait]
impl PostStore for MemoryStorage {
    async fn list_visible(&self) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().filter(|p| p.is_visible()).cloned().collect())
    }

    async fn find_visible(&self, id: PostId) -> Result<Option<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id && p.is_visible()).cloned())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.next_post_id += 1;
        let now = Utc::now();
        let created = Post {
            id: tables.next_post_id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            is_active: true,
            is_deleted: false,
            date_created: now,
            last_updated: now,
        };
        tables.posts.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.visible_post_mut(id).map(|post| {
            if let Some(title) = &changes.title {
                post.title = title.clone();
            }
            if let Some(content) = &changes.content {
                post.content = content.clone();
            }
            post.last_updated = Utc::now();
            post.clone()
        }))
    }

    async fn soft_delete(&self, id: PostId) -> Result<Option<Post>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.visible_post_mut(id).map(|post| {
            let snapshot = post.clone();
            post.is_active = false;
            post.is_deleted = true;
            post.last_updated = Utc::now();
            snapshot
        }))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn users(&self) -> &dyn UserStore {
        self
    }

    fn posts(&self) -> &dyn PostStore {
        self
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
