use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::{PostId, UserId};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: PostId,
    /// Owner; fixed at creation.
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Post {
    pub fn is_visible(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

/// Partial update of a post; the owner is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}
