use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewPost, Post, PostChanges};
use crate::database::store::PostStore;
use crate::types::PostId;

const POST_COLUMNS: &str =
    "id, user_id, title, content, is_active, is_deleted, date_created, last_updated";

const VISIBLE: &str = "is_active = TRUE AND is_deleted = FALSE";

pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn list_visible(&self) -> Result<Vec<Post>, DatabaseError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE {VISIBLE} ORDER BY id");
        let posts = sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn find_visible(&self, id: PostId) -> Result<Option<Post>, DatabaseError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND {VISIBLE}");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let sql = format!(
            "INSERT INTO posts (user_id, title, content) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, DatabaseError> {
        let sql = format!(
            "UPDATE posts SET \
                title = COALESCE($1, title), \
                content = COALESCE($2, content), \
                last_updated = CURRENT_TIMESTAMP \
             WHERE id = $3 AND {VISIBLE} \
             RETURNING {POST_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Post>(&sql)
            .bind(&changes.title)
            .bind(&changes.content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: PostId) -> Result<Option<Post>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND {VISIBLE} FOR UPDATE");
        let snapshot = sqlx::query_as::<_, Post>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if snapshot.is_some() {
            sqlx::query(
                "UPDATE posts SET is_active = FALSE, is_deleted = TRUE, last_updated = CURRENT_TIMESTAMP \
                 WHERE id = $1",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(snapshot)
    }
}
