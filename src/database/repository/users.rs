use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::store::UserStore;
use crate::types::UserId;

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, password, \
     is_active, is_deleted, date_created, last_updated";

const LIVE: &str = "is_active = TRUE AND is_deleted = FALSE";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_live_by(&self, column: &str, value: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1 AND {LIVE}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn list_active(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {LIVE} ORDER BY id");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find_active(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND {LIVE}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.find_live_by("email", email).await
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.find_live_by("username", username).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (email, username, first_name, last_name, password) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET \
                email = COALESCE($1, email), \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                last_updated = CURRENT_TIMESTAMP \
             WHERE id = $4 AND {LIVE} \
             RETURNING {USER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(&changes.email)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND {LIVE} FOR UPDATE");
        let snapshot = sqlx::query_as::<_, User>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if snapshot.is_some() {
            sqlx::query(
                "UPDATE users SET is_active = FALSE, is_deleted = TRUE, last_updated = CURRENT_TIMESTAMP \
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
