use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Partial unique index on `users.email` among rows that are not deleted.
pub const USERS_EMAIL_KEY: &str = "users_email_live_key";
/// Partial unique index on `users.username` among rows that are not deleted.
pub const USERS_USERNAME_KEY: &str = "users_username_live_key";

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email VARCHAR(255) NOT NULL,
        username VARCHAR(255) NOT NULL,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
        date_created TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_POSTS: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id SERIAL PRIMARY KEY,
        user_id INT NOT NULL,
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
        date_created TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_POSTS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS posts_user_id_idx ON posts (user_id)";

/// Create tables and indexes if they don't exist yet. Safe to run on every start.
pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    let statements = [
        CREATE_USERS.to_string(),
        unique_live_index(USERS_EMAIL_KEY, "email"),
        unique_live_index(USERS_USERNAME_KEY, "username"),
        CREATE_POSTS.to_string(),
        CREATE_POSTS_OWNER_INDEX.to_string(),
    ];

    for statement in &statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    }

    info!("Database schema is up to date");
    Ok(())
}

/// Uniqueness only binds rows that are still live, so a soft-deleted user
/// doesn't block a new registration with the same email or username.
fn unique_live_index(name: &str, column: &str) -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {name} ON users ({column}) WHERE is_deleted = FALSE"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_indexes_are_partial() {
        let sql = unique_live_index(USERS_EMAIL_KEY, "email");
        assert_eq!(
            sql,
            "CREATE UNIQUE INDEX IF NOT EXISTS users_email_live_key ON users (email) WHERE is_deleted = FALSE"
        );
    }
}
