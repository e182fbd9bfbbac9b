use async_trait::async_trait;

use crate::auth::repo_types::{NewUser, User};
use crate::db::PgStore;
use crate::storage::UserStore;

#[async_trait]
impl UserStore for PgStore {
    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(user.email)
        .bind(user.name)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
