use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Account row backing login and administrator membership.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_digest: String,
    pub is_staff: bool,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_digest, is_staff) \
             VALUES ($1, $2, $3, FALSE) \
             RETURNING id, username, password_digest, is_staff",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_digest)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, username, password_digest, is_staff FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
