// Credential store: persistence of user records

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{NewUser, User},
};

/// Storage seam for users
///
/// Email uniqueness is the store's responsibility: inserting a duplicate
/// must fail with `AuthError::EmailAlreadyExists`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return it with its generated id
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError>;

    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, admin
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e)
        })?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, admin FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, admin FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}
