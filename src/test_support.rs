// In-memory stores and fixtures for tests that run without PostgreSQL

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::app::AppState;
use crate::auth::{
    error::AuthError,
    models::{NewUser, RegisterRequest, User},
    AuthService, TokenService, UserStore,
};
use crate::error::ApiError;
use crate::query::Pagination;
use crate::resources::{Resource, ResourceStore};

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing";

pub fn test_token_service() -> TokenService {
    TokenService::with_ttls(
        TEST_SECRET,
        Algorithm::HS256,
        Duration::minutes(30),
        Duration::days(7),
    )
}

/// User store backed by a Vec; ids start at 1
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists);
        }

        let created = User {
            id: users.len() as i32 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            admin: user.admin,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

struct Records<R> {
    next_id: i32,
    rows: BTreeMap<i32, R>,
}

/// Resource store backed by an ordered map; ids are never reused
pub struct MemoryResourceStore<R> {
    records: Mutex<Records<R>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Default for MemoryResourceStore<R> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Records {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryResourceStore<R> {
    async fn insert(&self, fields: R::Fields) -> Result<R, ApiError> {
        let mut records = self.records.lock().unwrap();
        let id = records.next_id;
        records.next_id += 1;

        let record = R::from_parts(id, fields);
        records.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn list(&self, page: Pagination) -> Result<Vec<R>, ApiError> {
        let records = self.records.lock().unwrap();
        let offset = usize::try_from(page.offset).unwrap_or(0);
        let limit = usize::try_from(page.limit).unwrap_or(0);

        Ok(records
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<R>, ApiError> {
        let records = self.records.lock().unwrap();
        Ok(records.rows.get(&id).cloned())
    }

    async fn replace(&self, id: i32, fields: R::Fields) -> Result<Option<R>, ApiError> {
        let mut records = self.records.lock().unwrap();
        match records.rows.get_mut(&id) {
            Some(row) => {
                *row = R::from_parts(id, fields);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn patch(&self, id: i32, patch: R::Patch) -> Result<Option<R>, ApiError> {
        let mut records = self.records.lock().unwrap();
        match records.rows.get_mut(&id) {
            Some(row) => {
                let mut fields = row.fields();
                R::apply_patch(&mut fields, patch);
                *row = R::from_parts(id, fields);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.rows.remove(&id).is_some())
    }
}

/// AppState wired entirely to in-memory stores
pub fn test_state() -> AppState {
    AppState {
        auth: AuthService::new(Arc::new(MemoryUserStore::default()), test_token_service()),
        vehicles: Arc::new(MemoryResourceStore::default()),
        equipment: Arc::new(MemoryResourceStore::default()),
        equipment_safety: Arc::new(MemoryResourceStore::default()),
    }
}

/// Register a user through the auth service
pub async fn seed_user(state: &AppState, email: &str, password: &str, admin: bool) -> User {
    state
        .auth
        .register(RegisterRequest {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password: password.to_string(),
            admin,
        })
        .await
        .expect("seed user")
}

/// `Authorization` header value for a user's fresh access token
pub fn bearer_for(state: &AppState, user: &User) -> String {
    let token = state
        .auth
        .tokens()
        .issue_access_token(user.id)
        .expect("issue token");
    format!("Bearer {}", token)
}

/// Pool against a live database, with migrations applied
///
/// Only for `#[ignore]`d tests; run them with `DATABASE_URL` set and
/// `cargo test -- --ignored`.
pub async fn pg_pool() -> sqlx::PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = crate::db::create_pool(&database_url, 2)
        .await
        .expect("Failed to connect to test database");
    crate::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
