// Persistence for resource records

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::query::Pagination;
use crate::resources::Resource;

/// Storage seam for one resource type
///
/// Every method is a single unit of work: it either completes or leaves the
/// store untouched.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Insert a record and return it with its generated id
    async fn insert(&self, fields: R::Fields) -> Result<R, ApiError>;

    /// One page of records in insertion order
    async fn list(&self, page: Pagination) -> Result<Vec<R>, ApiError>;

    async fn get(&self, id: i32) -> Result<Option<R>, ApiError>;

    /// Overwrite every writable field; `None` if the id does not exist
    async fn replace(&self, id: i32, fields: R::Fields) -> Result<Option<R>, ApiError>;

    /// Merge the supplied fields into the record; `None` if the id does not exist
    async fn patch(&self, id: i32, patch: R::Patch) -> Result<Option<R>, ApiError>;

    /// Remove a record; `false` if the id does not exist
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// SQL statements for one table, rendered once at construction
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    list: String,
    get: String,
    lock: String,
    update: String,
    delete: String,
}

impl Statements {
    fn for_table(table: &str, columns: &[&str]) -> Self {
        let column_list = columns.join(", ");
        let returning = format!("id, {}", column_list);
        let placeholders = (1..=columns.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_param = columns.len() + 1;

        Self {
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                table, column_list, placeholders, returning
            ),
            list: format!(
                "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
                returning, table
            ),
            get: format!("SELECT {} FROM {} WHERE id = $1", returning, table),
            lock: format!("SELECT {} FROM {} WHERE id = $1 FOR UPDATE", returning, table),
            update: format!(
                "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
                table, assignments, id_param, returning
            ),
            delete: format!("DELETE FROM {} WHERE id = $1", table),
        }
    }
}

/// PostgreSQL-backed store, generic over the resource type
pub struct PgResourceStore<R> {
    pool: PgPool,
    statements: Statements,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> PgResourceStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statements: Statements::for_table(R::TABLE, R::COLUMNS),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for PgResourceStore<R> {
    async fn insert(&self, fields: R::Fields) -> Result<R, ApiError> {
        let query = sqlx::query_as::<_, R>(&self.statements.insert);
        let record = R::bind_fields(query, fields).fetch_one(&self.pool).await?;

        tracing::info!("Created {} with id: {}", R::NAME, record.id());
        Ok(record)
    }

    async fn list(&self, page: Pagination) -> Result<Vec<R>, ApiError> {
        let records = sqlx::query_as::<_, R>(&self.statements.list)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Retrieved {} {} records", records.len(), R::NAME);
        Ok(records)
    }

    async fn get(&self, id: i32) -> Result<Option<R>, ApiError> {
        let record = sqlx::query_as::<_, R>(&self.statements.get)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn replace(&self, id: i32, fields: R::Fields) -> Result<Option<R>, ApiError> {
        let query = sqlx::query_as::<_, R>(&self.statements.update);
        let record = R::bind_fields(query, fields)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if record.is_some() {
            tracing::info!("Replaced {} with id: {}", R::NAME, id);
        }
        Ok(record)
    }

    async fn patch(&self, id: i32, patch: R::Patch) -> Result<Option<R>, ApiError> {
        // Read-merge-write under a row lock; dropping tx without commit
        // rolls back
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, R>(&self.statements.lock)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut fields = existing.fields();
        R::apply_patch(&mut fields, patch);

        let query = sqlx::query_as::<_, R>(&self.statements.update);
        let updated = R::bind_fields(query, fields)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Patched {} with id: {}", R::NAME, id);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(&self.statements.delete)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Deleted {} with id: {}", R::NAME, id);
        }
        Ok(deleted)
    }
}
