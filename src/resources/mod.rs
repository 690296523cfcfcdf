// Resource routers: vehicles, equipment and equipment-safety records
// All three share one CRUD pipeline, parameterized by the Resource trait

pub mod equipment;
pub mod equipment_safety;
pub mod handlers;
pub mod repository;
pub mod vehicles;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};
use validator::Validate;

use crate::app::AppState;

pub use equipment::Equipment;
pub use equipment_safety::EquipmentSafety;
pub use handlers::resource_routes;
pub use repository::{PgResourceStore, ResourceStore};
pub use vehicles::Vehicle;

/// Query type the Postgres store binds resource fields onto
pub type ResourceQuery<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// A record type exposed through the generic CRUD endpoints
///
/// `Fields` is the full writable payload (POST and PUT), `Patch` the same
/// fields made optional (PATCH). The record itself is `Fields` plus an id.
pub trait Resource:
    Serialize + for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    type Fields: DeserializeOwned + Validate + Clone + Send + Sync + 'static;
    type Patch: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Human readable name used in error messages
    const NAME: &'static str;
    /// Route prefix, e.g. `/vehicles`
    const PATH: &'static str;
    /// Database table
    const TABLE: &'static str;
    /// Writable columns in bind order
    const COLUMNS: &'static [&'static str];
    /// Key wrapping the array in list responses
    const LIST_KEY: &'static str;

    fn id(&self) -> i32;

    fn from_parts(id: i32, fields: Self::Fields) -> Self;

    fn fields(&self) -> Self::Fields;

    /// Overwrite only the fields present in `patch`
    fn apply_patch(fields: &mut Self::Fields, patch: Self::Patch);

    /// Bind `fields` in `COLUMNS` order
    fn bind_fields<'q>(query: ResourceQuery<'q, Self>, fields: Self::Fields) -> ResourceQuery<'q, Self>;

    /// The store holding records of this type
    fn store(state: &AppState) -> &Arc<dyn ResourceStore<Self>>;
}

/// Deserializer for PATCH fields that may be explicitly set to null
///
/// Used with `#[serde(default)]`: an absent key stays `None`, `null`
/// becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize<'de>>::deserialize(deserializer).map(Some)
}
