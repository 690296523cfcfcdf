// Vehicle records

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::app::AppState;
use crate::resources::{Resource, ResourceQuery, ResourceStore};

/// A vehicle; `type` is one of terrestrial, aquatic or aerial by convention
/// but is stored as free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "type")]
    #[schema(example = "terrestrial")]
    pub vehicle_type: String,
    #[schema(example = "Tumbler")]
    pub model: String,
    #[schema(example = 2005)]
    pub year: Option<i32>,
}

/// Writable vehicle fields (POST and PUT body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct VehicleFields {
    #[serde(rename = "type")]
    #[schema(example = "terrestrial")]
    pub vehicle_type: String,
    #[schema(example = "Tumbler")]
    pub model: String,
    #[serde(default)]
    #[schema(example = 2005)]
    pub year: Option<i32>,
}

/// PATCH body; `"year": null` clears the year, an absent key keeps it
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct VehiclePatch {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub model: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<i32>)]
    pub year: Option<Option<i32>>,
}

impl Resource for Vehicle {
    type Fields = VehicleFields;
    type Patch = VehiclePatch;

    const NAME: &'static str = "Vehicle";
    const PATH: &'static str = "/vehicles";
    const TABLE: &'static str = "vehicles";
    const COLUMNS: &'static [&'static str] = &["vehicle_type", "model", "year"];
    const LIST_KEY: &'static str = "vehicle";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_parts(id: i32, fields: VehicleFields) -> Self {
        Self {
            id,
            vehicle_type: fields.vehicle_type,
            model: fields.model,
            year: fields.year,
        }
    }

    fn fields(&self) -> VehicleFields {
        VehicleFields {
            vehicle_type: self.vehicle_type.clone(),
            model: self.model.clone(),
            year: self.year,
        }
    }

    fn apply_patch(fields: &mut VehicleFields, patch: VehiclePatch) {
        if let Some(vehicle_type) = patch.vehicle_type {
            fields.vehicle_type = vehicle_type;
        }
        if let Some(model) = patch.model {
            fields.model = model;
        }
        if let Some(year) = patch.year {
            fields.year = year;
        }
    }

    fn bind_fields<'q>(
        query: ResourceQuery<'q, Self>,
        fields: VehicleFields,
    ) -> ResourceQuery<'q, Self> {
        query
            .bind(fields.vehicle_type)
            .bind(fields.model)
            .bind(fields.year)
    }

    fn store(state: &AppState) -> &Arc<dyn ResourceStore<Self>> {
        &state.vehicles
    }
}
