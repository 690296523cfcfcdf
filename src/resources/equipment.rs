// Equipment records

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::app::AppState;
use crate::resources::{Resource, ResourceQuery, ResourceStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Grappling gun")]
    pub name: String,
    #[schema(example = "Magnetic grapnel, 300 m line")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EquipmentFields {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Resource for Equipment {
    type Fields = EquipmentFields;
    type Patch = EquipmentPatch;

    const NAME: &'static str = "Equipment";
    const PATH: &'static str = "/equipment";
    const TABLE: &'static str = "equipment";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const LIST_KEY: &'static str = "equipment";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_parts(id: i32, fields: EquipmentFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
        }
    }

    fn fields(&self) -> EquipmentFields {
        EquipmentFields {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    fn apply_patch(fields: &mut EquipmentFields, patch: EquipmentPatch) {
        if let Some(name) = patch.name {
            fields.name = name;
        }
        if let Some(description) = patch.description {
            fields.description = description;
        }
    }

    fn bind_fields<'q>(
        query: ResourceQuery<'q, Self>,
        fields: EquipmentFields,
    ) -> ResourceQuery<'q, Self> {
        query.bind(fields.name).bind(fields.description)
    }

    fn store(state: &AppState) -> &Arc<dyn ResourceStore<Self>> {
        &state.equipment
    }
}
