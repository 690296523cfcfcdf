// Equipment safety records

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::app::AppState;
use crate::resources::{Resource, ResourceQuery, ResourceStore};

/// Safety record for a piece of equipment
///
/// `status` is the operational flag. It is a boolean column, but travels
/// over JSON as the string `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentSafety {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Cape glider")]
    pub name: String,
    #[serde(with = "status_string")]
    #[schema(value_type = String, example = "true")]
    pub status: bool,
    #[schema(example = "Memory fabric inspected")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EquipmentSafetyFields {
    pub name: String,
    #[serde(with = "status_string")]
    #[schema(value_type = String, example = "true")]
    pub status: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EquipmentSafetyPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "status_string::deserialize_option")]
    #[schema(value_type = Option<String>, example = "false")]
    pub status: Option<bool>,
    pub description: Option<String>,
}

/// Serde adapter between `bool` and the strings `"true"` / `"false"`
///
/// Input is case-insensitive; anything else fails to deserialize.
pub mod status_string {
    use serde::{de::Error, de::Unexpected, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *status { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse::<D::Error>(&raw)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse::<D::Error>(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn parse<E: Error>(raw: &str) -> Result<bool, E> {
        match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(E::invalid_value(Unexpected::Str(raw), &"\"true\" or \"false\"")),
        }
    }
}

impl Resource for EquipmentSafety {
    type Fields = EquipmentSafetyFields;
    type Patch = EquipmentSafetyPatch;

    const NAME: &'static str = "Equipment Safety";
    const PATH: &'static str = "/equipment-safety";
    const TABLE: &'static str = "equipment_safety";
    const COLUMNS: &'static [&'static str] = &["name", "status", "description"];
    const LIST_KEY: &'static str = "equipmentSafety";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_parts(id: i32, fields: EquipmentSafetyFields) -> Self {
        Self {
            id,
            name: fields.name,
            status: fields.status,
            description: fields.description,
        }
    }

    fn fields(&self) -> EquipmentSafetyFields {
        EquipmentSafetyFields {
            name: self.name.clone(),
            status: self.status,
            description: self.description.clone(),
        }
    }

    fn apply_patch(fields: &mut EquipmentSafetyFields, patch: EquipmentSafetyPatch) {
        if let Some(name) = patch.name {
            fields.name = name;
        }
        if let Some(status) = patch.status {
            fields.status = status;
        }
        if let Some(description) = patch.description {
            fields.description = description;
        }
    }

    fn bind_fields<'q>(
        query: ResourceQuery<'q, Self>,
        fields: EquipmentSafetyFields,
    ) -> ResourceQuery<'q, Self> {
        query
            .bind(fields.name)
            .bind(fields.status)
            .bind(fields.description)
    }

    fn store(state: &AppState) -> &Arc<dyn ResourceStore<Self>> {
        &state.equipment_safety
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_a_string_on_the_wire() {
        let record = EquipmentSafety {
            id: 2,
            name: "Rebreather".to_string(),
            status: true,
            description: "Seals checked".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "true");
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        let fields: EquipmentSafetyFields = serde_json::from_str(
            r#"{"name": "Rebreather", "status": "FALSE", "description": "Leaking"}"#,
        )
        .unwrap();
        assert!(!fields.status);

        let fields: EquipmentSafetyFields = serde_json::from_str(
            r#"{"name": "Rebreather", "status": "True", "description": "Fine"}"#,
        )
        .unwrap();
        assert!(fields.status);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        for body in [
            r#"{"name": "Rebreather", "status": "maybe", "description": ""}"#,
            r#"{"name": "Rebreather", "status": true, "description": ""}"#,
        ] {
            assert!(serde_json::from_str::<EquipmentSafetyFields>(body).is_err());
        }
    }

    #[test]
    fn test_patch_status_is_optional() {
        let patch: EquipmentSafetyPatch = serde_json::from_str(r#"{"name": "Cowl"}"#).unwrap();
        assert_eq!(patch.status, None);

        let patch: EquipmentSafetyPatch = serde_json::from_str(r#"{"status": "false"}"#).unwrap();
        assert_eq!(patch.status, Some(false));
    }
}
