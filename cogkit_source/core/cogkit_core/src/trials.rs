//! Game options, parameter and trial schemas, and the lifecycle events a
//! game emits towards its session.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    pub default: Value,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrialValueType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl TrialValueType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrialSchemaEntry {
    #[serde(rename = "type")]
    pub value_type: TrialValueType,
    #[serde(default)]
    pub description: String,
    /// Accepts JSON null in addition to `value_type`.
    #[serde(default)]
    pub nullable: bool,
}

impl TrialSchemaEntry {
    pub fn new(value_type: TrialValueType, description: impl Into<String>) -> Self {
        Self {
            value_type,
            description: description.into(),
            nullable: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    pub id: String,
    pub name: String,
    pub version: String,
    pub width: f32,
    pub height: f32,
    pub fps: Option<f32>,
    /// Number of trials the game intends to run.
    pub trials: usize,
    pub parameters: IndexMap<String, ParameterSpec>,
    pub trial_schema: IndexMap<String, TrialSchemaEntry>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            id: "game".to_string(),
            name: "Game".to_string(),
            version: "0.1.0".to_string(),
            width: 400.0,
            height: 800.0,
            fps: None,
            trials: 0,
            parameters: IndexMap::new(),
            trial_schema: IndexMap::new(),
        }
    }
}

impl GameOptions {
    pub fn validate_trial_value(&self, key: &str, value: &Value) -> Result<()> {
        let entry = self.trial_schema.get(key).ok_or_else(|| {
            Error::TrialSchema(format!("\"{key}\" is not in the trial schema of {}", self.id))
        })?;
        if (value.is_null() && entry.nullable) || entry.value_type.matches(value) {
            return Ok(());
        }
        Err(Error::TrialSchema(format!(
            "\"{key}\" expects {:?}, got {value}",
            entry.value_type
        )))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityEventKind {
    ActivityStart,
    ActivityEnd,
    ActivityCancel,
    ActivityData,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub kind: ActivityEventKind,
    pub activity_id: String,
    pub activity_uuid: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Trial record for `ActivityData`.
    pub data: Option<Value>,
}

/// Trial being filled in by `add_trial_data`.
#[derive(Clone, Debug, Default)]
pub(crate) struct TrialState {
    pub index: usize,
    pub current: Map<String, Value>,
}

impl TrialState {
    /// Fresh record with every schema key present and null.
    pub fn reset(&mut self, options: &GameOptions) {
        self.current = options
            .trial_schema
            .keys()
            .map(|k| (k.clone(), Value::Null))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> GameOptions {
        let mut options = GameOptions::default();
        options.trial_schema.insert(
            "response_time_ms".into(),
            TrialSchemaEntry::new(TrialValueType::Number, "time to respond"),
        );
        options.trial_schema.insert(
            "selected".into(),
            TrialSchemaEntry {
                nullable: true,
                ..TrialSchemaEntry::new(TrialValueType::Integer, "index of choice")
            },
        );
        options
    }

    #[test]
    fn trial_values_are_checked_against_schema() {
        let options = options();
        assert!(options.validate_trial_value("response_time_ms", &json!(512.5)).is_ok());
        assert!(options.validate_trial_value("selected", &json!(2)).is_ok());
        assert!(options.validate_trial_value("selected", &Value::Null).is_ok());
        assert!(matches!(
            options.validate_trial_value("selected", &json!(2.5)),
            Err(Error::TrialSchema(_))
        ));
        assert!(matches!(
            options.validate_trial_value("response_time_ms", &json!("fast")),
            Err(Error::TrialSchema(_))
        ));
        assert!(options.validate_trial_value("missing", &json!(1)).is_err());
    }

    #[test]
    fn options_parse_from_camel_case_json() {
        let options: GameOptions = serde_json::from_value(json!({
            "id": "grid-memory",
            "width": 400,
            "height": 800,
            "parameters": {
                "number_of_trials": { "default": 5, "description": "trials per game" }
            },
            "trialSchema": {
                "correct": { "type": "boolean" }
            }
        }))
        .unwrap();
        assert_eq!(options.id, "grid-memory");
        assert_eq!(options.parameters["number_of_trials"].default, json!(5));
        assert_eq!(
            options.trial_schema["correct"].value_type,
            TrialValueType::Boolean
        );
        assert_eq!(options.version, "0.1.0");
    }

    #[test]
    fn reset_fills_schema_keys_with_null() {
        let mut state = TrialState::default();
        state.reset(&options());
        assert_eq!(state.current.len(), 2);
        assert!(state.current.values().all(Value::is_null));
    }
}
