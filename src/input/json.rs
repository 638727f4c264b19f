//! `input.json` schema (spec §6.3): one array of action definitions, loaded
//! per-project. Field names mirror the upper-snake-case JSON keys via
//! `#[serde(rename = "...")]` since idiomatic Rust field names diverge from
//! them.

use serde::{Deserialize, Serialize};

use crate::input::channel::{ActionType, BindingType, InputActionCreateInfo, InputSource, ValueType};
use crate::input::key::KeyboardKey;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JsonValueType {
    Bool,
    Float,
    #[serde(rename = "FLOAT_2")]
    Float2,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum JsonBindingType {
    #[serde(rename = "BINDING")]
    Binding,
    #[serde(rename = "COMPOSITE_UP_DOWN_RIGHT_LEFT")]
    CompositeUpDownRightLeft,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JsonInputSource {
    Keyboard,
    Mouse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonInputAction {
    pub name: String,
    #[serde(rename = "INPUT_VALUE")]
    pub value_type: JsonValueType,
    #[serde(rename = "INPUT_BINDING")]
    pub binding_type: JsonBindingType,
    #[serde(rename = "INPUT_SOURCE")]
    pub source: JsonInputSource,
    #[serde(rename = "KEYS")]
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InputJson {
    pub input_actions: Vec<JsonInputAction>,
}

fn parse_key(name: &str) -> Option<KeyboardKey> {
    // `KeyboardKey::as_str` returns the same identifiers the JSON schema
    // uses (`"A"`, `"SpaceBar"`, ...), so round-tripping through every
    // variant is cheap and keeps this in lock-step with the key table.
    scan_all_keys().into_iter().find(|key| key.as_str() == name)
}

fn scan_all_keys() -> Vec<KeyboardKey> {
    crate::input::key::scan_code_table()
        .iter()
        .filter_map(|entry| *entry)
        .collect()
}

impl JsonInputAction {
    /// Converts the JSON record into the runtime create-info, dropping any
    /// key name that doesn't resolve against the portable key table.
    pub fn to_create_info(&self) -> InputActionCreateInfo {
        let value_type = match self.value_type {
            JsonValueType::Bool => ValueType::Bool,
            JsonValueType::Float => ValueType::Float,
            JsonValueType::Float2 => ValueType::Float2,
        };
        let binding_type = match self.binding_type {
            JsonBindingType::Binding => BindingType::Binding,
            JsonBindingType::CompositeUpDownRightLeft => BindingType::CompositeUpDownRightLeft,
        };
        let source = match self.source {
            JsonInputSource::Keyboard => InputSource::Keyboard,
            JsonInputSource::Mouse => InputSource::Mouse,
        };
        let action_type = match binding_type {
            BindingType::Binding => ActionType::Button,
            BindingType::CompositeUpDownRightLeft => ActionType::Value,
        };
        let keys = self.keys.iter().filter_map(|k| parse_key(k)).collect();

        InputActionCreateInfo {
            value_type,
            action_type,
            binding_type,
            source,
            keys,
        }
    }
}
