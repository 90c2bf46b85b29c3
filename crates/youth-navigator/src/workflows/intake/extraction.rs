//! Wire contract of the free-text extraction service.
//!
//! Nothing here calls a language model; the service's JSON reply is accepted
//! as-is and turned into facts the navigator already understands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{FactValue, Facts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    #[serde(default)]
    pub extracted_data: BTreeMap<String, Value>,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
    #[serde(default)]
    pub empathic_response: String,
    #[serde(default)]
    pub suggested_categories: Vec<String>,
    #[serde(default)]
    pub needs_immediate_help: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
}

impl ExtractionResponse {
    /// Extracted fields that map onto fact values. Nulls, objects and blank
    /// strings are ignored.
    pub fn facts(&self) -> Facts {
        self.extracted_data
            .iter()
            .filter_map(|(field, value)| fact_from_json(value).map(|fact| (field.clone(), fact)))
            .collect()
    }
}

pub fn fact_from_json(value: &Value) -> Option<FactValue> {
    match value {
        Value::Bool(flag) => Some(FactValue::Flag(*flag)),
        Value::Number(number) => number.as_f64().map(FactValue::Number),
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(FactValue::Text(text.trim().to_string())),
        Value::Array(items) => {
            let items: Vec<FactValue> = items.iter().filter_map(fact_from_json).collect();
            (!items.is_empty()).then_some(FactValue::List(items))
        }
        Value::Null | Value::Object(_) => None,
    }
}
