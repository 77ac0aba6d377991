//! Serialized descriptor documents.
//!
//! Both the contract loader and the source extractor emit this shape; the
//! normalizer turns it into the canonical model in `models.rs`.

use crate::domain::models::{BehaviorFlag, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDescriptor {
    #[serde(default)]
    pub schemas: Vec<RawSchema>,
    #[serde(default)]
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    pub entity: String,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,
    /// Declared type as written by the extractor, synonyms allowed.
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "RawConstraints::is_empty")]
    pub constraints: RawConstraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub monetary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstraints {
    #[serde(default, alias = "min", skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<f64>,
    #[serde(default, alias = "max", skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, alias = "values", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl RawConstraints {
    pub fn is_empty(&self) -> bool {
        self == &RawConstraints::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    pub name: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<String>,
    #[serde(default)]
    pub behavior_flags: Vec<BehaviorFlag>,
}
