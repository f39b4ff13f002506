//! Response schema of the question generator
//!
//! Parsing is strict: a body missing a required field or carrying a value
//! of the wrong type is rejected as a whole, never rendered partially.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, WorkflowError};
use crate::form::{DifficultyLevel, RoundType};

/// Model name shown when the generator does not report one
pub const DEFAULT_MODEL_LABEL: &str = "Gemini";

/// A generated interview question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub category: String,
    pub difficulty: DifficultyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub follow_up_questions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub expected_topics: Vec<String>,
}

impl Question {
    /// Context text, treating an empty string as absent
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Generator metadata; unknown keys are preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Successful response of the generate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub questions: Vec<Question>,
    pub total_questions: u32,
    pub round_type: RoundType,
    pub difficulty: DifficultyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GenerationMetadata>,
}

impl GenerationResult {
    /// Parse a response body against the schema
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            WorkflowError::GenerationFailed(format!("Malformed response from generator: {}", e))
        })
    }

    /// Model name reported by the generator, or the default label
    pub fn model_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.model.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL_LABEL)
    }
}

/// Response of the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
