//! Model listing (`/api/tags`) response types.
//!
//! Configurations are presented as installed "models". The descriptors are
//! synthetic: size is always 0 and the format metadata is static — this is
//! identity information for clients that enumerate models, not measured
//! file data.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub name: String,
    pub model: String,
    pub modified_at: String,
    pub size: u64,
    pub details: ModelDetails,
}

#[derive(Debug, Serialize)]
pub struct ModelDetails {
    pub format: String,
    pub family: String,
    pub parameter_size: String,
    pub quantization_level: String,
}

impl ModelEntry {
    /// Synthetic descriptor for one configuration name.
    pub fn for_configuration(name: String, timestamp: &str) -> Self {
        Self {
            model: name.clone(),
            name,
            modified_at: timestamp.to_string(),
            size: 0,
            details: ModelDetails {
                format: "gguf".to_string(),
                family: "llama".to_string(),
                parameter_size: "unknown".to_string(),
                quantization_level: "unknown".to_string(),
            },
        }
    }
}
