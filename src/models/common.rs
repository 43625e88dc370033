use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub max_images: u32,
    pub description: String,
}

impl ModelInfo {
    pub fn new(id: &str, name: &str, provider: &str, max_images: u32, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            provider: provider.to_string(),
            max_images,
            description: description.to_string(),
        }
    }
}
