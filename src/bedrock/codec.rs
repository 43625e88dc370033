use crate::error::{BedrockError, Result};
use base64::Engine as _;

pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| BedrockError::DecodeError(format!("invalid base64 image data: {}", e)))
}
