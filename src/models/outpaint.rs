use super::image::{GeneratedImage, MaskSource, SourceImage};
use crate::error::{BedrockError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const MAX_OUTPUT_IMAGES: u32 = 5;
pub const MAX_SEED: u32 = 2_147_483_646;
pub const MIN_CFG_SCALE: f32 = 1.1;
pub const MAX_CFG_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutpaintingMode {
    Default,
    Precise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Standard,
    Premium,
}

/// Optional knobs for a generation. Anything left `None` is omitted from the
/// request so the model's own default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub count: Option<u32>,
    pub seed: Option<u32>,
    pub quality: Option<Quality>,
    pub cfg_scale: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub negative_prompt: Option<String>,
    pub mode: Option<OutpaintingMode>,
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f32) -> Self {
        self.cfg_scale = Some(cfg_scale);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_negative_prompt(mut self, text: impl Into<String>) -> Self {
        self.negative_prompt = Some(text.into());
        self
    }

    pub fn with_mode(mut self, mode: OutpaintingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Number of images the caller should get back.
    pub fn expected_count(&self) -> usize {
        self.count.unwrap_or(1) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(count) = self.count {
            if count == 0 || count > MAX_OUTPUT_IMAGES {
                return Err(BedrockError::ValidationError(format!(
                    "output count must be between 1 and {}, got {}",
                    MAX_OUTPUT_IMAGES, count
                )));
            }
        }
        if let Some(seed) = self.seed {
            if seed > MAX_SEED {
                return Err(BedrockError::ValidationError(format!(
                    "seed must be at most {}, got {}",
                    MAX_SEED, seed
                )));
            }
        }
        if let Some(cfg_scale) = self.cfg_scale {
            if !(MIN_CFG_SCALE..=MAX_CFG_SCALE).contains(&cfg_scale) {
                return Err(BedrockError::ValidationError(format!(
                    "cfg scale must be between {} and {}, got {}",
                    MIN_CFG_SCALE, MAX_CFG_SCALE, cfg_scale
                )));
            }
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(BedrockError::ValidationError(
                "output size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Everything needed for one outpainting call.
///
/// Construction checks the mask against the image, so a `GenerationRequest`
/// never pairs a mask with an image of a different size.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: Arc<SourceImage>,
    pub mask: Arc<MaskSource>,
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(
        image: Arc<SourceImage>,
        mask: Arc<MaskSource>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Result<Self> {
        mask.ensure_matches(&image)?;
        params.validate()?;
        Ok(Self {
            image,
            mask,
            prompt: prompt.into(),
            params,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub images: Vec<GeneratedImage>,
    pub model: String,
    pub seed: Option<u32>,
    pub elapsed: Duration,
}

// Titan Image Generator wire format.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanOutpaintingRequest<'a> {
    pub task_type: &'static str,
    pub out_painting_params: OutPaintingParams<'a>,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutPaintingParams<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_text: Option<&'a str>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_painting_mode: Option<OutpaintingMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_images: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl From<&GenerationParams> for ImageGenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            number_of_images: params.count,
            quality: params.quality,
            cfg_scale: params.cfg_scale,
            seed: params.seed,
            height: params.height,
            width: params.width,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_validation() {
        assert!(GenerationParams::new().validate().is_ok());
        assert!(GenerationParams::new()
            .with_count(5)
            .with_seed(MAX_SEED)
            .with_cfg_scale(7.0)
            .validate()
            .is_ok());

        assert!(GenerationParams::new().with_count(0).validate().is_err());
        assert!(GenerationParams::new().with_count(6).validate().is_err());
        assert!(GenerationParams::new().with_seed(u32::MAX).validate().is_err());
        assert!(GenerationParams::new().with_cfg_scale(0.5).validate().is_err());
        assert!(GenerationParams::new().with_size(0, 512).validate().is_err());
    }

    #[test]
    fn test_expected_count_defaults_to_one() {
        assert_eq!(GenerationParams::new().expected_count(), 1);
        assert_eq!(GenerationParams::new().with_count(3).expected_count(), 3);
    }

    #[test]
    fn test_absent_options_are_omitted() {
        let config = ImageGenerationConfig::from(&GenerationParams::new().with_seed(42));
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({ "seed": 42 }));
    }

    #[test]
    fn test_request_uses_titan_field_names() {
        let params = GenerationParams::new()
            .with_count(2)
            .with_quality(Quality::Premium)
            .with_cfg_scale(7.5)
            .with_mode(OutpaintingMode::Precise);
        let request = TitanOutpaintingRequest {
            task_type: "OUTPAINTING",
            out_painting_params: OutPaintingParams {
                text: "a beach",
                negative_text: Some("people"),
                image: "aW1n".into(),
                mask_image: None,
                mask_prompt: Some("dog"),
                out_painting_mode: params.mode,
            },
            image_generation_config: (&params).into(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "taskType": "OUTPAINTING",
                "outPaintingParams": {
                    "text": "a beach",
                    "negativeText": "people",
                    "image": "aW1n",
                    "maskPrompt": "dog",
                    "outPaintingMode": "PRECISE"
                },
                "imageGenerationConfig": {
                    "numberOfImages": 2,
                    "quality": "premium",
                    "cfgScale": 7.5
                }
            })
        );
    }

    #[test]
    fn test_params_deserialize_from_partial_json() {
        let params: GenerationParams =
            serde_json::from_value(json!({ "count": 2, "mode": "DEFAULT" })).unwrap();
        assert_eq!(params.count, Some(2));
        assert_eq!(params.mode, Some(OutpaintingMode::Default));
        assert!(params.seed.is_none());
    }
}
