use super::{codec, ModelInvoker};
use crate::{
    config::BedrockConfig,
    error::{BedrockError, Result},
    logger,
    models::{
        GeneratedImage, GenerationParams, GenerationRequest, GenerationResult,
        ImageGenerationConfig, MaskSource, ModelInfo, OutPaintingParams, SourceImage,
        TitanImageResponse, TitanOutpaintingRequest,
    },
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct ImageClient {
    invoker: Arc<dyn ModelInvoker>,
    model_id: String,
    timeout: Option<Duration>,
    max_image_dimension: u32,
    max_request_bytes: usize,
}

impl ImageClient {
    pub fn new(invoker: Arc<dyn ModelInvoker>, config: &BedrockConfig) -> Self {
        Self {
            invoker,
            model_id: config.model_id.clone(),
            timeout: config.timeout,
            max_image_dimension: config.max_image_dimension,
            max_request_bytes: config.max_request_bytes,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                "amazon.titan-image-generator-v2:0",
                "Titan Image Generator G1 v2",
                "Amazon",
                5,
                "Outpainting with mask images or mask prompts",
            ),
            ModelInfo::new(
                "amazon.titan-image-generator-v1",
                "Titan Image Generator G1",
                "Amazon",
                5,
                "First generation Titan image model",
            ),
        ]
    }

    /// Replaces the masked background of `image` with content described by
    /// `prompt`.
    ///
    /// Every local check runs before the model is called. Past them exactly
    /// one invocation is made, with no retry.
    pub async fn generate(
        &self,
        image: Arc<SourceImage>,
        mask: Arc<MaskSource>,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<GenerationResult> {
        let request = GenerationRequest::new(image, mask, prompt, params)?;
        self.execute(&request).await
    }

    pub async fn execute(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.check_image_size(&request.image)?;

        let body = build_request_body(request)?;
        if body.len() > self.max_request_bytes {
            return Err(BedrockError::ValidationError(format!(
                "request payload is {} bytes, the limit is {}",
                body.len(),
                self.max_request_bytes
            )));
        }

        log::info!("Generating outpainting with model: {}", self.model_id);
        let _timer = logger::timer("outpainting request");
        let started = Instant::now();

        let call = self.invoker.invoke(&self.model_id, body);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| BedrockError::TimeoutError(limit))??,
            None => call.await?,
        };

        let images = decode_response(&response, request.params.expected_count())?;
        log::info!(
            "Received {} image(s) from {} in {:.2}s",
            images.len(),
            self.model_id,
            started.elapsed().as_secs_f64()
        );

        Ok(GenerationResult {
            images,
            model: self.model_id.clone(),
            seed: request.params.seed,
            elapsed: started.elapsed(),
        })
    }

    fn check_image_size(&self, image: &SourceImage) -> Result<()> {
        let limit = self.max_image_dimension;
        if image.width() > limit || image.height() > limit {
            return Err(BedrockError::ValidationError(format!(
                "image is {}x{}, height and width must be at most {} pixels",
                image.width(),
                image.height(),
                limit
            )));
        }
        Ok(())
    }
}

pub fn build_request_body(request: &GenerationRequest) -> Result<Vec<u8>> {
    let image = codec::encode(&request.image.api_bytes()?);
    let (mask_image, mask_prompt) = match request.mask.as_ref() {
        MaskSource::Bitmap(mask) => (Some(codec::encode(&mask.to_png()?)), None),
        MaskSource::Prompt(text) => (None, Some(text.as_str())),
    };

    let payload = TitanOutpaintingRequest {
        task_type: "OUTPAINTING",
        out_painting_params: OutPaintingParams {
            text: &request.prompt,
            negative_text: request
                .params
                .negative_prompt
                .as_deref()
                .filter(|text| !text.trim().is_empty()),
            image,
            mask_image,
            mask_prompt,
            out_painting_mode: request.params.mode,
        },
        image_generation_config: ImageGenerationConfig::from(&request.params),
    };

    Ok(serde_json::to_vec(&payload)?)
}

/// Decodes a Titan response, insisting on exactly `expected` images.
pub fn decode_response(body: &[u8], expected: usize) -> Result<Vec<GeneratedImage>> {
    let response: TitanImageResponse = serde_json::from_slice(body)
        .map_err(|e| BedrockError::DecodeError(format!("malformed response body: {}", e)))?;

    if let Some(error) = response.error.filter(|error| !error.is_empty()) {
        return Err(BedrockError::RemoteServiceError {
            status: None,
            message: error,
        });
    }

    if response.images.len() != expected {
        return Err(BedrockError::DecodeError(format!(
            "expected {} image(s), the model returned {}",
            expected,
            response.images.len()
        )));
    }

    response
        .images
        .iter()
        .map(|encoded| GeneratedImage::from_bytes(codec::decode(encoded)?))
        .collect()
}
