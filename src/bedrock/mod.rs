pub mod codec;
pub mod image_client;
pub mod invoker;
pub mod mock;

use crate::{config::BedrockConfig, credentials::CredentialSource};
use std::sync::Arc;

pub use image_client::ImageClient;
pub use invoker::{BedrockInvoker, ModelInvoker};
pub use mock::MockInvoker;

#[derive(Clone)]
pub struct BedrockClient {
    image_client: ImageClient,
}

impl BedrockClient {
    /// Client backed by Bedrock, with credentials taken from the config when
    /// it carries them and from the AWS default provider chain otherwise.
    pub async fn new(config: &BedrockConfig) -> Self {
        let invoker = BedrockInvoker::load(config).await;
        Self::with_invoker(config, Arc::new(invoker))
    }

    pub async fn with_credentials(
        config: &BedrockConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let invoker = BedrockInvoker::new(config, credentials).await;
        Self::with_invoker(config, Arc::new(invoker))
    }

    pub fn with_invoker(config: &BedrockConfig, invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            image_client: ImageClient::new(invoker, config),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
