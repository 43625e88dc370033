use crate::{
    config::BedrockConfig,
    credentials::{self, CredentialSource},
    error::{BedrockError, Result},
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::Blob,
    Client,
};
use std::sync::Arc;

/// One synchronous model invocation: JSON body in, JSON body out.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// [`ModelInvoker`] backed by the Bedrock runtime `InvokeModel` API.
pub struct BedrockInvoker {
    sdk_config: SdkConfig,
    credentials: Arc<dyn CredentialSource>,
}

impl BedrockInvoker {
    /// Uses the config's static credentials when present and the SDK default
    /// provider chain otherwise.
    pub async fn load(config: &BedrockConfig) -> Self {
        let sdk_config = Self::sdk_config(config).await;
        let credentials = credentials::from_config(config, &sdk_config);
        Self {
            sdk_config,
            credentials,
        }
    }

    pub async fn new(config: &BedrockConfig, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            sdk_config: Self::sdk_config(config).await,
            credentials,
        }
    }

    async fn sdk_config(config: &BedrockConfig) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region_or_default().to_string()))
            .load()
            .await
    }

    // Resolves credentials on every call.
    async fn client(&self) -> Result<Client> {
        let credentials = self.credentials.resolve().await?;
        let conf = aws_sdk_bedrockruntime::config::Builder::from(&self.sdk_config)
            .credentials_provider(credentials.into_sdk())
            .build();
        Ok(Client::from_conf(conf))
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let client = self.client().await?;

        log::debug!("Invoking {} with a {} byte payload", model_id, body.len());

        let response = client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|raw| raw.status().as_u16());

                if let Some(service_error) = e.as_service_error() {
                    log::error!("Service error code: {:?}", service_error.code());
                    log::error!("Service error message: {:?}", service_error.message());
                    BedrockError::from_status(
                        status.unwrap_or(500),
                        service_error.code(),
                        service_error.message().unwrap_or("no message"),
                    )
                } else {
                    let message = DisplayErrorContext(&e).to_string();
                    log::error!("AWS SDK error: {}", message);
                    BedrockError::RemoteServiceError { status, message }
                }
            })?;

        Ok(response.body.into_inner())
    }
}
