//! Credential resolution for the Bedrock client.
//!
//! The client never looks credentials up on its own: a [`CredentialSource`]
//! is handed to it at construction and consulted once per request.

use crate::config::BedrockConfig;
use crate::error::{BedrockError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::config::{Credentials, ProvideCredentials, SharedCredentialsProvider};
use std::env;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn into_sdk(self) -> Credentials {
        Credentials::new(
            self.access_key_id,
            self.secret_access_key,
            self.session_token,
            None,
            "bedrock-outpaint",
        )
    }

    fn from_sdk(credentials: &Credentials) -> Self {
        Self {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().map(str::to_string),
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &"** redacted **")
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn resolve(&self) -> Result<AwsCredentials>;
}

/// Reads credentials from environment variables on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    access_key_var: String,
    secret_key_var: String,
    session_token_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_vars("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN")
    }
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: impl Into<String>,
    ) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
            session_token_var: session_token_var.into(),
        }
    }

    fn required(&self, name: &str) -> Result<String> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(BedrockError::AuthenticationError(format!(
                "{} is not set",
                name
            ))),
        }
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn resolve(&self) -> Result<AwsCredentials> {
        Ok(AwsCredentials {
            access_key_id: self.required(&self.access_key_var)?,
            secret_access_key: self.required(&self.secret_key_var)?,
            session_token: env::var(&self.session_token_var)
                .ok()
                .filter(|token| !token.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct StaticCredentials(AwsCredentials);

impl StaticCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self(AwsCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        })
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn resolve(&self) -> Result<AwsCredentials> {
        Ok(self.0.clone())
    }
}

/// The AWS SDK default provider chain: environment, shared config and
/// credentials files (profiles, SSO), web identity, container and instance
/// roles.
#[derive(Debug, Clone)]
pub struct SdkChainCredentials {
    provider: SharedCredentialsProvider,
}

impl SdkChainCredentials {
    pub fn new(provider: SharedCredentialsProvider) -> Self {
        Self { provider }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Option<Self> {
        sdk_config.credentials_provider().map(Self::new)
    }
}

#[async_trait]
impl CredentialSource for SdkChainCredentials {
    async fn resolve(&self) -> Result<AwsCredentials> {
        let credentials = self.provider.provide_credentials().await.map_err(|e| {
            BedrockError::AuthenticationError(format!("no AWS credentials available: {}", e))
        })?;
        Ok(AwsCredentials::from_sdk(&credentials))
    }
}

/// Static credentials when the config carries them, the SDK provider chain
/// otherwise. Environment variables are the last resort when the SDK config
/// has no provider.
pub fn from_config(config: &BedrockConfig, sdk_config: &SdkConfig) -> Arc<dyn CredentialSource> {
    match (&config.access_key, &config.secret_key) {
        (Some(access_key), Some(secret_key)) => Arc::new(StaticCredentials::new(
            access_key.clone(),
            secret_key.clone(),
            config.session_token.clone(),
        )),
        _ => match SdkChainCredentials::from_sdk_config(sdk_config) {
            Some(chain) => Arc::new(chain),
            None => Arc::new(EnvCredentials::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_config_with(credentials: Credentials) -> SdkConfig {
        SdkConfig::builder()
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .build()
    }

    #[tokio::test]
    async fn test_env_credentials_resolve() {
        env::set_var("OUTPAINT_TEST_A_KEY", "AKIATEST");
        env::set_var("OUTPAINT_TEST_A_SECRET", "secret");
        env::set_var("OUTPAINT_TEST_A_TOKEN", "token");

        let source = EnvCredentials::with_vars(
            "OUTPAINT_TEST_A_KEY",
            "OUTPAINT_TEST_A_SECRET",
            "OUTPAINT_TEST_A_TOKEN",
        );
        let creds = source.resolve().await.unwrap();

        assert_eq!(creds.access_key_id, "AKIATEST");
        assert_eq!(creds.secret_access_key, "secret");
        assert_eq!(creds.session_token.as_deref(), Some("token"));
    }

    #[tokio::test]
    async fn test_missing_env_credentials_is_authentication_error() {
        env::set_var("OUTPAINT_TEST_B_KEY", "AKIATEST");
        env::remove_var("OUTPAINT_TEST_B_SECRET");

        let source = EnvCredentials::with_vars(
            "OUTPAINT_TEST_B_KEY",
            "OUTPAINT_TEST_B_SECRET",
            "OUTPAINT_TEST_B_TOKEN",
        );

        match source.resolve().await {
            Err(BedrockError::AuthenticationError(msg)) => {
                assert!(msg.contains("OUTPAINT_TEST_B_SECRET"))
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_debug_redacts_secrets() {
        let creds = StaticCredentials::new("AKIAVISIBLE", "hunter2", Some("tok".into()))
            .resolve()
            .await
            .unwrap();
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("AKIAVISIBLE"));
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("tok\""));
    }

    #[tokio::test]
    async fn test_from_config_prefers_static_credentials() {
        let config = BedrockConfig::new()
            .with_credentials("AKIACONFIG", "cfg-secret")
            .with_session_token("cfg-token");
        let sdk_config = sdk_config_with(Credentials::new("AKIACHAIN", "chain", None, None, "test"));

        let creds = from_config(&config, &sdk_config).resolve().await.unwrap();
        assert_eq!(creds.access_key_id, "AKIACONFIG");
        assert_eq!(creds.session_token.as_deref(), Some("cfg-token"));
    }

    #[tokio::test]
    async fn test_from_config_falls_back_to_sdk_chain() {
        let sdk_config = sdk_config_with(Credentials::new(
            "AKIAPROFILE",
            "profile-secret",
            Some("profile-token".into()),
            None,
            "profile",
        ));

        let creds = from_config(&BedrockConfig::new(), &sdk_config)
            .resolve()
            .await
            .unwrap();
        assert_eq!(creds.access_key_id, "AKIAPROFILE");
        assert_eq!(creds.secret_access_key, "profile-secret");
        assert_eq!(creds.session_token.as_deref(), Some("profile-token"));
    }

    #[test]
    fn test_sdk_chain_requires_a_provider() {
        assert!(SdkChainCredentials::from_sdk_config(&SdkConfig::builder().build()).is_none());
    }
}
