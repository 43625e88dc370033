//! Background replacement for photos with Amazon Titan Image Generator
//! outpainting on AWS Bedrock.
//!
//! The crate has two layers. [`bedrock`] talks to the model: it validates a
//! source image and its mask, builds the `OUTPAINTING` request, invokes the
//! model and decodes the generated images. [`ui`] serves a single-page
//! browser interface whose sessions drive that client.
//!
//! ```no_run
//! use outpaint::{BedrockClient, BedrockConfig};
//! use outpaint::models::{GenerationParams, MaskSource, SourceImage};
//! use std::sync::Arc;
//!
//! # async fn run() -> outpaint::Result<()> {
//! let client = BedrockClient::new(&BedrockConfig::from_env()?).await;
//! let image = SourceImage::from_bytes(std::fs::read("burger.png").unwrap())?;
//! let mask = MaskSource::prompt("Cheeseburger")?;
//!
//! let result = client
//!     .image()
//!     .generate(
//!         Arc::new(image),
//!         Arc::new(mask),
//!         "a picnic blanket in a sunny park",
//!         GenerationParams::new().with_seed(42),
//!     )
//!     .await?;
//! println!("{} image(s) in {:?}", result.images.len(), result.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod bedrock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logger;
pub mod models;
pub mod ui;

pub use bedrock::{BedrockClient, ImageClient};
pub use config::{BedrockConfig, Config};
pub use error::{BedrockError, Result};
