use super::{codec, ModelInvoker};
use crate::error::{BedrockError, Result};
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// PNG of the given size, for tests and local harnesses.
pub fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("encoding an in-memory PNG cannot fail");
    bytes.into_inner()
}

/// Titan-shaped response body carrying the given images.
pub fn titan_response(images: &[Vec<u8>]) -> Vec<u8> {
    let encoded: Vec<String> = images.iter().map(|image| codec::encode(image)).collect();
    json!({ "images": encoded, "error": null }).to_string().into_bytes()
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model_id: String,
    pub body: Vec<u8>,
}

impl RecordedCall {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Body(Vec<u8>),
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

/// [`ModelInvoker`] double that records every call.
///
/// Queued replies are served in order. With the queue empty it answers with
/// as many fixture images as the request asked for.
#[derive(Clone, Default)]
pub struct MockInvoker {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(self, images: Vec<Vec<u8>>) -> Self {
        self.with_body(titan_response(&images))
    }

    pub fn with_body(self, body: Vec<u8>) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Body(body));
        self
    }

    pub fn with_status(self, status: u16, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Status {
            status,
            code: None,
            message: message.to_string(),
        });
        self
    }

    pub fn with_error_code(self, status: u16, code: &str, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Status {
            status,
            code: Some(code.to_string()),
            message: message.to_string(),
        });
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.calls.lock().unwrap().last().map(RecordedCall::json)
    }

    fn default_reply(body: &[u8]) -> Vec<u8> {
        let requested = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value["imageGenerationConfig"]["numberOfImages"].as_u64())
            .unwrap_or(1);
        let images: Vec<Vec<u8>> = (0..requested).map(|i| png_fixture(4 + i as u32, 4)).collect();
        titan_response(&images)
    }
}

#[async_trait]
impl ModelInvoker for MockInvoker {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedCall {
            model_id: model_id.to_string(),
            body: body.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Body(bytes)) => Ok(bytes),
            Some(MockReply::Status {
                status,
                code,
                message,
            }) => Err(BedrockError::from_status(status, code.as_deref(), message)),
            None => Ok(Self::default_reply(&body)),
        }
    }
}
