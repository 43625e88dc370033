//! Per-session interaction state.
//!
//! A session walks `Idle → ImageLoaded → MaskReady → Generating` and ends in
//! `ResultReady` or `Failed`. `Generating` doubles as the in-flight guard: a
//! second trigger is refused before any request is built.

use crate::bedrock::ImageClient;
use crate::config::DEFAULT_SESSION_TTL_SECS;
use crate::error::BedrockError;
use crate::models::{
    GeneratedImage, GenerationParams, GenerationResult, Mask, MaskRegion, MaskSource, SourceImage,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    ImageLoaded,
    MaskReady,
    Generating,
    ResultReady,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::ImageLoaded => "image loaded",
            SessionState::MaskReady => "mask ready",
            SessionState::Generating => "generating",
            SessionState::ResultReady => "result ready",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("a generation is already in progress for this session")]
    GenerationInFlight,

    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("result {0} does not exist")]
    NoSuchResult(usize),

    #[error("upload exceeds the {0} byte limit")]
    UploadTooLarge(usize),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Invalid(#[from] BedrockError),

    #[error("could not save image: {0}")]
    Io(#[from] std::io::Error),
}

/// Mask as submitted by the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskSpec {
    /// Rectangles marking background, or the subject when `invert` is set.
    Regions {
        regions: Vec<MaskRegion>,
        #[serde(default)]
        invert: bool,
    },
    Prompt { text: String },
}

/// Everything the generation client needs, cloned out of the session so the
/// store lock is not held during the remote call.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub image: Arc<SourceImage>,
    pub mask: Arc<MaskSource>,
    pub prompt: String,
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub mime_type: String,
    pub size_kb: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskInfo {
    Bitmap { regenerated_pixels: usize },
    Prompt { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub state: SessionState,
    pub image: Option<ImageInfo>,
    pub mask: Option<MaskInfo>,
    pub results: usize,
    pub model: Option<String>,
    pub seed: Option<u32>,
    pub response_time_secs: Option<f64>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    image: Option<Arc<SourceImage>>,
    mask: Option<Arc<MaskSource>>,
    result: Option<GenerationResult>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            image: None,
            mask: None,
            result: None,
            error: None,
            created_at: Utc::now(),
            last_seen: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn ensure_idle_call(&self, action: &'static str) -> Result<(), SessionError> {
        if self.state == SessionState::Generating {
            return Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    /// A new upload discards the mask and any previous result.
    pub fn load_image(&mut self, image: SourceImage) -> Result<(), SessionError> {
        self.ensure_idle_call("upload an image")?;

        self.image = Some(Arc::new(image));
        self.mask = None;
        self.result = None;
        self.error = None;
        self.state = SessionState::ImageLoaded;
        Ok(())
    }

    pub fn set_mask(&mut self, mask: MaskSource) -> Result<(), SessionError> {
        self.ensure_idle_call("change the mask")?;
        let image = self.image.as_ref().ok_or(SessionError::InvalidTransition {
            action: "set a mask",
            state: self.state,
        })?;
        mask.ensure_matches(image)?;

        self.mask = Some(Arc::new(mask));
        self.state = SessionState::MaskReady;
        Ok(())
    }

    pub fn apply_mask_spec(&mut self, spec: MaskSpec) -> Result<(), SessionError> {
        let mask = match spec {
            MaskSpec::Prompt { text } => MaskSource::prompt(text)?,
            MaskSpec::Regions { regions, invert } => {
                let (width, height) = match &self.image {
                    Some(image) => image.dimensions(),
                    None => {
                        return Err(SessionError::InvalidTransition {
                            action: "set a mask",
                            state: self.state,
                        })
                    }
                };
                MaskSource::Bitmap(Mask::from_regions(width, height, &regions, invert)?)
            }
        };
        self.set_mask(mask)
    }

    /// Moves to `Generating` and hands back the inputs for the client.
    ///
    /// `ResultReady` and `Failed` keep their mask, so generating again from
    /// either is a manual retry.
    pub fn begin_generation(
        &mut self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<GenerationJob, SessionError> {
        match self.state {
            SessionState::Generating => return Err(SessionError::GenerationInFlight),
            SessionState::Idle | SessionState::ImageLoaded => {
                return Err(SessionError::InvalidTransition {
                    action: "generate",
                    state: self.state,
                })
            }
            SessionState::MaskReady | SessionState::ResultReady | SessionState::Failed => {}
        }
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        let (image, mask) = match (&self.image, &self.mask) {
            (Some(image), Some(mask)) => (image.clone(), mask.clone()),
            _ => {
                return Err(SessionError::InvalidTransition {
                    action: "generate",
                    state: self.state,
                })
            }
        };

        self.state = SessionState::Generating;
        self.error = None;
        Ok(GenerationJob {
            image,
            mask,
            prompt: prompt.to_string(),
            params,
        })
    }

    pub fn finish_generation(&mut self, outcome: crate::error::Result<GenerationResult>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
                self.state = SessionState::ResultReady;
            }
            Err(err) => {
                self.result = None;
                self.error = Some(err.to_string());
                self.state = SessionState::Failed;
            }
        }
    }

    /// Ends a generation whose outcome will never arrive.
    pub fn cancel_generation(&mut self) {
        if self.state == SessionState::Generating {
            self.result = None;
            self.error = Some("generation was cancelled before the model responded".into());
            self.state = SessionState::Failed;
        }
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.image.as_deref()
    }

    pub fn result_image(&self, index: usize) -> Result<&GeneratedImage, SessionError> {
        self.result
            .as_ref()
            .and_then(|result| result.images.get(index))
            .ok_or(SessionError::NoSuchResult(index))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            state: self.state,
            image: self.image.as_ref().map(|image| ImageInfo {
                mime_type: image.format().to_mime_type().to_string(),
                size_kb: image.size_kb(),
                width: image.width(),
                height: image.height(),
            }),
            mask: self.mask.as_ref().map(|mask| match mask.as_ref() {
                MaskSource::Bitmap(bitmap) => MaskInfo::Bitmap {
                    regenerated_pixels: bitmap.regenerated_pixels(),
                },
                MaskSource::Prompt(text) => MaskInfo::Prompt { text: text.clone() },
            }),
            results: self.result.as_ref().map_or(0, |result| result.images.len()),
            model: self.result.as_ref().map(|result| result.model.clone()),
            seed: self.result.as_ref().and_then(|result| result.seed),
            response_time_secs: self
                .result
                .as_ref()
                .map(|result| result.elapsed.as_secs_f64()),
            error: self.error.clone(),
            created_at: self.created_at,
        }
    }
}

/// Independent sessions keyed by id. The lock only guards state transitions
/// and is never held across the remote call.
///
/// Sessions untouched for longer than the idle TTL are evicted when a new
/// session is created. A session in `Generating` is never evicted.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self) -> SessionView {
        self.evict_idle();
        let session = Session::new();
        let view = session.view();
        self.lock().insert(session.id(), session);
        log::info!("Session {} started", view.id);
        view
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.lock()
            .remove(&id)
            .map(|_| log::info!("Session {} ended", id))
            .ok_or(SessionError::NotFound(id))
    }

    /// Drops idle sessions and returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let ttl = self.idle_ttl;
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.state == SessionState::Generating
                || session.last_seen.elapsed() <= ttl;
            if !keep {
                log::info!("Session {} evicted after {:?} idle", id, session.last_seen.elapsed());
            }
            keep
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.last_seen = Instant::now();
        f(session)
    }

    pub fn view(&self, id: Uuid) -> Result<SessionView, SessionError> {
        self.with_session(id, |session| Ok(session.view()))
    }

    /// Runs one generation for the session and records its outcome.
    ///
    /// Client failures are not returned as errors: they leave the session in
    /// `Failed` with the message for the UI to show. Dropping the returned
    /// future mid-call also leaves the session in `Failed`.
    pub async fn generate(
        &self,
        id: Uuid,
        client: &ImageClient,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<SessionView, SessionError> {
        let job = self.with_session(id, |session| session.begin_generation(prompt, params))?;
        let in_flight = InFlight {
            store: self,
            id,
            armed: true,
        };

        let outcome = client
            .generate(job.image, job.mask, &job.prompt, job.params)
            .await;
        if let Err(err) = &outcome {
            log::warn!("Generation failed for session {}: {}", id, err);
        }

        in_flight.finish(outcome)
    }

    /// Writes result `index` to `dir` and returns the file path.
    pub async fn save_result(
        &self,
        id: Uuid,
        index: usize,
        dir: &Path,
    ) -> Result<PathBuf, SessionError> {
        let (image, seed) = self.with_session(id, |session| {
            let image = session.result_image(index)?.clone();
            Ok((image, session.view().seed))
        })?;

        let seed = seed.map_or_else(|| "auto".to_string(), |seed| seed.to_string());
        let path = dir.join(format!(
            "outpainting_{}_{}_{}.{}",
            seed,
            Utc::now().timestamp(),
            index,
            image.extension()
        ));

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &image.bytes).await?;
        log::info!("Generated image saved to {}", path.display());
        Ok(path)
    }
}

/// Held while a session is `Generating`; cancels the generation if dropped
/// before an outcome is recorded.
struct InFlight<'a> {
    store: &'a SessionStore,
    id: Uuid,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(
        mut self,
        outcome: crate::error::Result<GenerationResult>,
    ) -> Result<SessionView, SessionError> {
        self.armed = false;
        self.store.with_session(self.id, |session| {
            session.finish_generation(outcome);
            Ok(session.view())
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            log::warn!("Generation for session {} was cancelled", self.id);
            let _ = self.store.with_session(self.id, |session| {
                session.cancel_generation();
                Ok(())
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bedrock::mock::{png_fixture, MockInvoker};
    use crate::config::BedrockConfig;

    fn client(mock: &MockInvoker) -> ImageClient {
        ImageClient::new(Arc::new(mock.clone()), &BedrockConfig::new())
    }

    fn image(width: u32, height: u32) -> SourceImage {
        SourceImage::from_bytes(png_fixture(width, height)).unwrap()
    }

    fn background() -> MaskSpec {
        MaskSpec::Regions {
            regions: vec![MaskRegion { x: 0, y: 0, width: 200, height: 200 }],
            invert: false,
        }
    }

    fn ready_session(store: &SessionStore) -> Uuid {
        let id = store.create().id;
        store
            .with_session(id, |session| {
                session.load_image(image(512, 512))?;
                session.apply_mask_spec(background())
            })
            .unwrap();
        id
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.load_image(image(512, 512)).unwrap();
        assert_eq!(session.state(), SessionState::ImageLoaded);

        session.apply_mask_spec(background()).unwrap();
        assert_eq!(session.state(), SessionState::MaskReady);

        let job = session
            .begin_generation("forest background", GenerationParams::new())
            .unwrap();
        assert_eq!(session.state(), SessionState::Generating);
        assert_eq!(job.prompt, "forest background");
    }

    #[test]
    fn test_generate_requires_mask() {
        let mut session = Session::new();
        assert!(matches!(
            session.begin_generation("beach", GenerationParams::new()),
            Err(SessionError::InvalidTransition { action: "generate", .. })
        ));

        session.load_image(image(32, 32)).unwrap();
        assert!(session
            .begin_generation("beach", GenerationParams::new())
            .is_err());
        assert_eq!(session.state(), SessionState::ImageLoaded);
    }

    #[test]
    fn test_mask_requires_image() {
        let mut session = Session::new();
        assert!(matches!(
            session.apply_mask_spec(MaskSpec::Prompt { text: "dog".into() }),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_mismatched_mask_keeps_state() {
        let mut session = Session::new();
        session.load_image(image(64, 64)).unwrap();

        let wrong = Mask::from_regions(
            32,
            32,
            &[MaskRegion { x: 0, y: 0, width: 4, height: 4 }],
            false,
        )
        .unwrap();
        assert!(matches!(
            session.set_mask(MaskSource::Bitmap(wrong)),
            Err(SessionError::Invalid(BedrockError::ValidationError(_)))
        ));
        assert_eq!(session.state(), SessionState::ImageLoaded);
    }

    #[test]
    fn test_empty_prompt_is_rejected() {
        let mut session = Session::new();
        session.load_image(image(32, 32)).unwrap();
        session
            .apply_mask_spec(MaskSpec::Prompt { text: "cup".into() })
            .unwrap();

        assert!(matches!(
            session.begin_generation("   ", GenerationParams::new()),
            Err(SessionError::EmptyPrompt)
        ));
        assert_eq!(session.state(), SessionState::MaskReady);
    }

    #[test]
    fn test_upload_and_mask_blocked_while_generating() {
        let mut session = Session::new();
        session.load_image(image(32, 32)).unwrap();
        session
            .apply_mask_spec(MaskSpec::Prompt { text: "cup".into() })
            .unwrap();
        session
            .begin_generation("table", GenerationParams::new())
            .unwrap();

        assert!(session.load_image(image(32, 32)).is_err());
        assert!(session
            .apply_mask_spec(MaskSpec::Prompt { text: "plate".into() })
            .is_err());
        assert_eq!(session.state(), SessionState::Generating);
    }

    #[tokio::test]
    async fn test_store_generation_success() {
        let mock = MockInvoker::new();
        let store = SessionStore::new();
        let id = ready_session(&store);

        let view = store
            .generate(
                id,
                &client(&mock),
                "forest background",
                GenerationParams::new().with_count(2),
            )
            .await
            .unwrap();

        assert_eq!(view.state, SessionState::ResultReady);
        assert_eq!(view.results, 2);
        assert!(view.error.is_none());
        assert!(view.response_time_secs.is_some());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_trigger_while_generating_is_rejected_without_a_call() {
        let mock = MockInvoker::new();
        let store = SessionStore::new();
        let id = ready_session(&store);

        store
            .with_session(id, |session| {
                session.begin_generation("first", GenerationParams::new())
            })
            .unwrap();

        let err = store
            .generate(id, &client(&mock), "second", GenerationParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::GenerationInFlight));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_trigger_issues_one_call() {
        let mock = MockInvoker::new().with_delay(Duration::from_millis(200));
        let store = Arc::new(SessionStore::new());
        let id = ready_session(&store);

        let first = tokio::spawn({
            let store = store.clone();
            let client = client(&mock);
            async move {
                store
                    .generate(id, &client, "first", GenerationParams::new())
                    .await
            }
        });

        while store.view(id).unwrap().state != SessionState::Generating {
            tokio::task::yield_now().await;
        }

        let second = store
            .generate(id, &client(&mock), "second", GenerationParams::new())
            .await;
        assert!(matches!(second, Err(SessionError::GenerationInFlight)));

        let view = first.await.unwrap().unwrap();
        assert_eq!(view.state, SessionState::ResultReady);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shown_and_retry_is_allowed() {
        let mock = MockInvoker::new().with_status(403, "The security token included in the request is expired");
        let store = SessionStore::new();
        let id = ready_session(&store);

        let failed = store
            .generate(id, &client(&mock), "forest", GenerationParams::new())
            .await
            .unwrap();
        assert_eq!(failed.state, SessionState::Failed);
        let message = failed.error.unwrap();
        assert!(message.starts_with("Authentication error"));
        assert!(message.contains("expired"));

        let retried = store
            .generate(id, &client(&mock), "forest", GenerationParams::new())
            .await
            .unwrap();
        assert_eq!(retried.state, SessionState::ResultReady);
        assert!(retried.error.is_none());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_new_upload_resets_mask_and_result() {
        let mock = MockInvoker::new();
        let store = SessionStore::new();
        let id = ready_session(&store);
        store
            .generate(id, &client(&mock), "forest", GenerationParams::new())
            .await
            .unwrap();

        let view = store
            .with_session(id, |session| {
                session.load_image(image(128, 128))?;
                Ok(session.view())
            })
            .unwrap();

        assert_eq!(view.state, SessionState::ImageLoaded);
        assert!(view.mask.is_none());
        assert_eq!(view.results, 0);
        assert_eq!(view.image.unwrap().width, 128);
    }

    #[tokio::test]
    async fn test_save_result_writes_decoded_bytes() {
        let generated = png_fixture(6, 6);
        let mock = MockInvoker::new().with_images(vec![generated.clone()]);
        let store = SessionStore::new();
        let id = ready_session(&store);
        store
            .generate(id, &client(&mock), "forest", GenerationParams::new().with_seed(7))
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = store.save_result(id, 0, dir.path()).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("outpainting_7_"));
        assert!(name.ends_with("_0.png"));
        assert_eq!(std::fs::read(&path).unwrap(), generated);

        assert!(matches!(
            store.save_result(id, 3, dir.path()).await,
            Err(SessionError::NoSuchResult(3))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_generation_does_not_wedge_session() {
        let mock = MockInvoker::new().with_delay(Duration::from_millis(500));
        let store = Arc::new(SessionStore::new());
        let id = ready_session(&store);

        let task = tokio::spawn({
            let store = store.clone();
            let client = client(&mock);
            async move {
                store
                    .generate(id, &client, "forest", GenerationParams::new())
                    .await
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.view(id).unwrap().state, SessionState::Generating);
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let view = store.view(id).unwrap();
        assert_eq!(view.state, SessionState::Failed);
        assert!(view.error.unwrap().contains("cancelled"));

        store
            .with_session(id, |session| session.load_image(image(32, 32)))
            .unwrap();
        store
            .with_session(id, |session| {
                session.apply_mask_spec(MaskSpec::Prompt { text: "cup".into() })
            })
            .unwrap();
        let retried = store
            .generate(id, &client(&MockInvoker::new()), "forest", GenerationParams::new())
            .await
            .unwrap();
        assert_eq!(retried.state, SessionState::ResultReady);
    }

    #[test]
    fn test_idle_sessions_are_evicted_on_create() {
        let store = SessionStore::with_idle_ttl(Duration::from_millis(20));
        let idle = store.create().id;
        let busy = ready_session(&store);
        store
            .with_session(busy, |session| {
                session.begin_generation("forest", GenerationParams::new())
            })
            .unwrap();

        std::thread::sleep(Duration::from_millis(60));
        let fresh = store.create().id;

        assert!(matches!(store.view(idle), Err(SessionError::NotFound(_))));
        assert_eq!(store.view(busy).unwrap().state, SessionState::Generating);
        assert_eq!(store.view(fresh).unwrap().state, SessionState::Idle);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_active_sessions_survive_eviction() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let id = store.create().id;

        assert_eq!(store.evict_idle(), 0);
        assert!(store.view(id).is_ok());
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.create().id;
        let b = store.create().id;

        store
            .with_session(a, |session| session.load_image(image(16, 16)))
            .unwrap();

        assert_eq!(store.view(a).unwrap().state, SessionState::ImageLoaded);
        assert_eq!(store.view(b).unwrap().state, SessionState::Idle);

        store.remove(a).unwrap();
        assert!(matches!(store.view(a), Err(SessionError::NotFound(_))));
        assert_eq!(store.len(), 1);
    }
}
