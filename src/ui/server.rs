use super::page;
use super::session::{MaskSpec, SessionError, SessionStore};
use crate::bedrock::ImageClient;
use crate::config::Config;
use crate::error::BedrockError;
use crate::models::{GenerationParams, Mask, MaskSource, SourceImage};
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

pub struct AppState {
    pub sessions: SessionStore,
    pub client: ImageClient,
    page: String,
    output_dir: PathBuf,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, client: ImageClient) -> Self {
        Self {
            sessions: SessionStore::with_idle_ttl(config.session_ttl),
            client,
            page: page::render(config.theme, config.show_toolbar),
            output_dir: config.output_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NotFound(_) | SessionError::NoSuchResult(_) => StatusCode::NOT_FOUND,
            SessionError::InvalidTransition { .. } | SessionError::GenerationInFlight => {
                StatusCode::CONFLICT
            }
            SessionError::EmptyPrompt | SessionError::Upload(_) => StatusCode::BAD_REQUEST,
            SessionError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SessionError::Invalid(BedrockError::ValidationError(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SessionError::Invalid(_) | SessionError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub prompt: String,
    #[serde(default)]
    pub params: GenerationParams,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/models", web::get().to(models))
        .route("/api/sessions", web::post().to(create_session))
        .service(
            web::resource("/api/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(delete_session)),
        )
        .service(
            web::resource("/api/sessions/{id}/image")
                .route(web::put().to(upload_image))
                .route(web::get().to(source_image)),
        )
        .route("/api/sessions/{id}/mask", web::put().to(set_mask))
        .route("/api/sessions/{id}/mask/image", web::put().to(upload_mask))
        .route("/api/sessions/{id}/generate", web::post().to(generate))
        .route("/api/sessions/{id}/results/{index}", web::get().to(result_image))
        .route(
            "/api/sessions/{id}/results/{index}/save",
            web::post().to(save_result),
        );
}

pub async fn run(config: Config, client: ImageClient) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(&config, client));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(1)
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, SessionError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| SessionError::Upload(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(SessionError::UploadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    if body.is_empty() {
        return Err(SessionError::Upload("request body is empty".into()));
    }
    Ok(body.to_vec())
}

async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(state.page.clone())
}

async fn models() -> HttpResponse {
    HttpResponse::Ok().json(ImageClient::supported_models())
}

async fn create_session(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Created().json(state.sessions.create())
}

async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, SessionError> {
    Ok(HttpResponse::Ok().json(state.sessions.view(*id)?))
}

async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, SessionError> {
    state.sessions.remove(*id)?;
    Ok(HttpResponse::NoContent().finish())
}

async fn upload_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    payload: web::Payload,
) -> Result<HttpResponse, SessionError> {
    let bytes = read_body(payload, state.max_upload_bytes).await?;
    let image = SourceImage::from_bytes(bytes)?;
    log::info!(
        "Session {} uploaded a {}x{} {} image",
        id,
        image.width(),
        image.height(),
        image.format().to_mime_type()
    );

    let view = state.sessions.with_session(*id, |session| {
        session.load_image(image)?;
        Ok(session.view())
    })?;
    Ok(HttpResponse::Ok().json(view))
}

async fn source_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, SessionError> {
    state.sessions.with_session(*id, |session| {
        let image = session.source_image().ok_or(SessionError::InvalidTransition {
            action: "show the source image",
            state: session.state(),
        })?;
        Ok(HttpResponse::Ok()
            .content_type(image.format().to_mime_type())
            .body(image.bytes().to_vec()))
    })
}

async fn set_mask(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    spec: web::Json<MaskSpec>,
) -> Result<HttpResponse, SessionError> {
    let view = state.sessions.with_session(*id, |session| {
        session.apply_mask_spec(spec.into_inner())?;
        Ok(session.view())
    })?;
    Ok(HttpResponse::Ok().json(view))
}

async fn upload_mask(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    payload: web::Payload,
) -> Result<HttpResponse, SessionError> {
    let bytes = read_body(payload, state.max_upload_bytes).await?;
    let mask = Mask::from_image_bytes(&bytes)?;

    let view = state.sessions.with_session(*id, |session| {
        session.set_mask(MaskSource::Bitmap(mask))?;
        Ok(session.view())
    })?;
    Ok(HttpResponse::Ok().json(view))
}

async fn generate(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    form: web::Json<GenerateForm>,
) -> Result<HttpResponse, SessionError> {
    let form = form.into_inner();
    let view = state
        .sessions
        .generate(*id, &state.client, &form.prompt, form.params)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn result_image(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, usize)>,
) -> Result<HttpResponse, SessionError> {
    let (id, index) = path.into_inner();
    state.sessions.with_session(id, |session| {
        let image = session.result_image(index)?;
        Ok(HttpResponse::Ok()
            .content_type(image.mime_type())
            .body(image.bytes.clone()))
    })
}

async fn save_result(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, usize)>,
) -> Result<HttpResponse, SessionError> {
    let (id, index) = path.into_inner();
    let saved = state
        .sessions
        .save_result(id, index, &state.output_dir)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "path": saved.display().to_string() })))
}
