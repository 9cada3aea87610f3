//! Axum route handlers for the pad HTTP API.

use crate::service::PadService;
use crate::store::PadStoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use shared_pad_types::*;
use std::sync::Arc;

pub struct AppState {
    pub pads: PadService,
}

type ApiError = (StatusCode, Json<PadErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    Router::new()
        .route("/hi", get(hi))
        .route("/pad", get(get_default_pad).put(put_pad).post(pad_action))
        .route("/pad/:chat_id", get(get_pad).put(put_pad_for).post(put_pad_for))
        .with_state(state)
        .layer(cors)
}

fn bad_request(msg: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(PadErrorResponse::new(msg)))
}

fn store_failure(e: PadStoreError) -> ApiError {
    log::error!("[PAD] Storage failure: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(PadErrorResponse::new(e.to_string())),
    )
}

async fn read(state: &AppState, chat_id: Option<&str>) -> ApiResult<PadTextResponse> {
    let text = state.pads.get(chat_id).await.map_err(store_failure)?;
    Ok(Json(PadTextResponse { text }))
}

/// Malformed bodies get the same error envelope as every other failure.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => Err(bad_request(&rejection.body_text())),
    }
}

async fn write(
    state: &AppState,
    chat_id: Option<&str>,
    text: &str,
) -> ApiResult<PadWriteResponse> {
    let echo = state.pads.set(chat_id, text).await.map_err(store_failure)?;
    Ok(Json(PadWriteResponse::ok(echo)))
}

// GET /hi
pub async fn hi() -> Json<HiResponse> {
    Json(HiResponse { ok: true })
}

// GET /pad
pub async fn get_default_pad(
    State(state): State<Arc<AppState>>,
) -> ApiResult<PadTextResponse> {
    read(&state, None).await
}

// GET /pad/:chat_id
pub async fn get_pad(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> ApiResult<PadTextResponse> {
    read(&state, Some(&chat_id)).await
}

// PUT /pad
pub async fn put_pad(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PadWriteRequest>, JsonRejection>,
) -> ApiResult<PadWriteResponse> {
    let req = json_body(body)?;
    write(&state, req.chat_id.as_deref(), &req.text).await
}

// PUT|POST /pad/:chat_id
pub async fn put_pad_for(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    body: Result<Json<PadWriteRequest>, JsonRejection>,
) -> ApiResult<PadWriteResponse> {
    let req = json_body(body)?;
    write(&state, Some(&chat_id), &req.text).await
}

// POST /pad
//
// Dispatches on `action`; a body with only `text` is a plain write.
pub async fn pad_action(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PadActionRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };
    let chat_id = req.chat_id.as_deref();
    let text = req.text.as_deref();

    match (req.action.as_deref().map(PadAction::parse), text) {
        (Some(Some(PadAction::Get)), _) => read(&state, chat_id).await.into_response(),
        (Some(Some(PadAction::Set)), Some(text)) | (None, Some(text)) => {
            write(&state, chat_id, text).await.into_response()
        }
        (Some(Some(PadAction::Set)), None) => {
            bad_request("text is required for action 'set'").into_response()
        }
        (Some(None), _) | (None, None) => {
            bad_request("action must be 'get' or 'set'").into_response()
        }
    }
}
