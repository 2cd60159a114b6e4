//! HTTP request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::extractors::Platform;
use crate::metadata::VideoMetadata;
use crate::transcribe::Transcript;
use crate::TranscriptorError;

/// HTTP error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal { error: String, details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
            }
            ApiError::Internal { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error, "details": details })),
            )
                .into_response(),
        }
    }
}

impl From<TranscriptorError> for ApiError {
    fn from(err: TranscriptorError) -> Self {
        match err {
            TranscriptorError::UnsupportedPlatform(_) | TranscriptorError::InvalidUrl { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::Internal {
                error: "Failed to get transcript".to_string(),
                details: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuery {
    video_id: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeQuery {
    url: Option<String>,
    language: Option<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} parameter", name)))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Caption transcript for a YouTube video id
pub async fn youtube_transcript(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<Transcript>, ApiError> {
    let video_id = required(query.video_id, "videoId")?;
    let language = query.language.unwrap_or_else(|| "auto".to_string());

    let source = state
        .pipeline
        .registry()
        .find_source(Platform::Youtube)
        .ok_or_else(|| ApiError::Internal {
            error: "Failed to get transcript".to_string(),
            details: "no YouTube caption source registered".to_string(),
        })?;

    let transcript = source.fetch_captions(&video_id, &language).await.map_err(|e| {
        tracing::warn!("YouTube transcript for {} failed: {}", video_id, e);
        ApiError::Internal {
            error: "Failed to get transcript".to_string(),
            details: e.to_string(),
        }
    })?;

    Ok(Json(transcript))
}

/// Fallback transcript (title and notice) for a YouTube video id
pub async fn fallback_transcript(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<Transcript>, ApiError> {
    let video_id = required(query.video_id, "videoId")?;
    Ok(Json(state.pipeline.fallback(&video_id).await))
}

/// Full pipeline for any supported video URL
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranscribeQuery>,
) -> Result<Json<Transcript>, ApiError> {
    let url = required(query.url, "url")?;
    let language = query.language.unwrap_or_default();

    let transcript = state.pipeline.transcribe(&url, &language).await?;
    Ok(Json(transcript))
}

/// Platform, id, thumbnail and title for any supported video URL
pub async fn metadata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranscribeQuery>,
) -> Result<Json<VideoMetadata>, ApiError> {
    let url = required(query.url, "url")?;
    Ok(Json(state.pipeline.metadata(&url).await?))
}
