//! Web API exposing the screening pipeline

pub mod handlers;

use crate::config::Config;
use crate::error::ScreenerError;
use crate::generation::generator::QuestionGenerator;
use crate::matching::matcher::Matcher;
use crate::pipeline::extraction::FieldExtractor;
use crate::pipeline::ingest::IngestPipeline;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestPipeline>,
    pub matcher: Arc<Matcher>,
    pub questions: Arc<QuestionGenerator>,
    pub extractor: Arc<FieldExtractor>,
    pub config: Arc<Config>,
}

/// HTTP-facing error wrapper. Every handler failure resolves to a status
/// code and a structured JSON body.
#[derive(Debug)]
pub struct AppError(pub ScreenerError);

impl From<ScreenerError> for AppError {
    fn from(err: ScreenerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ScreenerError::DataValidation { .. } | ScreenerError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "invalid_input")
            }
            ScreenerError::LanguageDetection { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "language_detection_failed")
            }
            ScreenerError::ResumeProcessing { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "resume_processing_failed")
            }
            ScreenerError::ModelLoading { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            log::error!("request failed: {}", self.0);
        } else {
            log::warn!("request rejected: {}", self.0);
        }

        let mut error = serde_json::Map::new();
        error.insert("code".to_string(), json!(code));
        error.insert("message".to_string(), json!(self.0.to_string()));
        match &self.0 {
            ScreenerError::ResumeProcessing {
                resume_id, stage, ..
            } => {
                error.insert("resume_id".to_string(), json!(resume_id));
                error.insert("stage".to_string(), json!(stage.to_string()));
            }
            ScreenerError::ModelLoading { model, .. } => {
                error.insert("model".to_string(), json!(model));
            }
            ScreenerError::DataValidation { field, .. } => {
                error.insert("field".to_string(), json!(field));
            }
            _ => {}
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/match-candidates", post(handlers::match_candidates))
        .route("/api/upload-resume", post(handlers::upload_resume))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
