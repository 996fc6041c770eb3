use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::model::AnalyzeResponse;

/// Message shown to the extension when no usable listing was sent.
pub const MISSING_AD_MESSAGE: &str = "Aucune donnée annonce reçue.";

/// Failures of the request layer around the scoring core.
///
/// The normalizer itself never produces these.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{}", MISSING_AD_MESSAGE)]
    MissingAd,
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MissingAd | AnalysisError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(AnalyzeResponse::failure(self.to_string()))).into_response()
    }
}

/// Failures talking to the model provider. Callers degrade to heuristic mode.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model provider answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("model response carried no text content")]
    EmptyContent,
    #[error(transparent)]
    Config(#[from] common::config::ConfigError),
}
