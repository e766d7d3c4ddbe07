/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / {"message": ...} JSON body)
 * - auth / validation / store / routing の失敗をここで一度だけ HTTP に変換する
 */
use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("missing '{claim}' claim")]
    MalformedClaims { claim: String },
    #[error("bad request body")]
    BadRequestBody,
    #[error("{message}")]
    BadRequest { message: &'static str },
    #[error("{message}")]
    NotFound { message: &'static str },
    #[error("method {0} is not supported")]
    MethodNotAllowed(Method),
    #[error("store unavailable")]
    StoreUnavailable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: &'static str) -> Self {
        Self::BadRequest { message }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound { message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingCredential => (
                StatusCode::BAD_REQUEST,
                "Could not find Authorization header".to_string(),
            ),
            AppError::InvalidCredential => (StatusCode::UNAUTHORIZED, "Invalid Token".to_string()),
            AppError::MalformedClaims { claim } => (
                StatusCode::BAD_REQUEST,
                format!("Could not find {claim} in given token"),
            ),
            AppError::BadRequestBody => (
                StatusCode::BAD_REQUEST,
                "Could not parse given body".to_string(),
            ),
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.to_string()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.to_string()),
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {method} is not supported"),
            ),
            AppError::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not reach database".to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredential => AppError::MissingCredential,
            AuthError::InvalidCredential(_) => AppError::InvalidCredential,
            AuthError::MalformedClaims { claim } => AppError::MalformedClaims { claim },
        }
    }
}
