/*
 * Responsibility
 * - GET /healthcheck (疎通用, 認証なし)
 * - GET /pingDB (store への到達確認, 認証なし)
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{error::AppError, state::AppState};

pub async fn healthcheck() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn ping_db(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.markers.ping().await.map_err(|err| {
        tracing::error!(error = ?err, "database ping failed");
        AppError::StoreUnavailable
    })?;

    Ok((StatusCode::OK, "OK"))
}
