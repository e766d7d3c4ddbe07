/*
 * Responsibility
 * - /marker 系 handler (list / create / get / delete)
 * - AuthCtx (middleware 済み) の identity で必ず repo を絞り込む
 * - StoreError はここで AppError に変換する (404 / 400 の使い分け)
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
};

use crate::{
    api::{
        dto::markers::{CreateMarkerRequest, MarkerCollectionResponse, MarkerResponse},
        extractors::{AuthCtxExtractor, MarkerSelector},
    },
    error::AppError,
    repos::StoreError,
    state::AppState,
};

fn log_store_error(err: &StoreError, message: &'static str) {
    match err {
        StoreError::NotFound => tracing::info!(error = %err, "{message}"),
        StoreError::Persistence(_) => tracing::error!(error = ?err, "{message}"),
    }
}

pub async fn list_markers(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<MarkerCollectionResponse>, AppError> {
    let rows = state.markers.list(ctx.user()).await.map_err(|err| {
        log_store_error(&err, "could not find markers");
        AppError::not_found("Could not find markers")
    })?;

    Ok(Json(MarkerCollectionResponse {
        markers: rows.into_iter().map(MarkerResponse::from).collect(),
    }))
}

pub async fn create_marker(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    body: Bytes,
) -> Result<(StatusCode, Json<MarkerResponse>), AppError> {
    // Content-Type は見ない。body は生の bytes から JSON として読む
    let req = CreateMarkerRequest::parse(&body).map_err(|reason| {
        tracing::info!(%reason, "could not parse given body");
        AppError::BadRequestBody
    })?;

    let marker = state
        .markers
        .create(ctx.user(), req.lat, req.lng, &req.note)
        .await
        .map_err(|err| {
            log_store_error(&err, "could not insert in database");
            AppError::bad_request("Could not insert in database")
        })?;

    Ok((StatusCode::CREATED, Json(marker.into())))
}

pub async fn get_marker(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    MarkerSelector(selector): MarkerSelector,
) -> Result<Json<MarkerResponse>, AppError> {
    let marker = state
        .markers
        .get(ctx.user(), selector)
        .await
        .map_err(|err| {
            log_store_error(&err, "could not find marker");
            AppError::not_found("Could not find marker")
        })?;

    Ok(Json(marker.into()))
}

pub async fn delete_marker(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    MarkerSelector(selector): MarkerSelector,
) -> Result<StatusCode, AppError> {
    state
        .markers
        .delete(ctx.user(), selector)
        .await
        .map_err(|err| {
            log_store_error(&err, "could not delete marker");
            AppError::not_found("Could not delete marker")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Method fallback for the marker routes (runs after the access middleware).
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
