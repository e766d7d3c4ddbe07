/*
 * Responsibility
 * - Path の文字列を Selector (ById / ByCoordinates) に一度だけ解決する
 * - どちらの形を受けるかは AppState.selector_mode で決まる
 * - 解決できない値は「存在しない marker」として 404 にする
 */
use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::config::SelectorMode;
use crate::error::AppError;
use crate::repos::Selector;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct MarkerSelector(pub Selector);

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolve path params into a `Selector` for the given routing mode.
pub fn resolve(mode: SelectorMode, params: &HashMap<String, String>) -> Option<Selector> {
    match mode {
        SelectorMode::Id => params
            .get("id")
            .and_then(|id| id.trim().parse::<i64>().ok())
            .map(Selector::ById),
        SelectorMode::Coordinates => {
            let lat = parse_coordinate(params.get("lat")?)?;
            let lng = parse_coordinate(params.get("lng")?)?;
            Some(Selector::ByCoordinates { lat, lng })
        }
    }
}

impl FromRequestParts<AppState> for MarkerSelector {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("Could not find marker"))?;

        resolve(state.selector_mode, &params)
            .map(Self)
            .ok_or_else(|| {
                tracing::info!(?params, "unresolvable marker selector");
                AppError::not_found("Could not find marker")
            })
    }
}
