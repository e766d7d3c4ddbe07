/*
 * Responsibility
 * - URL 構造を定義 (/healthcheck, /pingDB, /marker, /marker/{selector})
 * - Bearer が必要な範囲 (/marker 系) にだけ access middleware を route_layer で適用する
 * - 単一 marker の path 形は SelectorMode で切り替える
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    health::{healthcheck, ping_db},
    markers::{create_marker, delete_marker, get_marker, list_markers, method_not_allowed},
};
use crate::config::SelectorMode;
use crate::middleware;
use crate::state::AppState;

pub fn single_marker_path(mode: SelectorMode) -> &'static str {
    match mode {
        SelectorMode::Id => "/marker/{id}",
        SelectorMode::Coordinates => "/marker/{lat}/{lng}",
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    let markers = Router::new()
        .route(
            "/marker",
            get(list_markers)
                .put(create_marker)
                // `get` would otherwise answer HEAD too.
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            single_marker_path(state.selector_mode),
            get(get_marker)
                .delete(delete_marker)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        );
    let markers = middleware::auth::access::apply(markers, state);

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/pingDB", get(ping_db))
        .merge(markers)
}
