//! Bearer access token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を AuthService で検証し、identity claim を `AuthCtx` として格納する
//! - 失敗は AuthError → AppError に変換してここで返す (handler までは届かない)
//! - method の判定より先に走る (未対応 method でも header が無ければ 400)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// marker 系 route に認証を掛けるための middleware を適用する。
///
/// `route_layer` なので、route に一致しないリクエスト (404) には走らない。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match state.auth.extract_identity(authorization) {
        Ok(identity) => identity,
        Err(err) => {
            match &err {
                AuthError::MissingCredential => {
                    tracing::info!(error = %err, "authorization header missing")
                }
                _ => tracing::warn!(error = %err, "access token verification failed"),
            }
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(identity));

    Ok(next.run(req).await)
}
