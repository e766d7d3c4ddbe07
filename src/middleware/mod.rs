/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access::apply(...) (Bearer 検証), http::apply(...) (trace / request-id / body limit)
 */
pub mod auth;
pub mod http;
