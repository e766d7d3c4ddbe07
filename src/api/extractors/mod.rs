/*
 * Responsibility
 * - handler が受け取る extractor の公開口
 */
pub mod auth_ctx;
pub mod selector;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use selector::MarkerSelector;
