/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - markers: MarkerRepo, auth: AuthService, selector_mode
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::SelectorMode;
use crate::repos::MarkerRepo;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub markers: Arc<dyn MarkerRepo>,
    pub auth: Arc<AuthService>,
    pub selector_mode: SelectorMode,
}

impl AppState {
    pub fn new(
        markers: Arc<dyn MarkerRepo>,
        auth: Arc<AuthService>,
        selector_mode: SelectorMode,
    ) -> Self {
        Self {
            markers,
            auth,
            selector_mode,
        }
    }
}
