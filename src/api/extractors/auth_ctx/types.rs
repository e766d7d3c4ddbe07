/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 */

use crate::services::auth::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は token の identity claim (markers.username と突き合わせる値)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user(&self) -> &str {
        self.identity.as_str()
    }
}
