/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - NotFound と Persistence を分ける (境界では同じ status でも log の重みが違う)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Persistence(#[from] sqlx::Error),
    #[error("marker not found")]
    NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;
