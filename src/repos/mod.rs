/*
 * Responsibility
 * - 永続化層 (markers テーブル) の公開インターフェース
 */
pub mod error;
pub mod marker_repo;

#[cfg(test)]
pub mod memory;

pub use error::StoreError;
pub use marker_repo::{Marker, MarkerRepo, PgMarkerRepo, Selector};
