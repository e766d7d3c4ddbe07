/*
 * Responsibility
 * - markers テーブル向け SQLx 操作
 * - すべてのクエリは username (= 呼び出し元の Identity) で絞り込む
 * - 値は必ず bind する (文字列連結で SQL を組まない)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{StoreError, StoreResult};

/// A persisted marker as the rest of the app sees it (the row id stays inside the repo).
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub user: String,
    pub lat: f64,
    pub lng: f64,
    pub note: String,
}

/// Lookup key for a single marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selector {
    ById(i64),
    ByCoordinates { lat: f64, lng: f64 },
}

/// Marker persistence.
///
/// Every operation is scoped to `user`; there is no way to read or delete
/// another user's rows through this interface.
#[async_trait]
pub trait MarkerRepo: Send + Sync + 'static {
    async fn create(&self, user: &str, lat: f64, lng: f64, note: &str) -> StoreResult<Marker>;

    // Empty result is Ok(vec![]).
    async fn list(&self, user: &str) -> StoreResult<Vec<Marker>>;

    // Zero matching rows is `StoreError::NotFound`.
    async fn get(&self, user: &str, selector: Selector) -> StoreResult<Marker>;

    // Zero affected rows is `StoreError::NotFound`.
    async fn delete(&self, user: &str, selector: Selector) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}

#[derive(Debug, FromRow)]
struct MarkerRow {
    username: String,
    lat: f64,
    lng: f64,
    note: Option<String>,
}

impl From<MarkerRow> for Marker {
    fn from(row: MarkerRow) -> Self {
        Self {
            user: row.username,
            lat: row.lat,
            lng: row.lng,
            note: row.note.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgMarkerRepo {
    pool: PgPool,
}

impl PgMarkerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the markers table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS markers (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL,
                lat DOUBLE PRECISION NOT NULL,
                lng DOUBLE PRECISION NOT NULL,
                note TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MarkerRepo for PgMarkerRepo {
    async fn create(&self, user: &str, lat: f64, lng: f64, note: &str) -> StoreResult<Marker> {
        sqlx::query(
            r#"
            INSERT INTO markers (username, lat, lng, note)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user)
        .bind(lat)
        .bind(lng)
        .bind(note)
        .execute(&self.pool)
        .await?;

        // Echo the input, not the stored row.
        Ok(Marker {
            user: user.to_string(),
            lat,
            lng,
            note: note.to_string(),
        })
    }

    async fn list(&self, user: &str) -> StoreResult<Vec<Marker>> {
        let rows = sqlx::query_as::<_, MarkerRow>(
            r#"
            SELECT username, lat, lng, note
            FROM markers
            WHERE username = $1
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Marker::from).collect())
    }

    async fn get(&self, user: &str, selector: Selector) -> StoreResult<Marker> {
        let row = match selector {
            Selector::ById(id) => {
                sqlx::query_as::<_, MarkerRow>(
                    r#"
                    SELECT username, lat, lng, note
                    FROM markers
                    WHERE username = $1 AND id = $2
                    "#,
                )
                .bind(user)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            Selector::ByCoordinates { lat, lng } => {
                sqlx::query_as::<_, MarkerRow>(
                    r#"
                    SELECT username, lat, lng, note
                    FROM markers
                    WHERE username = $1 AND lat = $2 AND lng = $3
                    LIMIT 1
                    "#,
                )
                .bind(user)
                .bind(lat)
                .bind(lng)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        row.map(Marker::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, user: &str, selector: Selector) -> StoreResult<()> {
        let result = match selector {
            Selector::ById(id) => {
                sqlx::query(
                    r#"
                    DELETE FROM markers
                    WHERE username = $1 AND id = $2
                    "#,
                )
                .bind(user)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            Selector::ByCoordinates { lat, lng } => {
                sqlx::query(
                    r#"
                    DELETE FROM markers
                    WHERE username = $1 AND lat = $2 AND lng = $3
                    "#,
                )
                .bind(user)
                .bind(lat)
                .bind(lng)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
