//! In-memory `MarkerRepo` used by handler and router tests.
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::marker_repo::{Marker, MarkerRepo, Selector};

#[derive(Debug, Default)]
pub struct MemoryMarkerRepo {
    rows: Mutex<Vec<(i64, Marker)>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryMarkerRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail like a lost connection.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of store calls made so far (ping excluded).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Insert a row directly, returning its id.
    pub fn seed(&self, user: &str, lat: f64, lng: f64, note: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.rows.lock().unwrap().push((
            id,
            Marker {
                user: user.to_string(),
                lat,
                lng,
                note: note.to_string(),
            },
        ));
        id
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn matches(id: i64, marker: &Marker, user: &str, selector: Selector) -> bool {
    marker.user == user
        && match selector {
            Selector::ById(wanted) => id == wanted,
            Selector::ByCoordinates { lat, lng } => marker.lat == lat && marker.lng == lng,
        }
}

#[async_trait]
impl MarkerRepo for MemoryMarkerRepo {
    async fn create(&self, user: &str, lat: f64, lng: f64, note: &str) -> StoreResult<Marker> {
        self.enter()?;
        self.seed(user, lat, lng, note);
        Ok(Marker {
            user: user.to_string(),
            lat,
            lng,
            note: note.to_string(),
        })
    }

    async fn list(&self, user: &str) -> StoreResult<Vec<Marker>> {
        self.enter()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|(_, m)| m.user == user)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn get(&self, user: &str, selector: Selector) -> StoreResult<Marker> {
        self.enter()?;
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|(id, m)| matches(*id, m, user, selector))
            .map(|(_, m)| m.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, user: &str, selector: Selector) -> StoreResult<()> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(id, m)| !matches(*id, m, user, selector));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rows_are_scoped_to_their_user() {
        let repo = MemoryMarkerRepo::new();
        let id = repo.seed("alice", 1.5, 2.5, "cafe");
        repo.seed("bob", 1.5, 2.5, "");

        let alice = repo.list("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].note, "cafe");

        assert!(matches!(
            repo.get("bob", Selector::ById(id)).await,
            Err(StoreError::NotFound)
        ));
        repo.delete("bob", Selector::ByCoordinates { lat: 1.5, lng: 2.5 })
            .await
            .unwrap();
        assert_eq!(repo.len(), 1);
    }
}
