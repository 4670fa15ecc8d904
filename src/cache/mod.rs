use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::QueueResult;
use crate::queue::board::{self, Board};

/// Short-lived cache for the band board, which every screen polls.
///
/// Entries expire after the TTL and are dropped eagerly whenever the host
/// changes the event's queue.
#[derive(Clone)]
pub struct BoardCache {
    cache: Arc<Cache<i32, Board>>,
}

impl BoardCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(ttl)
                .max_capacity(256)
                .build(),
        );

        Self { cache }
    }

    /// Return the cached board, loading it from the store on a miss.
    pub async fn get_or_load(&self, db: &DatabaseConnection, event_id: i32) -> QueueResult<Board> {
        if let Some(cached) = self.cache.get(&event_id).await {
            return Ok(cached);
        }

        debug!(event_id, "Board cache miss");
        let fresh = board::board(db, event_id).await?;
        self.cache.insert(event_id, fresh.clone()).await;
        Ok(fresh)
    }

    pub async fn invalidate(&self, event_id: i32) {
        self.cache.invalidate(&event_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board(event_id: i32, version: i32) -> Board {
        Board {
            event_id,
            event_name: "Tuesday Jam".to_string(),
            queue_version: version,
            now_performing: None,
            on_deck: None,
            up_next: Vec::new(),
            total_waiting: 0,
        }
    }

    #[tokio::test]
    async fn invalidate_drops_the_entry() {
        let cache = BoardCache::new(Duration::from_secs(60));
        cache.cache.insert(1, sample_board(1, 4)).await;
        cache.cache.insert(2, sample_board(2, 9)).await;

        assert_eq!(cache.cache.get(&1).await.map(|b| b.queue_version), Some(4));

        cache.invalidate(1).await;
        assert!(cache.cache.get(&1).await.is_none());
        assert!(cache.cache.get(&2).await.is_some());
    }
}
