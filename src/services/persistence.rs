//! Write-behind persistence for the seat map.
//!
//! The in-memory store stays authoritative. Committed changes arrive on the
//! store's change feed and are applied to a [`SeatRepository`] one by one,
//! in commit order. A failed write is logged and the writer moves on.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::models::{Layout, SeatMap, SeatState};
use crate::services::reservation::{ChangeReceiver, SeatChange};

/// Minimal storage interface behind the reservation store.
#[async_trait]
pub trait SeatRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates any seat records the layout needs that do not exist yet.
    async fn ensure_layout(&self, layout: Layout) -> Result<(), Self::Error>;

    /// Seat states ordered by index.
    async fn load_states(&self, layout: Layout) -> Result<Vec<SeatState>, Self::Error>;

    async fn apply(&self, change: &SeatChange) -> Result<(), Self::Error>;
}

/// Prepares the repository for `layout` and rebuilds the seat map from it.
pub async fn restore<R: SeatRepository>(repo: &R, layout: Layout) -> anyhow::Result<SeatMap> {
    repo.ensure_layout(layout).await?;
    let states = repo.load_states(layout).await?;
    let map = SeatMap::from_states(layout, states)?;
    info!(
        capacity = layout.capacity(),
        available = map.available_count(),
        "seat map restored"
    );
    Ok(map)
}

pub struct PersistenceWriter<R> {
    repo: Arc<R>,
    changes: ChangeReceiver,
}

impl<R: SeatRepository + 'static> PersistenceWriter<R> {
    pub fn new(repo: Arc<R>, changes: ChangeReceiver) -> Self {
        Self { repo, changes }
    }

    /// Applies changes until every sender has been dropped.
    pub async fn run(mut self) {
        let mut applied = 0u64;
        while let Some(change) = self.changes.recv().await {
            match self.repo.apply(&change).await {
                Ok(()) => applied += 1,
                Err(e) => error!(?change, "failed to persist seat change: {}", e),
            }
        }
        info!(applied, "persistence writer stopped");
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
