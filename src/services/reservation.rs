//! Reservation store.
//!
//! Single owner of the seat map. `book` and `reset` take the write guard,
//! so plan-and-commit happens inside one critical section and two callers
//! can never be handed the same seat. `list_seats` takes the read guard and
//! therefore only ever sees the map before or after a mutation.
//!
//! Critical sections never `.await` and never do I/O. Persistence is fed
//! through an unbounded channel (see [`SeatChange`]), whose `send` does not
//! block, in the same order the mutations were committed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::allocator;
use crate::error::BookingError;
use crate::models::{AllocationPlan, Layout, Seat, SeatCount, SeatMap};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// A committed mutation of the seat map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatChange {
    /// Seats (0-based) that went from available to booked.
    Booked(Vec<usize>),
    /// Every seat went back to available.
    Reset,
}

pub type ChangeSender = mpsc::UnboundedSender<SeatChange>;
pub type ChangeReceiver = mpsc::UnboundedReceiver<SeatChange>;

#[derive(Clone)]
pub struct ReservationStore {
    map: Arc<RwLock<SeatMap>>,
    layout: Layout,
    lock_timeout: Duration,
    changes: Option<ChangeSender>,
}

impl ReservationStore {
    /// In-memory store, every seat available.
    pub fn new(layout: Layout) -> Self {
        Self::with_map(SeatMap::new(layout))
    }

    /// Store seeded with an existing map (e.g. loaded from the database).
    pub fn with_map(map: SeatMap) -> Self {
        Self {
            layout: map.layout(),
            map: Arc::new(RwLock::new(map)),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            changes: None,
        }
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Publishes every committed change on `sender`.
    pub fn with_change_feed(mut self, sender: ChangeSender) -> Self {
        self.changes = Some(sender);
        self
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Snapshot of all seats ordered by index.
    pub async fn list_seats(&self) -> Vec<Seat> {
        self.map.read().await.seats().to_vec()
    }

    pub async fn available_count(&self) -> usize {
        self.map.read().await.available_count()
    }

    /// Picks and books `count` seats atomically. Returns 0-based indices.
    pub async fn book(&self, count: i64) -> Result<AllocationPlan, BookingError> {
        let count = SeatCount::try_from(count)?;

        let mut map = self.lock_exclusive().await?;
        let outcome = allocator::plan(&map, count).map(|plan| {
            map.mark_booked(plan.indices());
            let delivered = self.publish(SeatChange::Booked(plan.indices().to_vec()));
            (plan, map.available_count(), delivered)
        });
        drop(map);

        match outcome {
            Ok((plan, remaining, delivered)) => {
                if !delivered {
                    warn!("persistence writer is gone, booking not persisted");
                }
                info!(seats = ?plan.seat_numbers(), remaining, "seats booked");
                Ok(plan)
            }
            Err(err) => {
                debug!(requested = count.get(), error = %err, "booking not satisfiable");
                Err(err)
            }
        }
    }

    /// Frees every seat. Idempotent.
    pub async fn reset(&self) -> Result<(), BookingError> {
        let mut map = self.lock_exclusive().await?;
        map.reset();
        let delivered = self.publish(SeatChange::Reset);
        drop(map);

        if !delivered {
            warn!("persistence writer is gone, reset not persisted");
        }
        warn!(capacity = self.layout.capacity(), "all bookings reset");
        Ok(())
    }

    async fn lock_exclusive(&self) -> Result<RwLockWriteGuard<'_, SeatMap>, BookingError> {
        tokio::time::timeout(self.lock_timeout, self.map.write())
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.lock_timeout.as_millis() as u64, "seat map lock timed out");
                BookingError::TransientUnavailable
            })
    }

    // Called with the write guard held, so it must not log. Returns false
    // when the writer has shut down.
    fn publish(&self, change: SeatChange) -> bool {
        match &self.changes {
            Some(tx) => tx.send(change).is_ok(),
            None => true,
        }
    }
}
