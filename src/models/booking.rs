use std::num::NonZeroUsize;

use crate::error::BookingError;

/// Number of seats requested in one booking. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCount(NonZeroUsize);

impl SeatCount {
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl TryFrom<i64> for SeatCount {
    type Error = BookingError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(SeatCount)
            .ok_or(BookingError::InvalidRequest)
    }
}

/// 0-based seat indices chosen for one request, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan(Vec<usize>);

impl AllocationPlan {
    pub(crate) fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Seat numbers as shown to clients (1-based).
    pub fn seat_numbers(&self) -> Vec<usize> {
        self.0.iter().map(|i| i + 1).collect()
    }
}
