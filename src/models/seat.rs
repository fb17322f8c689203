use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Reference venue: 11 rows of 7 seats.
pub const DEFAULT_ROWS: usize = 11;
pub const DEFAULT_SEATS_PER_ROW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    Booked,
}

impl SeatState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatState::Available => "available",
            SeatState::Booked => "booked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(SeatState::Available),
            "booked" => Some(SeatState::Booked),
            _ => None,
        }
    }
}

/// Venue geometry. Fixed for the lifetime of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    seats_per_row: usize,
}

impl Layout {
    pub fn new(rows: usize, seats_per_row: usize) -> Result<Self, LayoutError> {
        if rows == 0 || seats_per_row == 0 {
            return Err(LayoutError::Empty { rows, seats_per_row });
        }
        if rows.checked_mul(seats_per_row).is_none() {
            return Err(LayoutError::TooLarge { rows, seats_per_row });
        }
        Ok(Self { rows, seats_per_row })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seats_per_row(&self) -> usize {
        self.seats_per_row
    }

    /// Total seat count. `new` guarantees this does not overflow.
    pub fn capacity(&self) -> usize {
        self.rows * self.seats_per_row
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seats_per_row: DEFAULT_SEATS_PER_ROW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub state: SeatState,
}

impl Seat {
    fn new(index: usize, layout: Layout, state: SeatState) -> Self {
        Self {
            index,
            row: index / layout.seats_per_row,
            col: index % layout.seats_per_row,
            state,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == SeatState::Available
    }
}

/// Flattened grid of seats, row-major. Only seat states ever change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    layout: Layout,
    seats: Vec<Seat>,
}

impl SeatMap {
    /// Fresh map with every seat available.
    pub fn new(layout: Layout) -> Self {
        let seats = (0..layout.capacity())
            .map(|index| Seat::new(index, layout, SeatState::Available))
            .collect();
        Self { layout, seats }
    }

    /// Rebuilds a map from persisted states ordered by seat index.
    pub fn from_states(layout: Layout, states: Vec<SeatState>) -> Result<Self, LayoutError> {
        if states.len() != layout.capacity() {
            return Err(LayoutError::SizeMismatch {
                expected: layout.capacity(),
                found: states.len(),
            });
        }
        let seats = states
            .into_iter()
            .enumerate()
            .map(|(index, state)| Seat::new(index, layout, state))
            .collect();
        Ok(Self { layout, seats })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Rows in ascending order, each in ascending column order.
    pub fn rows(&self) -> impl Iterator<Item = &[Seat]> {
        self.seats.chunks(self.layout.seats_per_row)
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_available()).count()
    }

    /// Marks the given seats as booked. Callers pass a plan computed against
    /// this same map while holding exclusive access to it.
    pub(crate) fn mark_booked(&mut self, indices: &[usize]) {
        for &index in indices {
            let seat = &mut self.seats[index];
            debug_assert!(seat.is_available(), "seat {index} booked twice");
            seat.state = SeatState::Booked;
        }
    }

    pub(crate) fn reset(&mut self) {
        for seat in &mut self.seats {
            seat.state = SeatState::Available;
        }
    }
}
