//! Seat selection.
//!
//! Pure decision logic: reads a seat map, never mutates it. A party is kept
//! together in the lowest row that can hold all of it; only when no row can
//! do so are seats taken across rows. Ordering is ascending (row, column)
//! everywhere, so the result is deterministic for a given map and count.

use crate::error::BookingError;
use crate::models::{AllocationPlan, SeatCount, SeatMap};

pub fn plan(map: &SeatMap, count: SeatCount) -> Result<AllocationPlan, BookingError> {
    let wanted = count.get();

    if let Some(indices) = single_row(map, wanted) {
        return Ok(AllocationPlan::new(indices));
    }

    let indices = spill(map, wanted);
    if indices.len() < wanted {
        return Err(BookingError::InsufficientCapacity {
            requested: wanted,
            available: indices.len(),
        });
    }
    Ok(AllocationPlan::new(indices))
}

/// First `wanted` free seats of the lowest row with enough free seats.
fn single_row(map: &SeatMap, wanted: usize) -> Option<Vec<usize>> {
    map.rows().find_map(|row| {
        let free: Vec<usize> = row
            .iter()
            .filter(|seat| seat.is_available())
            .map(|seat| seat.index)
            .take(wanted)
            .collect();
        (free.len() == wanted).then_some(free)
    })
}

/// Free seats row by row until `wanted` are collected. Returns fewer when the
/// whole map does not have enough.
fn spill(map: &SeatMap, wanted: usize) -> Vec<usize> {
    map.rows()
        .flat_map(|row| row.iter())
        .filter(|seat| seat.is_available())
        .map(|seat| seat.index)
        .take(wanted)
        .collect()
}

#[cfg(test)]
mod proptests;
