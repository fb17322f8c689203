//! Property-based tests for seat allocation.
//!
//! Random layouts with a random set of already-booked seats, checked against
//! the invariants every plan must satisfy.

use std::collections::HashSet;

use proptest::prelude::*;

use super::plan;
use crate::error::BookingError;
use crate::models::{Layout, SeatCount, SeatMap, SeatState};

/// A layout of up to 12x10 seats together with a random booked/free mask.
fn seat_map_strategy() -> impl Strategy<Value = SeatMap> {
    (1usize..=12, 1usize..=10).prop_flat_map(|(rows, per_row)| {
        proptest::collection::vec(any::<bool>(), rows * per_row).prop_map(move |mask| {
            let layout = Layout::new(rows, per_row).unwrap();
            let states = mask
                .into_iter()
                .map(|booked| if booked { SeatState::Booked } else { SeatState::Available })
                .collect();
            SeatMap::from_states(layout, states).unwrap()
        })
    })
}

fn map_and_count() -> impl Strategy<Value = (SeatMap, SeatCount)> {
    seat_map_strategy().prop_flat_map(|map| {
        let upper = map.layout().capacity() as i64 + 5;
        (Just(map), (1i64..=upper).prop_map(|n| SeatCount::try_from(n).unwrap()))
    })
}

proptest! {
    #[test]
    fn prop_plan_is_exact_free_and_distinct((map, count) in map_and_count()) {
        if let Ok(plan) = plan(&map, count) {
            prop_assert_eq!(plan.indices().len(), count.get());

            let unique: HashSet<usize> = plan.indices().iter().copied().collect();
            prop_assert_eq!(unique.len(), plan.indices().len());

            for &index in plan.indices() {
                prop_assert!(map.seats()[index].is_available(), "seat {} already booked", index);
            }
        }
    }

    #[test]
    fn prop_fails_only_when_map_lacks_seats((map, count) in map_and_count()) {
        let free = map.available_count();
        match plan(&map, count) {
            Ok(_) => prop_assert!(free >= count.get()),
            Err(err) => prop_assert_eq!(
                err,
                BookingError::InsufficientCapacity { requested: count.get(), available: free }
            ),
        }
    }

    #[test]
    fn prop_plan_is_ascending((map, count) in map_and_count()) {
        if let Ok(plan) = plan(&map, count) {
            prop_assert!(plan.indices().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_lowest_fitting_row_wins((map, count) in map_and_count()) {
        let per_row = map.layout().seats_per_row();
        let fitting_row = map
            .rows()
            .position(|row| row.iter().filter(|s| s.is_available()).count() >= count.get());

        if let Some(row) = fitting_row {
            let expected: Vec<usize> = map
                .rows()
                .nth(row)
                .unwrap()
                .iter()
                .filter(|s| s.is_available())
                .map(|s| s.index)
                .take(count.get())
                .collect();
            let plan = plan(&map, count).unwrap();
            prop_assert_eq!(plan.indices(), expected.as_slice());
            prop_assert!(plan.indices().iter().all(|i| i / per_row == row));
        }
    }

    #[test]
    fn prop_spill_takes_leading_free_seats((map, count) in map_and_count()) {
        let fits_in_row = map
            .rows()
            .any(|row| row.iter().filter(|s| s.is_available()).count() >= count.get());

        if !fits_in_row && map.available_count() >= count.get() {
            let expected: Vec<usize> = map
                .seats()
                .iter()
                .filter(|s| s.is_available())
                .map(|s| s.index)
                .take(count.get())
                .collect();
            let plan = plan(&map, count).unwrap();
            prop_assert_eq!(plan.indices(), expected.as_slice());
        }
    }

    #[test]
    fn prop_plan_is_deterministic((map, count) in map_and_count()) {
        prop_assert_eq!(plan(&map, count), plan(&map, count));
    }
}
