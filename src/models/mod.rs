pub mod booking;
pub mod seat;

pub use booking::{AllocationPlan, SeatCount};
pub use seat::{Layout, Seat, SeatMap, SeatState};
