pub mod persistence;
pub mod reservation;

pub use persistence::{PersistenceWriter, SeatRepository};
pub use reservation::{ReservationStore, SeatChange};
