pub mod booking;
pub mod dto;
pub mod film;
pub mod seat;
pub mod slot;

pub use booking::{BookedSeat, BookingReceipt, Reservation, SalesRecord};
pub use film::{Film, FilmGraph, NewFilm, NewSlot, SlotGraph};
pub use seat::Seat;
pub use slot::{ShowCategory, Slot};
