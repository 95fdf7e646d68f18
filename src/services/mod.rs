pub mod bookings;
pub mod films;

pub use bookings::BookingService;
pub use films::FilmService;
