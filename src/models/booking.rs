use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Seat, ShowCategory, Slot};

/// Seats a confirmation wants to take, plus the booking row recorded with them.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub booking_ref: Uuid,
    pub film_id: i32,
    pub slot_id: i32,
    pub customer: String,
    pub seat_ids: Vec<i32>,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSeat {
    pub seat_id: i32,
    pub row: i32,
    pub number: i32,
}

impl From<&Seat> for BookedSeat {
    fn from(seat: &Seat) -> Self {
        BookedSeat {
            seat_id: seat.seat_id,
            row: seat.row,
            number: seat.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking_id: Uuid,
    pub film_id: i32,
    pub slot_id: i32,
    pub show_category: ShowCategory,
    pub slot_date: NaiveDate,
    pub seats: Vec<BookedSeat>,
    pub total_amount: f64,
}

impl BookingReceipt {
    pub fn new(reservation: &Reservation, slot: &Slot, seats: &[Seat]) -> Self {
        BookingReceipt {
            booking_id: reservation.booking_ref,
            film_id: slot.film_id,
            slot_id: slot.slot_id,
            show_category: slot.show_category,
            slot_date: slot.slot_date,
            seats: seats.iter().map(BookedSeat::from).collect(),
            total_amount: reservation.total_amount,
        }
    }
}

/// Per-film sales aggregate.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub film_id: i32,
    pub name: String,
    pub genre: String,
    pub bookings: i64,
    pub tickets_sold: i64,
    pub revenue: f64,
}
