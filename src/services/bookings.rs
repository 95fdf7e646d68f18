//! Seat booking confirmation.
//!
//! Seats are picked from the current free set and handed to the store, which
//! reserves them all or none. Losing a race to another confirmation means
//! picking again from the fresh free set, a bounded number of times.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::dto::ConfirmBookingDto;
use crate::models::{BookingReceipt, Reservation, Seat};
use crate::store::FilmStore;

pub const INSUFFICIENT_SEATS: &str = "insufficient seats available";

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn FilmStore>,
    max_retries: u32,
}

/// Lowest `(row, number)` seats first; `free` is already in that order.
fn select_seats(free: &[Seat], quantity: usize) -> Option<&[Seat]> {
    free.get(..quantity)
}

impl BookingService {
    pub fn new(store: Arc<dyn FilmStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    pub async fn confirm_booking(
        &self,
        customer: &str,
        request: ConfirmBookingDto,
    ) -> Result<BookingReceipt> {
        request.validate()?;

        let film = self
            .store
            .film_by_id(request.film_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flim Not Found for this Id : {}", request.film_id)))?;

        let slot = self
            .store
            .find_slot(film.film_id, request.category, request.date)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No {} slot for film {} on {}",
                    request.category, film.film_id, request.date
                ))
            })?;

        let quantity = request.quantity as usize;
        for attempt in 1..=self.max_retries + 1 {
            let free = self.store.free_seats(slot.slot_id).await?;
            let chosen = select_seats(&free, quantity)
                .ok_or_else(|| AppError::Conflict(INSUFFICIENT_SEATS.to_string()))?;

            let reservation = Reservation {
                booking_ref: Uuid::new_v4(),
                film_id: film.film_id,
                slot_id: slot.slot_id,
                customer: customer.to_string(),
                seat_ids: chosen.iter().map(|s| s.seat_id).collect(),
                total_amount: film.amount * quantity as f64,
            };

            if self.store.reserve_seats(&reservation).await? {
                info!(
                    "Booking {} confirmed for {}: {} seats in slot {}",
                    reservation.booking_ref, customer, quantity, slot.slot_id
                );
                return Ok(BookingReceipt::new(&reservation, &slot, chosen));
            }

            warn!(
                "Seats in slot {} taken concurrently (attempt {} of {})",
                slot.slot_id,
                attempt,
                self.max_retries + 1
            );
            tokio::task::yield_now().await;
        }

        Err(AppError::Conflict(INSUFFICIENT_SEATS.to_string()))
    }
}
