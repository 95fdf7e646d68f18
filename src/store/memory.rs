use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use tokio::sync::RwLock;

use super::{assemble_catalog, FilmStore, Result};
use crate::models::{Film, FilmGraph, NewFilm, Reservation, SalesRecord, Seat, ShowCategory, Slot};

struct BookingRow {
    film_id: i32,
    seat_count: i64,
    total_amount: f64,
}

#[derive(Default)]
struct Catalog {
    films: Vec<Film>,
    slots: Vec<Slot>,
    seats: Vec<Seat>,
    bookings: Vec<BookingRow>,
}

/// In-process catalog. Ids are assigned sequentially from 1 and rows are
/// never removed, so every collection stays ordered by id.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.trim().to_lowercase()
}

#[async_trait]
impl FilmStore for MemoryStore {
    async fn insert_film(&self, film: NewFilm) -> Result<Option<i32>> {
        let mut catalog = self.inner.write().await;

        if catalog.films.iter().any(|f| same_text(&f.name, &film.name)) {
            return Ok(None);
        }

        let film_id = catalog.films.len() as i32 + 1;
        for new_slot in &film.slots {
            let slot_id = catalog.slots.len() as i32 + 1;
            catalog.slots.push(Slot {
                slot_id,
                film_id,
                show_category: new_slot.show_category,
                slot_date: new_slot.slot_date,
            });
            for (row, number) in new_slot.seat_positions() {
                let seat_id = catalog.seats.len() as i32 + 1;
                catalog.seats.push(Seat { seat_id, slot_id, row, number, is_reserved: false });
            }
        }

        catalog.films.push(Film {
            film_id,
            name: film.name,
            description: film.description,
            genre: film.genre,
            duration: film.duration,
            amount: film.amount,
        });
        Ok(Some(film_id))
    }

    async fn films_by_name(&self, name: &str) -> Result<Vec<Film>> {
        let catalog = self.inner.read().await;
        Ok(catalog.films.iter().filter(|f| same_text(&f.name, name)).cloned().collect())
    }

    async fn films_by_genre(&self, genre: &str) -> Result<Vec<Film>> {
        let catalog = self.inner.read().await;
        Ok(catalog.films.iter().filter(|f| same_text(&f.genre, genre)).cloned().collect())
    }

    async fn film_by_id(&self, film_id: i32) -> Result<Option<Film>> {
        let catalog = self.inner.read().await;
        Ok(catalog.films.iter().find(|f| f.film_id == film_id).cloned())
    }

    async fn catalog(&self) -> Result<Vec<FilmGraph>> {
        let catalog = self.inner.read().await;
        let mut seats = catalog.seats.clone();
        seats.sort_by_key(|s| (s.slot_id, s.row, s.number));
        assemble_catalog(catalog.films.clone(), catalog.slots.clone(), seats)
    }

    async fn find_slot(
        &self,
        film_id: i32,
        category: ShowCategory,
        date: NaiveDate,
    ) -> Result<Option<Slot>> {
        let catalog = self.inner.read().await;
        Ok(catalog
            .slots
            .iter()
            .find(|s| s.film_id == film_id && s.show_category == category && s.slot_date == date)
            .cloned())
    }

    async fn free_seats(&self, slot_id: i32) -> Result<Vec<Seat>> {
        let catalog = self.inner.read().await;
        let mut seats: Vec<Seat> = catalog
            .seats
            .iter()
            .filter(|s| s.slot_id == slot_id && !s.is_reserved)
            .cloned()
            .collect();
        seats.sort_by_key(|s| (s.row, s.number));
        Ok(seats)
    }

    async fn reserve_seats(&self, reservation: &Reservation) -> Result<bool> {
        let mut catalog = self.inner.write().await;

        let wanted: HashSet<i32> = reservation.seat_ids.iter().copied().collect();
        if wanted.len() != reservation.seat_ids.len() {
            return Ok(false);
        }

        let available = catalog
            .seats
            .iter()
            .filter(|s| wanted.contains(&s.seat_id))
            .filter(|s| s.slot_id == reservation.slot_id && !s.is_reserved)
            .count();
        if available != wanted.len() {
            return Ok(false);
        }

        for seat in catalog.seats.iter_mut().filter(|s| wanted.contains(&s.seat_id)) {
            seat.is_reserved = true;
        }
        catalog.bookings.push(BookingRow {
            film_id: reservation.film_id,
            seat_count: wanted.len() as i64,
            total_amount: reservation.total_amount,
        });
        Ok(true)
    }

    async fn sales(&self) -> Result<Vec<SalesRecord>> {
        let catalog = self.inner.read().await;
        let records = catalog
            .films
            .iter()
            .map(|film| {
                let bookings: Vec<&BookingRow> =
                    catalog.bookings.iter().filter(|b| b.film_id == film.film_id).collect();
                SalesRecord {
                    film_id: film.film_id,
                    name: film.name.clone(),
                    genre: film.genre.clone(),
                    bookings: bookings.len() as i64,
                    tickets_sold: bookings.iter().map(|b| b.seat_count).sum(),
                    revenue: bookings.iter().map(|b| b.total_amount).sum(),
                }
            })
            .collect();
        Ok(records)
    }
}
