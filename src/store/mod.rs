//! Film catalog persistence.
//!
//! Services talk to a [`FilmStore`]; `PgFilmStore` is the production backend,
//! `MemoryStore` keeps everything in process. The Redis read-through layer in
//! `crate::cache` wraps either of them.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    Film, FilmGraph, NewFilm, Reservation, SalesRecord, Seat, ShowCategory, Slot, SlotGraph,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgFilmStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt catalog data: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait FilmStore: Send + Sync {
    /// Inserts a film with its slots and seat grids.
    ///
    /// Returns `None` when a film with the same name (case-insensitive)
    /// already exists; nothing is written in that case.
    async fn insert_film(&self, film: NewFilm) -> Result<Option<i32>>;

    /// Films whose name equals `name`, ignoring case. Ordered by id.
    async fn films_by_name(&self, name: &str) -> Result<Vec<Film>>;

    /// Films whose genre equals `genre`, ignoring case. Ordered by id.
    async fn films_by_genre(&self, genre: &str) -> Result<Vec<Film>>;

    async fn film_by_id(&self, film_id: i32) -> Result<Option<Film>>;

    /// Every film with its slots and seats. Films, slots and seats are
    /// ordered by id, seats by `(row, number)`.
    async fn catalog(&self) -> Result<Vec<FilmGraph>>;

    async fn find_slot(
        &self,
        film_id: i32,
        category: ShowCategory,
        date: NaiveDate,
    ) -> Result<Option<Slot>>;

    /// Unreserved seats of a slot ordered by `(row, number)`.
    async fn free_seats(&self, slot_id: i32) -> Result<Vec<Seat>>;

    /// Marks every seat in the reservation as reserved and records the
    /// booking, all or nothing.
    ///
    /// Returns `false` without changing anything if any of the seats is
    /// already reserved or does not belong to the slot.
    async fn reserve_seats(&self, reservation: &Reservation) -> Result<bool>;

    /// One record per film, including films that have sold nothing.
    async fn sales(&self) -> Result<Vec<SalesRecord>>;
}

/// Nests slots under films and seats under slots.
///
/// Input order is preserved within each parent. A slot or seat whose parent
/// is missing means the rows were read inconsistently.
pub(crate) fn assemble_catalog(
    films: Vec<Film>,
    slots: Vec<Slot>,
    seats: Vec<Seat>,
) -> Result<Vec<FilmGraph>> {
    use std::collections::HashMap;

    let mut seats_by_slot: HashMap<i32, Vec<Seat>> = HashMap::new();
    for seat in seats {
        seats_by_slot.entry(seat.slot_id).or_default().push(seat);
    }

    let mut slots_by_film: HashMap<i32, Vec<SlotGraph>> = HashMap::new();
    for slot in slots {
        let seats = seats_by_slot.remove(&slot.slot_id).unwrap_or_default();
        slots_by_film
            .entry(slot.film_id)
            .or_default()
            .push(SlotGraph { slot, seats });
    }

    if let Some(slot_id) = seats_by_slot.keys().next() {
        return Err(StoreError::Corrupt(format!("seats reference unknown slot {}", slot_id)));
    }

    let graphs: Vec<FilmGraph> = films
        .into_iter()
        .map(|film| {
            let slots = slots_by_film.remove(&film.film_id).unwrap_or_default();
            FilmGraph { film, slots }
        })
        .collect();

    if let Some(film_id) = slots_by_film.keys().next() {
        return Err(StoreError::Corrupt(format!("slots reference unknown film {}", film_id)));
    }

    Ok(graphs)
}
