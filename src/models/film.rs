use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Seat, Slot, ShowCategory};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Film {
    pub film_id: i32,
    pub name: String,
    pub description: String,
    pub genre: String,
    pub duration: i32,
    pub amount: f64,
}

/// A film to be inserted together with its screening slots.
#[derive(Debug, Clone)]
pub struct NewFilm {
    pub name: String,
    pub description: String,
    pub genre: String,
    pub duration: i32,
    pub amount: f64,
    pub slots: Vec<NewSlot>,
}

/// A slot and the size of the seat grid generated for it.
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub show_category: ShowCategory,
    pub slot_date: chrono::NaiveDate,
    pub rows: i32,
    pub seats_per_row: i32,
}

impl NewSlot {
    /// Seat positions as `(row, number)`, both starting at 1.
    pub fn seat_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (1..=self.rows).flat_map(move |row| (1..=self.seats_per_row).map(move |number| (row, number)))
    }
}

/// Film with every slot and seat loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmGraph {
    pub film: Film,
    pub slots: Vec<SlotGraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGraph {
    pub slot: Slot,
    pub seats: Vec<Seat>,
}
