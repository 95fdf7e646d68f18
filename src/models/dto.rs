//! Boundary-facing request and response shapes.
//!
//! Requests are validated with `validator` before they reach a service;
//! responses are projections of the stored entities and never expose the
//! entities themselves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use super::{Film, FilmGraph, NewFilm, NewSlot, Seat, ShowCategory, SlotGraph};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn unique_slots(dto: &AddFilmDto) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for slot in &dto.slots {
        if !seen.insert((slot.show_category, slot.slot_date)) {
            return Err(ValidationError::new("duplicate_slot"));
        }
    }
    Ok(())
}

// --- Requests ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "unique_slots"))]
pub struct AddFilmDto {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub genre: String,
    #[validate(range(min = 1, max = 600))]
    pub duration: i32,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    #[validate(length(max = 64), nested)]
    pub slots: Vec<AddSlotDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddSlotDto {
    pub show_category: ShowCategory,
    pub slot_date: NaiveDate,
    #[validate(range(min = 1, max = 50))]
    pub rows: i32,
    #[validate(range(min = 1, max = 100))]
    pub seats_per_row: i32,
}

impl From<AddFilmDto> for NewFilm {
    fn from(dto: AddFilmDto) -> Self {
        NewFilm {
            name: dto.name.trim().to_string(),
            description: dto.description.trim().to_string(),
            genre: dto.genre.trim().to_string(),
            duration: dto.duration,
            amount: dto.amount,
            slots: dto
                .slots
                .into_iter()
                .map(|s| NewSlot {
                    show_category: s.show_category,
                    slot_date: s.slot_date,
                    rows: s.rows,
                    seats_per_row: s.seats_per_row,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingDto {
    pub film_id: i32,
    pub category: ShowCategory,
    pub date: NaiveDate,
    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
}

// --- Responses ---

/// Flat film projection used by the lookup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowFilmRecord {
    pub name: String,
    pub description: String,
    pub genre: String,
    pub duration: i32,
    pub amount: f64,
}

impl From<Film> for ShowFilmRecord {
    fn from(film: Film) -> Self {
        ShowFilmRecord {
            name: film.name,
            description: film.description,
            genre: film.genre,
            duration: film.duration,
            amount: film.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRecord {
    pub film_id: i32,
    pub name: String,
    pub description: String,
    pub genre: String,
    pub duration: i32,
    pub amount: f64,
    pub slots: Vec<SlotRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub slot_id: i32,
    pub film_id: i32,
    pub show_category: String,
    pub slot_date: NaiveDate,
    pub seats: Vec<SeatRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    pub seat_id: i32,
    pub slot_id: i32,
    pub row: i32,
    pub number: i32,
    pub is_reserved: bool,
}

impl From<Seat> for SeatRecord {
    fn from(seat: Seat) -> Self {
        SeatRecord {
            seat_id: seat.seat_id,
            slot_id: seat.slot_id,
            row: seat.row,
            number: seat.number,
            is_reserved: seat.is_reserved,
        }
    }
}

impl From<SlotGraph> for SlotRecord {
    fn from(graph: SlotGraph) -> Self {
        SlotRecord {
            slot_id: graph.slot.slot_id,
            film_id: graph.slot.film_id,
            show_category: graph.slot.show_category.to_string(),
            slot_date: graph.slot.slot_date,
            seats: graph.seats.into_iter().map(SeatRecord::from).collect(),
        }
    }
}

impl From<FilmGraph> for FilmRecord {
    fn from(graph: FilmGraph) -> Self {
        let film = graph.film;
        FilmRecord {
            film_id: film.film_id,
            name: film.name,
            description: film.description,
            genre: film.genre,
            duration: film.duration,
            amount: film.amount,
            slots: graph.slots.into_iter().map(SlotRecord::from).collect(),
        }
    }
}
