use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: i32,
    pub slot_id: i32,
    pub row: i32,
    pub number: i32,
    pub is_reserved: bool,
}
