use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Part of the day a screening runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "show_category")]
pub enum ShowCategory {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl ShowCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowCategory::Morning => "Morning",
            ShowCategory::Afternoon => "Afternoon",
            ShowCategory::Evening => "Evening",
            ShowCategory::Night => "Night",
        }
    }
}

impl fmt::Display for ShowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(ShowCategory::Morning),
            "afternoon" => Ok(ShowCategory::Afternoon),
            "evening" => Ok(ShowCategory::Evening),
            "night" => Ok(ShowCategory::Night),
            other => Err(format!("unknown show category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Slot {
    pub slot_id: i32,
    pub film_id: i32,
    pub show_category: ShowCategory,
    pub slot_date: NaiveDate,
}
