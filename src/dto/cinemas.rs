use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{Cinema, Hall, Showtime},
    seating::{SeatLayout, SeatMap},
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCinemaRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateHallRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default = "default_hall_type")]
    pub hall_type: String,
    pub seat_map: SeatMap,
}

fn default_hall_type() -> String {
    "2D".to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CinemaWithHalls {
    pub cinema: Cinema,
    pub halls: Vec<Hall>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CinemaList {
    pub items: Vec<CinemaWithHalls>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShowtimeRequest {
    pub movie_id: Uuid,
    pub hall_id: Uuid,
    pub show_date: NaiveDate,
    #[schema(value_type = String, example = "19:30")]
    #[serde(deserialize_with = "crate::dto::cinemas::de_show_time")]
    pub show_time: NaiveTime,
}

/// Accepts both `HH:MM` (what the client sends) and `HH:MM:SS`.
pub fn de_show_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_show_time(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_show_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{raw}', expected HH:MM"))
}

/// Everything the seat picker needs for one showtime.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShowtimeSeats {
    pub showtime: Showtime,
    pub movie_title: String,
    pub cinema: Cinema,
    pub hall_id: Uuid,
    pub hall_name: String,
    pub hall_type: String,
    pub layout: SeatLayout,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowtimeList {
    pub items: Vec<Showtime>,
}
