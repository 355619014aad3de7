use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Cinema, Hall, Movie, Showtime};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMovieRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "Category is required"))]
    pub category: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_minutes: i32,
    pub release_date: NaiveDate,
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[validate(url(message = "Poster URL is invalid"))]
    pub poster_url: Option<String>,
    #[validate(url(message = "Banner URL is invalid"))]
    pub banner_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateMovieRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Title is required"))]
    pub title: Option<String>,
    #[validate(custom(function = "crate::validation::not_blank", message = "Category is required"))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_minutes: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub director: Option<String>,
    pub actors: Option<Vec<String>>,
    #[validate(url(message = "Poster URL is invalid"))]
    pub poster_url: Option<String>,
    #[validate(url(message = "Banner URL is invalid"))]
    pub banner_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieList {
    pub items: Vec<Movie>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HallSchedule {
    pub hall: Hall,
    pub showtimes: Vec<Showtime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CinemaSchedule {
    pub cinema: Cinema,
    pub halls: Vec<HallSchedule>,
}

/// A movie with every cinema, hall and showtime it is scheduled in.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieDetail {
    pub movie: Movie,
    pub cinemas: Vec<CinemaSchedule>,
}
