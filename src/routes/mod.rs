use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cinemas;
pub mod doc;
pub mod health;
pub mod movies;
pub mod notifications;
pub mod params;
pub mod seats;
pub mod showtimes;
pub mod tickets;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/movies", movies::router())
        .nest("/cinemas", cinemas::router())
        .nest("/showtimes", showtimes::router())
        .nest("/seats", seats::router())
        .nest("/bookings", bookings::router())
        .nest("/tickets", tickets::router())
        .nest("/users", users::router())
        .nest("/notifications", notifications::router())
        .nest("/admin", admin::router())
}
