use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{bookings::QuoteRequest, cinemas::ShowtimeSeats},
    error::AppResult,
    response::ApiResponse,
    routes::params::SeatQuery,
    seating::PriceQuote,
    services::seat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/{movie_id}", get(seats_for_movie))
}

#[utoipa::path(
    get,
    path = "/api/seats/{movie_id}",
    params(
        ("movie_id" = Uuid, Path, description = "Movie ID"),
        SeatQuery,
    ),
    responses(
        (status = 200, description = "Seat layout for the selected showtime", body = ApiResponse<ShowtimeSeats>),
        (status = 400, description = "No showtime matches the selection"),
    ),
    tag = "Seats"
)]
pub async fn seats_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
    Query(query): Query<SeatQuery>,
) -> AppResult<Json<ApiResponse<ShowtimeSeats>>> {
    Ok(Json(seat_service::seats_for_movie(&state, movie_id, query).await?))
}

#[utoipa::path(
    post,
    path = "/api/seats/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Per-seat prices and total", body = ApiResponse<PriceQuote>),
        (status = 400, description = "Unknown, duplicate or too many seats"),
        (status = 409, description = "A seat is already taken"),
    ),
    tag = "Seats"
)]
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<PriceQuote>>> {
    Ok(Json(seat_service::quote(&state, payload).await?))
}
