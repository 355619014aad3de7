use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::cinemas::{CreateShowtimeRequest, ShowtimeList, ShowtimeSeats},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Showtime,
    response::ApiResponse,
    routes::params::ShowtimeQuery,
    services::{cinema_service, seat_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_showtimes).post(create_showtime))
        .route("/{id}", get(get_showtime).delete(delete_showtime))
        .route("/{id}/seats", get(showtime_seats))
}

#[utoipa::path(
    get,
    path = "/api/showtimes",
    params(ShowtimeQuery),
    responses(
        (status = 200, description = "Showtimes ordered by date and time", body = ApiResponse<ShowtimeList>)
    ),
    tag = "Showtimes"
)]
pub async fn list_showtimes(
    State(state): State<AppState>,
    Query(query): Query<ShowtimeQuery>,
) -> AppResult<Json<ApiResponse<ShowtimeList>>> {
    Ok(Json(cinema_service::list_showtimes(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}",
    params(("id" = Uuid, Path, description = "Showtime ID")),
    responses(
        (status = 200, description = "Showtime", body = ApiResponse<Showtime>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Showtimes"
)]
pub async fn get_showtime(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Showtime>>> {
    Ok(Json(cinema_service::get_showtime(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}/seats",
    params(("id" = Uuid, Path, description = "Showtime ID")),
    responses(
        (status = 200, description = "Seat layout with occupancy", body = ApiResponse<ShowtimeSeats>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Showtimes"
)]
pub async fn showtime_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ShowtimeSeats>>> {
    Ok(Json(seat_service::showtime_seats(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/showtimes",
    request_body = CreateShowtimeRequest,
    responses(
        (status = 201, description = "Showtime created", body = ApiResponse<Showtime>),
        (status = 409, description = "Hall already has a showtime in that slot"),
    ),
    security(("bearer_auth" = [])),
    tag = "Showtimes"
)]
pub async fn create_showtime(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShowtimeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Showtime>>)> {
    let resp = cinema_service::create_showtime(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/showtimes/{id}",
    params(("id" = Uuid, Path, description = "Showtime ID")),
    responses(
        (status = 200, description = "Showtime deleted"),
        (status = 404, description = "Showtime not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Showtimes"
)]
pub async fn delete_showtime(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(cinema_service::delete_showtime(&state, &user, id).await?))
}
