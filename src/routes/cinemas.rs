use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cinemas::{CinemaList, CinemaWithHalls, CreateCinemaRequest, CreateHallRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Cinema, Hall},
    response::ApiResponse,
    services::cinema_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cinemas).post(create_cinema))
        .route("/{id}", get(get_cinema))
        .route("/{id}/halls", post(add_hall))
}

#[utoipa::path(
    get,
    path = "/api/cinemas",
    responses(
        (status = 200, description = "Cinemas with their halls", body = ApiResponse<CinemaList>)
    ),
    tag = "Cinemas"
)]
pub async fn list_cinemas(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CinemaList>>> {
    Ok(Json(cinema_service::list_cinemas(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/cinemas/{id}",
    params(("id" = Uuid, Path, description = "Cinema ID")),
    responses(
        (status = 200, description = "Cinema with halls", body = ApiResponse<CinemaWithHalls>),
        (status = 404, description = "Cinema not found"),
    ),
    tag = "Cinemas"
)]
pub async fn get_cinema(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CinemaWithHalls>>> {
    Ok(Json(cinema_service::get_cinema(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/cinemas",
    request_body = CreateCinemaRequest,
    responses(
        (status = 201, description = "Cinema created", body = ApiResponse<Cinema>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cinemas"
)]
pub async fn create_cinema(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCinemaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cinema>>)> {
    let resp = cinema_service::create_cinema(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/cinemas/{id}/halls",
    params(("id" = Uuid, Path, description = "Cinema ID")),
    request_body = CreateHallRequest,
    responses(
        (status = 201, description = "Hall created", body = ApiResponse<Hall>),
        (status = 400, description = "Invalid seat map"),
        (status = 409, description = "Hall name taken in this cinema"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cinemas"
)]
pub async fn add_hall(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateHallRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Hall>>)> {
    let resp = cinema_service::add_hall(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
