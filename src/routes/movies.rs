use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::movies::{CreateMovieRequest, MovieDetail, MovieList, UpdateMovieRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Movie,
    response::ApiResponse,
    routes::params::{MovieQuery, Pagination, ScreeningStatus},
    services::movie_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/now-showing", get(now_showing))
        .route("/coming-soon", get(coming_soon))
        .route("/{id}", get(get_movie).put(update_movie).delete(delete_movie))
}

#[utoipa::path(
    get,
    path = "/api/movies",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
        ("q" = Option<String>, Query, description = "Search title or director"),
        ("category" = Option<String>, Query, description = "Category, case-insensitive"),
        ("status" = Option<ScreeningStatus>, Query, description = "now_showing or coming_soon"),
        ("sort_by" = Option<String>, Query, description = "release_date, title or created_at"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List movies", body = ApiResponse<MovieList>)
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieQuery>,
) -> AppResult<Json<ApiResponse<MovieList>>> {
    Ok(Json(movie_service::list_movies(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/movies/now-showing",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
    ),
    responses(
        (status = 200, description = "Movies released on or before today", body = ApiResponse<MovieList>)
    ),
    tag = "Movies"
)]
pub async fn now_showing(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MovieList>>> {
    let resp = movie_service::list_by_status(&state, ScreeningStatus::NowShowing, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/movies/coming-soon",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
    ),
    responses(
        (status = 200, description = "Movies released after today", body = ApiResponse<MovieList>)
    ),
    tag = "Movies"
)]
pub async fn coming_soon(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MovieList>>> {
    let resp = movie_service::list_by_status(&state, ScreeningStatus::ComingSoon, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie with its cinemas, halls and showtimes", body = ApiResponse<MovieDetail>),
        (status = 404, description = "Movie not found"),
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MovieDetail>>> {
    Ok(Json(movie_service::get_movie_detail(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<Movie>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Title already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Movie>>)> {
    let resp = movie_service::create_movie(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<Movie>),
        (status = 404, description = "Movie not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovieRequest>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    Ok(Json(movie_service::update_movie(&state, &user, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie deleted"),
        (status = 404, description = "Movie not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(movie_service::delete_movie(&state, &user, id).await?))
}
