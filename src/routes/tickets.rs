use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::bookings::TicketList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Ticket,
    response::ApiResponse,
    routes::params::Pagination,
    services::ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_tickets))
        .route("/{id}", get(get_ticket))
        .route("/movie/{movie_id}", get(tickets_for_movie))
        .route("/user/{user_id}", get(tickets_for_user))
}

#[utoipa::path(
    get,
    path = "/api/tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
    ),
    responses(
        (status = 200, description = "Caller's paid tickets", body = ApiResponse<TicketList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn my_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    Ok(Json(ticket_service::my_tickets(&state, &user, pagination).await?))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket (booking) ID")),
    responses(
        (status = 200, description = "Ticket", body = ApiResponse<Ticket>),
        (status = 404, description = "No paid booking with that id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    Ok(Json(ticket_service::get_ticket(&state, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/tickets/movie/{movie_id}",
    params(
        ("movie_id" = Uuid, Path, description = "Movie ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
    ),
    responses(
        (status = 200, description = "Tickets sold for a movie", body = ApiResponse<TicketList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn tickets_for_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(movie_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    Ok(Json(ticket_service::tickets_for_movie(&state, &user, movie_id, pagination).await?))
}

#[utoipa::path(
    get,
    path = "/api/tickets/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
    ),
    responses(
        (status = 200, description = "Tickets owned by a user", body = ApiResponse<TicketList>),
        (status = 403, description = "Neither the owner nor an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn tickets_for_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    Ok(Json(ticket_service::tickets_for_user(&state, &user, user_id, pagination).await?))
}
