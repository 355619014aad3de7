use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::bookings::TicketList,
    entity::bookings::{Column as BookingCol, Entity as Bookings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{Booking, BookingStatus, Ticket},
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
};

/// Tickets are paid bookings; held, cancelled and expired ones never show up here.
async fn list_tickets(
    state: &AppState,
    condition: Condition,
    pagination: Pagination,
) -> AppResult<ApiResponse<TicketList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Bookings::find()
        .filter(condition.add(BookingCol::Status.eq(BookingStatus::Paid.as_str())))
        .order_by_desc(BookingCol::PaidAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| Booking::try_from(model).map(Ticket::from))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::paged("Tickets", TicketList { items }, page, limit, total))
}

pub async fn my_tickets(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TicketList>> {
    list_tickets(state, Condition::all().add(BookingCol::UserId.eq(user.user_id)), pagination).await
}

pub async fn tickets_for_user(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<TicketList>> {
    ensure_owner_or_admin(user, user_id)?;
    list_tickets(state, Condition::all().add(BookingCol::UserId.eq(user_id)), pagination).await
}

pub async fn tickets_for_movie(
    state: &AppState,
    user: &AuthUser,
    movie_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<TicketList>> {
    ensure_admin(user)?;
    list_tickets(state, Condition::all().add(BookingCol::MovieId.eq(movie_id)), pagination).await
}

pub async fn get_ticket(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Ticket>> {
    let booking = Bookings::find_by_id(id)
        .filter(BookingCol::Status.eq(BookingStatus::Paid.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, booking.user_id)?;
    Ok(ApiResponse::ok("Ticket", Ticket::from(Booking::try_from(booking)?)))
}
