use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    dto::admin::DashboardStats,
    entity::{
        bookings::{Column as BookingCol, Entity as Bookings},
        movies::Entity as Movies,
        users::Entity as Users,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::BookingStatus,
    response::ApiResponse,
    state::AppState,
};

pub async fn dashboard_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;

    let movies = Movies::find().count(&state.orm).await?;
    let users = Users::find().count(&state.orm).await?;
    let bookings = Bookings::find().count(&state.orm).await?;
    let paid_bookings = Bookings::find()
        .filter(BookingCol::Status.eq(BookingStatus::Paid.as_str()))
        .count(&state.orm)
        .await?;

    let revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM bookings WHERE status = $1",
    )
    .bind(BookingStatus::Paid.as_str())
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::ok(
        "Stats",
        DashboardStats {
            movies,
            users,
            bookings,
            paid_bookings,
            revenue,
        },
    ))
}
