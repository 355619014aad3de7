use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    dto::notifications::NotificationList,
    entity::notifications::{ActiveModel, Column, Entity as Notifications},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::ApiResponse,
    state::AppState,
};

pub const KIND_TICKET: &str = "ticket";
pub const KIND_BOOKING: &str = "booking";

/// Queue a notification for `user_id`; runs inside whatever transaction `conn` is.
pub async fn notify<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    kind: &str,
    title: &str,
    message: String,
    booking_id: Option<Uuid>,
) -> AppResult<()> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind.to_string()),
        title: Set(title.to_string()),
        message: Set(message),
        booking_id: Set(booking_id),
        read: Set(false),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(())
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let items: Vec<Notification> = Notifications::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    let unread = Notifications::find()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user.user_id))
                .add(Column::Read.eq(false)),
        )
        .count(&state.orm)
        .await?;

    Ok(ApiResponse::ok("Notifications", NotificationList { items, unread }))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let existing = Notifications::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.read = Set(true);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::ok("Marked as read", Notification::from(updated)))
}

pub async fn mark_all_read(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Notifications::update_many()
        .col_expr(Column::Read, Expr::value(true))
        .filter(Column::UserId.eq(user.user_id))
        .filter(Column::Read.eq(false))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::ok(
        "Marked as read",
        serde_json::json!({ "updated": result.rows_affected }),
    ))
}

pub async fn clear_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Notifications::delete_many()
        .filter(Column::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::ok(
        "Cleared",
        serde_json::json!({ "deleted": result.rows_affected }),
    ))
}
