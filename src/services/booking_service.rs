use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::bookings::{BookingList, CreateBookingRequest, PayBookingRequest, UpdateBookingStatusRequest},
    entity::{
        booking_seats::{ActiveModel as SeatActive, Column as SeatCol, Entity as BookingSeats},
        bookings::{ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings, Model as BookingModel},
        showtimes::Entity as Showtimes,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{Booking, BookingStatus, PaymentMethod},
    response::ApiResponse,
    routes::params::{BookingListQuery, SortOrder},
    seating::SeatSelection,
    services::{notification_service, seat_service},
    state::AppState,
    validation::validated,
};

/// Place a hold on the requested seats. The booking starts `pending` and keeps
/// the seats until `hold_expires_at`; paying before then makes it final.
pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let payload = validated(payload)?;

    if let Some(key) = payload.idempotency_key.as_deref() {
        if let Some(existing) = find_by_idempotency_key(&state.orm, user.user_id, key).await? {
            return Ok(ApiResponse::ok("Booking already exists", Booking::try_from(existing)?));
        }
    }

    let now = Utc::now();
    let txn = state.orm.begin().await?;

    // Row lock on the showtime serialises concurrent holds for the same screening.
    let showtime = Showtimes::find_by_id(payload.showtime_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if showtime.show_date < now.date_naive() {
        return Err(AppError::BadRequest("Showtime has already passed".into()));
    }

    let ctx = seat_service::context_for(&txn, showtime).await?;
    seat_service::release_expired_holds(&txn, Some(ctx.showtime.id), now).await?;
    let occupied = seat_service::occupied_seats(&txn, ctx.showtime.id, now).await?;

    let selection = SeatSelection::from_labels(&ctx.hall.seat_map, &occupied, &payload.seats)?;
    let quote = selection.quote(&ctx.hall.seat_map)?;

    let seats_json = serde_json::to_value(&quote.seats).map_err(anyhow::Error::from)?;
    let booking_id = Uuid::new_v4();
    let hold_expires_at = now + Duration::minutes(state.config.seat_hold_minutes);

    let booking = BookingActive {
        id: Set(booking_id),
        user_id: Set(user.user_id),
        showtime_id: Set(Some(ctx.showtime.id)),
        movie_id: Set(Some(ctx.movie.id)),
        movie_title: Set(ctx.movie.title.clone()),
        cinema_name: Set(ctx.cinema.name.clone()),
        hall_name: Set(ctx.hall.name.clone()),
        show_date: Set(ctx.showtime.show_date),
        show_time: Set(ctx.showtime.show_time),
        seats: Set(seats_json),
        total_amount: Set(quote.total),
        status: Set(BookingStatus::Pending.as_str().into()),
        payment_method: Set(None),
        idempotency_key: Set(payload.idempotency_key.clone()),
        hold_expires_at: Set(hold_expires_at.into()),
        paid_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Booking was already submitted"))?;

    let rows: Vec<SeatActive> = quote
        .seats
        .iter()
        .map(|seat| SeatActive {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking_id),
            showtime_id: Set(ctx.showtime.id),
            seat_label: Set(seat.label.clone()),
            seat_type: Set(seat.seat_type.as_str().into()),
            price: Set(seat.price),
            created_at: NotSet,
        })
        .collect();

    BookingSeats::insert_many(rows)
        .exec(&txn)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "One or more seats were just taken"))?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        showtime_id = %ctx.showtime.id,
        seats = quote.seats.len(),
        total = quote.total,
        "booking held"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "booking_created",
        "bookings",
        serde_json::json!({ "booking_id": booking.id, "total": quote.total }),
    )
    .await;

    Ok(ApiResponse::ok("Seats held", Booking::try_from(booking)?))
}

async fn find_by_idempotency_key<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    key: &str,
) -> AppResult<Option<BookingModel>> {
    Ok(Bookings::find()
        .filter(BookingCol::UserId.eq(user_id))
        .filter(BookingCol::IdempotencyKey.eq(key))
        .one(conn)
        .await?)
}

pub async fn get_booking(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Booking>> {
    let booking = Bookings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, booking.user_id)?;
    Ok(ApiResponse::ok("OK", Booking::try_from(booking)?))
}

/// The caller's own bookings, newest first by default.
pub async fn list_my_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    list_bookings(state, Some(user.user_id), query).await
}

pub async fn list_all_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    ensure_admin(user)?;
    list_bookings(state, None, query).await
}

pub async fn list_user_bookings(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    ensure_owner_or_admin(user, user_id)?;
    list_bookings(state, Some(user_id), query).await
}

async fn list_bookings(
    state: &AppState,
    owner: Option<Uuid>,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(owner) = owner {
        condition = condition.add(BookingCol::UserId.eq(owner));
    }
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status: BookingStatus = status.parse()?;
        condition = condition.add(BookingCol::Status.eq(status.as_str()));
    }

    let mut finder = Bookings::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(BookingCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(BookingCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Booking::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::paged("Bookings", BookingList { items }, page, limit, total))
}

/// Simulated checkout: records the payment method and turns the hold into a sale.
pub async fn pay_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: PayBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let txn = state.orm.begin().await?;

    let booking = Bookings::find()
        .filter(
            Condition::all()
                .add(BookingCol::Id.eq(id))
                .add(BookingCol::UserId.eq(user.user_id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    // Read the clock only once the row lock is ours; the wait counts against the hold.
    let now = Utc::now();

    match booking.status.parse::<BookingStatus>()? {
        BookingStatus::Pending => {}
        BookingStatus::Paid => return Err(AppError::BadRequest("Booking already paid".into())),
        BookingStatus::Cancelled | BookingStatus::Expired => {
            return Err(AppError::BadRequest("Booking is no longer active".into()));
        }
    }

    if booking.hold_expires_at.with_timezone(&Utc) <= now {
        let showtime_id = booking.showtime_id;
        release_booking(&txn, booking, BookingStatus::Expired).await?;
        txn.commit().await?;
        tracing::info!(booking_id = %id, showtime_id = ?showtime_id, "payment after hold expiry");
        return Err(AppError::BadRequest("Seat hold expired".into()));
    }

    let mut active: BookingActive = booking.into();
    active.status = Set(BookingStatus::Paid.as_str().into());
    active.payment_method = Set(Some(payload.payment_method.as_str().into()));
    active.paid_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let booking = active.update(&txn).await?;

    notification_service::notify(
        &txn,
        booking.user_id,
        notification_service::KIND_TICKET,
        "Ticket confirmed",
        format!(
            "Your ticket for {} on {} at {} is confirmed.",
            booking.movie_title,
            booking.show_date,
            booking.show_time.format("%H:%M")
        ),
        Some(booking.id),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(booking_id = %booking.id, method = payload.payment_method.as_str(), "booking paid");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "booking_paid",
        "bookings",
        serde_json::json!({ "booking_id": booking.id, "method": payload.payment_method.as_str() }),
    )
    .await;

    Ok(ApiResponse::ok("Payment recorded", Booking::try_from(booking)?))
}

/// Cancel a pending or paid booking and free its seats.
pub async fn cancel_booking(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Booking>> {
    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, booking.user_id)?;

    match booking.status.parse::<BookingStatus>()? {
        BookingStatus::Pending | BookingStatus::Paid => {}
        BookingStatus::Cancelled => return Err(AppError::BadRequest("Booking already cancelled".into())),
        BookingStatus::Expired => return Err(AppError::BadRequest("Booking is no longer active".into())),
    }

    let booking = release_booking(&txn, booking, BookingStatus::Cancelled).await?;

    notification_service::notify(
        &txn,
        booking.user_id,
        notification_service::KIND_BOOKING,
        "Booking cancelled",
        format!("Your booking for {} has been cancelled.", booking.movie_title),
        Some(booking.id),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(booking_id = %booking.id, "booking cancelled");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "booking_cancelled",
        "bookings",
        serde_json::json!({ "booking_id": booking.id }),
    )
    .await;

    Ok(ApiResponse::ok("Booking cancelled", Booking::try_from(booking)?))
}

/// Admin override from the dashboard. Allowed moves: `pending -> paid` (cash at the
/// counter), `pending | paid -> cancelled` and `pending -> expired`.
pub async fn update_booking_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBookingStatusRequest,
) -> AppResult<ApiResponse<Booking>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let now = Utc::now();
    let from = booking.status.parse::<BookingStatus>()?;
    let to = payload.status;

    let booking = match (from, to) {
        (BookingStatus::Pending, BookingStatus::Paid) => {
            let mut active: BookingActive = booking.into();
            active.status = Set(BookingStatus::Paid.as_str().into());
            active.payment_method = Set(Some(PaymentMethod::Cash.as_str().into()));
            active.paid_at = Set(Some(now.into()));
            active.updated_at = Set(now.into());
            let booking = active.update(&txn).await?;
            notification_service::notify(
                &txn,
                booking.user_id,
                notification_service::KIND_TICKET,
                "Ticket confirmed",
                format!("Your booking for {} was confirmed at the counter.", booking.movie_title),
                Some(booking.id),
            )
            .await?;
            booking
        }
        (BookingStatus::Pending | BookingStatus::Paid, BookingStatus::Cancelled) => {
            let booking = release_booking(&txn, booking, BookingStatus::Cancelled).await?;
            notification_service::notify(
                &txn,
                booking.user_id,
                notification_service::KIND_BOOKING,
                "Booking cancelled",
                format!("Your booking for {} has been cancelled.", booking.movie_title),
                Some(booking.id),
            )
            .await?;
            booking
        }
        (BookingStatus::Pending, BookingStatus::Expired) => {
            release_booking(&txn, booking, BookingStatus::Expired).await?
        }
        (from, to) => {
            return Err(AppError::BadRequest(format!("Cannot change a {from} booking to {to}")));
        }
    };

    txn.commit().await?;

    tracing::info!(booking_id = %booking.id, %from, %to, "booking status changed by admin");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "booking_status_changed",
        "bookings",
        serde_json::json!({ "booking_id": booking.id, "from": from.as_str(), "to": to.as_str() }),
    )
    .await;

    Ok(ApiResponse::ok("Booking updated", Booking::try_from(booking)?))
}

/// Drop the booking's seat rows and move it to `status`.
async fn release_booking<C: ConnectionTrait>(
    conn: &C,
    booking: BookingModel,
    status: BookingStatus,
) -> AppResult<BookingModel> {
    BookingSeats::delete_many()
        .filter(SeatCol::BookingId.eq(booking.id))
        .exec(conn)
        .await?;

    let mut active: BookingActive = booking.into();
    active.status = Set(status.as_str().into());
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}
