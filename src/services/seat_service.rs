use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    dto::{bookings::QuoteRequest, cinemas::{ShowtimeSeats, parse_show_time}},
    entity::{
        booking_seats::{Column as SeatCol, Entity as BookingSeats},
        bookings::{Column as BookingCol, Entity as Bookings},
        cinemas::{Entity as Cinemas, Model as CinemaModel},
        halls::Entity as Halls,
        movies::{Entity as Movies, Model as MovieModel},
        showtimes::{Column as ShowtimeCol, Entity as Showtimes, Model as ShowtimeModel},
    },
    error::{AppError, AppResult},
    models::{BookingStatus, Cinema, Hall, Showtime},
    response::ApiResponse,
    routes::params::SeatQuery,
    seating::{PriceQuote, SeatId, SeatSelection},
    state::AppState,
};

/// A showtime together with the movie, hall and cinema it belongs to.
pub struct ShowtimeContext {
    pub showtime: ShowtimeModel,
    pub movie: MovieModel,
    pub hall: Hall,
    pub cinema: CinemaModel,
}

pub async fn load_showtime_context<C: ConnectionTrait>(
    conn: &C,
    showtime_id: Uuid,
) -> AppResult<ShowtimeContext> {
    let showtime = Showtimes::find_by_id(showtime_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    context_for(conn, showtime).await
}

pub async fn context_for<C: ConnectionTrait>(conn: &C, showtime: ShowtimeModel) -> AppResult<ShowtimeContext> {
    let movie = Movies::find_by_id(showtime.movie_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let hall = Halls::find_by_id(showtime.hall_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let hall = Hall::try_from(hall)?;
    let cinema = Cinemas::find_by_id(hall.cinema_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ShowtimeContext {
        showtime,
        movie,
        hall,
        cinema,
    })
}

/// Seats that are sold, or held by a pending booking whose hold has not run out.
pub async fn occupied_seats<C: ConnectionTrait>(
    conn: &C,
    showtime_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<HashSet<SeatId>> {
    let rows = BookingSeats::find()
        .filter(SeatCol::ShowtimeId.eq(showtime_id))
        .find_also_related(Bookings)
        .all(conn)
        .await?;

    let occupied = rows
        .into_iter()
        .filter(|(_, booking)| {
            booking.as_ref().is_some_and(|b| {
                b.status == BookingStatus::Paid.as_str()
                    || (b.status == BookingStatus::Pending.as_str()
                        && b.hold_expires_at.with_timezone(&Utc) > now)
            })
        })
        .filter_map(|(seat, _)| seat.seat_label.parse::<SeatId>().ok())
        .collect();

    Ok(occupied)
}

/// Expire pending bookings whose hold ran out and free their seats. Scoped to one
/// showtime when `showtime_id` is given, otherwise sweeps everything.
///
/// The status flip comes first and only the ids it actually moved lose their seat
/// rows. A booking that a concurrent payment holds locked is re-checked by Postgres
/// once that lock is released, so a hold paid in time keeps its seats. Run this
/// inside a transaction so the flip and the seat delete commit together.
pub async fn release_expired_holds<C: ConnectionTrait>(
    conn: &C,
    showtime_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let mut update = Bookings::update_many()
        .col_expr(BookingCol::Status, Expr::value(BookingStatus::Expired.as_str()))
        .col_expr(BookingCol::UpdatedAt, Expr::value(now.fixed_offset()))
        .filter(BookingCol::Status.eq(BookingStatus::Pending.as_str()))
        .filter(BookingCol::HoldExpiresAt.lte(now));
    if let Some(showtime_id) = showtime_id {
        update = update.filter(BookingCol::ShowtimeId.eq(showtime_id));
    }
    let expired: Vec<Uuid> = update
        .exec_with_returning(conn)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    if expired.is_empty() {
        return Ok(0);
    }

    BookingSeats::delete_many()
        .filter(SeatCol::BookingId.is_in(expired.clone()))
        .exec(conn)
        .await?;

    Ok(expired.len() as u64)
}

async fn seats_view(state: &AppState, ctx: ShowtimeContext) -> AppResult<ShowtimeSeats> {
    let occupied = occupied_seats(&state.orm, ctx.showtime.id, Utc::now()).await?;
    let layout = ctx.hall.seat_map.layout(&occupied, &HashSet::new());
    Ok(ShowtimeSeats {
        showtime: Showtime::from(ctx.showtime),
        movie_title: ctx.movie.title,
        cinema: Cinema::from(ctx.cinema),
        hall_id: ctx.hall.id,
        hall_name: ctx.hall.name,
        hall_type: ctx.hall.hall_type,
        layout,
    })
}

pub async fn showtime_seats(state: &AppState, showtime_id: Uuid) -> AppResult<ApiResponse<ShowtimeSeats>> {
    let ctx = load_showtime_context(&state.orm, showtime_id).await?;
    Ok(ApiResponse::ok("Seats", seats_view(state, ctx).await?))
}

/// Seat picker lookup by movie plus cinema / hall / date / time.
pub async fn seats_for_movie(
    state: &AppState,
    movie_id: Uuid,
    query: SeatQuery,
) -> AppResult<ApiResponse<ShowtimeSeats>> {
    let show_time = parse_show_time(&query.time).map_err(AppError::BadRequest)?;

    let showtime = Showtimes::find()
        .filter(ShowtimeCol::MovieId.eq(movie_id))
        .filter(ShowtimeCol::HallId.eq(query.hall))
        .filter(ShowtimeCol::ShowDate.eq(query.date))
        .filter(ShowtimeCol::ShowTime.eq(show_time))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Selected showtime not available".into()))?;

    let ctx = context_for(&state.orm, showtime).await?;
    if ctx.cinema.id != query.cinema {
        return Err(AppError::BadRequest("Hall does not belong to this cinema".into()));
    }

    Ok(ApiResponse::ok("Seats", seats_view(state, ctx).await?))
}

/// Price a prospective selection without holding anything.
pub async fn quote(state: &AppState, payload: QuoteRequest) -> AppResult<ApiResponse<PriceQuote>> {
    let ctx = load_showtime_context(&state.orm, payload.showtime_id).await?;
    let occupied = occupied_seats(&state.orm, payload.showtime_id, Utc::now()).await?;
    let selection = SeatSelection::from_labels(&ctx.hall.seat_map, &occupied, &payload.seats)?;
    let quote = selection.quote(&ctx.hall.seat_map)?;
    Ok(ApiResponse::ok("Quote", quote))
}
