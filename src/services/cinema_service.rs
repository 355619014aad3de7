use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::cinemas::{
        CinemaList, CinemaWithHalls, CreateCinemaRequest, CreateHallRequest, CreateShowtimeRequest,
        ShowtimeList,
    },
    entity::{
        cinemas::{ActiveModel as CinemaActive, Entity as Cinemas, Column as CinemaCol},
        halls::{ActiveModel as HallActive, Column as HallCol, Entity as Halls},
        movies::Entity as Movies,
        showtimes::{ActiveModel as ShowtimeActive, Column as ShowtimeCol, Entity as Showtimes},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Cinema, Hall, Showtime},
    response::ApiResponse,
    routes::params::ShowtimeQuery,
    state::AppState,
    validation::validated,
};

pub async fn list_cinemas(state: &AppState) -> AppResult<ApiResponse<CinemaList>> {
    let cinemas = Cinemas::find()
        .order_by_asc(CinemaCol::Name)
        .all(&state.orm)
        .await?;

    let mut halls_by_cinema: HashMap<Uuid, Vec<Hall>> = HashMap::new();
    let halls = Halls::find()
        .order_by_asc(HallCol::Name)
        .all(&state.orm)
        .await?;
    for hall in halls {
        let hall = Hall::try_from(hall)?;
        halls_by_cinema.entry(hall.cinema_id).or_default().push(hall);
    }

    let items = cinemas
        .into_iter()
        .map(|cinema| CinemaWithHalls {
            halls: halls_by_cinema.remove(&cinema.id).unwrap_or_default(),
            cinema: Cinema::from(cinema),
        })
        .collect();

    Ok(ApiResponse::ok("Cinemas", CinemaList { items }))
}

pub async fn get_cinema(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CinemaWithHalls>> {
    let cinema = Cinemas::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let halls = Halls::find()
        .filter(HallCol::CinemaId.eq(id))
        .order_by_asc(HallCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Hall::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::ok(
        "Cinema",
        CinemaWithHalls {
            cinema: Cinema::from(cinema),
            halls,
        },
    ))
}

pub async fn create_cinema(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCinemaRequest,
) -> AppResult<ApiResponse<Cinema>> {
    ensure_admin(user)?;
    let payload = validated(payload)?;

    let cinema = CinemaActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        address: Set(payload.address.trim().to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "A cinema with this name already exists"))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cinema_create",
        "cinemas",
        serde_json::json!({ "cinema_id": cinema.id }),
    )
    .await;

    Ok(ApiResponse::ok("Cinema created", Cinema::from(cinema)))
}

pub async fn add_hall(
    state: &AppState,
    user: &AuthUser,
    cinema_id: Uuid,
    payload: CreateHallRequest,
) -> AppResult<ApiResponse<Hall>> {
    ensure_admin(user)?;
    let payload = validated(payload)?;
    payload.seat_map.validate()?;

    if Cinemas::find_by_id(cinema_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let seat_map = serde_json::to_value(&payload.seat_map)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let hall = HallActive {
        id: Set(Uuid::new_v4()),
        cinema_id: Set(cinema_id),
        name: Set(payload.name.trim().to_string()),
        hall_type: Set(payload.hall_type),
        seat_map: Set(seat_map),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "This cinema already has a hall with that name"))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "hall_create",
        "halls",
        serde_json::json!({ "hall_id": hall.id, "cinema_id": cinema_id }),
    )
    .await;

    Ok(ApiResponse::ok("Hall created", Hall::try_from(hall)?))
}

pub async fn list_showtimes(state: &AppState, query: ShowtimeQuery) -> AppResult<ApiResponse<ShowtimeList>> {
    let mut finder = Showtimes::find();
    if let Some(movie_id) = query.movie_id {
        finder = finder.filter(ShowtimeCol::MovieId.eq(movie_id));
    }
    if let Some(hall_id) = query.hall_id {
        finder = finder.filter(ShowtimeCol::HallId.eq(hall_id));
    }
    if let Some(date) = query.date {
        finder = finder.filter(ShowtimeCol::ShowDate.eq(date));
    }

    let items = finder
        .order_by_asc(ShowtimeCol::ShowDate)
        .order_by_asc(ShowtimeCol::ShowTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Showtime::from)
        .collect();

    Ok(ApiResponse::ok("Showtimes", ShowtimeList { items }))
}

pub async fn get_showtime(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Showtime>> {
    let showtime = Showtimes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Showtime", Showtime::from(showtime)))
}

pub async fn create_showtime(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShowtimeRequest,
) -> AppResult<ApiResponse<Showtime>> {
    ensure_admin(user)?;

    if Movies::find_by_id(payload.movie_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest("movie not found".into()));
    }
    if Halls::find_by_id(payload.hall_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest("hall not found".into()));
    }

    let showtime = ShowtimeActive {
        id: Set(Uuid::new_v4()),
        movie_id: Set(payload.movie_id),
        hall_id: Set(payload.hall_id),
        show_date: Set(payload.show_date),
        show_time: Set(payload.show_time),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "The hall is already booked for that slot"))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "showtime_create",
        "showtimes",
        serde_json::json!({ "showtime_id": showtime.id }),
    )
    .await;

    Ok(ApiResponse::ok("Showtime created", Showtime::from(showtime)))
}

pub async fn delete_showtime(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Showtimes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "showtime_delete",
        "showtimes",
        serde_json::json!({ "showtime_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
