use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit,
    dto::movies::{
        CinemaSchedule, CreateMovieRequest, HallSchedule, MovieDetail, MovieList, UpdateMovieRequest,
    },
    entity::{
        cinemas::{Column as CinemaCol, Entity as Cinemas},
        halls::{Column as HallCol, Entity as Halls},
        movies::{ActiveModel, Column, Entity as Movies},
        showtimes::{Column as ShowtimeCol, Entity as Showtimes},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Cinema, Hall, Movie, Showtime},
    response::ApiResponse,
    routes::params::{MovieQuery, MovieSortBy, Pagination, ScreeningStatus, SortOrder},
    state::AppState,
    validation::validated,
};

pub async fn list_movies(state: &AppState, query: MovieQuery) -> AppResult<ApiResponse<MovieList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Title).ilike(pattern.clone()))
                .add(Expr::col(Column::Director).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Category).ilike(category));
    }

    let today = Utc::now().date_naive();
    match query.status {
        Some(ScreeningStatus::NowShowing) => {
            condition = condition.add(Column::ReleaseDate.lte(today));
        }
        Some(ScreeningStatus::ComingSoon) => {
            condition = condition.add(Column::ReleaseDate.gt(today));
        }
        None => {}
    }

    let sort_by = query.sort_by.unwrap_or(MovieSortBy::ReleaseDate);
    let sort_order = query.sort_order.unwrap_or(match query.status {
        Some(ScreeningStatus::ComingSoon) => SortOrder::Asc,
        _ => SortOrder::Desc,
    });
    let sort_col = match sort_by {
        MovieSortBy::ReleaseDate => Column::ReleaseDate,
        MovieSortBy::Title => Column::Title,
        MovieSortBy::CreatedAt => Column::CreatedAt,
    };

    let mut finder = Movies::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Movie::from)
        .collect();

    Ok(ApiResponse::paged("Movies", MovieList { items }, page, limit, total))
}

/// Shortcut behind `/movies/now-showing` and `/movies/coming-soon`.
pub async fn list_by_status(
    state: &AppState,
    status: ScreeningStatus,
    pagination: Pagination,
) -> AppResult<ApiResponse<MovieList>> {
    let query = MovieQuery {
        page: pagination.page,
        per_page: pagination.per_page,
        status: Some(status),
        ..MovieQuery::default()
    };
    list_movies(state, query).await
}

pub async fn get_movie(state: &AppState, id: Uuid) -> AppResult<Movie> {
    Movies::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Movie::from)
        .ok_or(AppError::NotFound)
}

pub async fn get_movie_detail(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MovieDetail>> {
    let movie = get_movie(state, id).await?;

    let showtimes: Vec<Showtime> = Showtimes::find()
        .filter(ShowtimeCol::MovieId.eq(id))
        .order_by_asc(ShowtimeCol::ShowDate)
        .order_by_asc(ShowtimeCol::ShowTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Showtime::from)
        .collect();

    let mut hall_ids: Vec<Uuid> = showtimes.iter().map(|s| s.hall_id).collect();
    hall_ids.sort();
    hall_ids.dedup();

    let halls = Halls::find()
        .filter(HallCol::Id.is_in(hall_ids))
        .order_by_asc(HallCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Hall::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    let mut cinema_ids: Vec<Uuid> = halls.iter().map(|h| h.cinema_id).collect();
    cinema_ids.sort();
    cinema_ids.dedup();

    let cinemas = Cinemas::find()
        .filter(CinemaCol::Id.is_in(cinema_ids))
        .order_by_asc(CinemaCol::Name)
        .all(&state.orm)
        .await?;

    let mut by_hall: HashMap<Uuid, Vec<Showtime>> = HashMap::new();
    for showtime in showtimes {
        by_hall.entry(showtime.hall_id).or_default().push(showtime);
    }

    let mut by_cinema: HashMap<Uuid, Vec<HallSchedule>> = HashMap::new();
    for hall in halls {
        let showtimes = by_hall.remove(&hall.id).unwrap_or_default();
        by_cinema
            .entry(hall.cinema_id)
            .or_default()
            .push(HallSchedule { hall, showtimes });
    }

    let cinemas = cinemas
        .into_iter()
        .map(|cinema| CinemaSchedule {
            halls: by_cinema.remove(&cinema.id).unwrap_or_default(),
            cinema: Cinema::from(cinema),
        })
        .collect();

    Ok(ApiResponse::ok("Movie", MovieDetail { movie, cinemas }))
}

pub async fn create_movie(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMovieRequest,
) -> AppResult<ApiResponse<Movie>> {
    ensure_admin(user)?;
    let payload = validated(payload)?;

    let movie = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title.trim().to_string()),
        category: Set(payload.category.trim().to_string()),
        description: Set(payload.description),
        duration_minutes: Set(payload.duration_minutes),
        release_date: Set(payload.release_date),
        director: Set(payload.director),
        actors: Set(serde_json::json!(payload.actors)),
        poster_url: Set(payload.poster_url),
        banner_url: Set(payload.banner_url),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "A movie with this title already exists"))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "movie_create",
        "movies",
        serde_json::json!({ "movie_id": movie.id }),
    )
    .await;

    Ok(ApiResponse::ok("Movie created", Movie::from(movie)))
}

pub async fn update_movie(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMovieRequest,
) -> AppResult<ApiResponse<Movie>> {
    ensure_admin(user)?;
    let payload = validated(payload)?;

    let existing = Movies::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(category) = payload.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(duration) = payload.duration_minutes {
        active.duration_minutes = Set(duration);
    }
    if let Some(release_date) = payload.release_date {
        active.release_date = Set(release_date);
    }
    if let Some(director) = payload.director {
        active.director = Set(Some(director));
    }
    if let Some(actors) = payload.actors {
        active.actors = Set(serde_json::json!(actors));
    }
    if let Some(poster_url) = payload.poster_url {
        active.poster_url = Set(Some(poster_url));
    }
    if let Some(banner_url) = payload.banner_url {
        active.banner_url = Set(Some(banner_url));
    }

    let movie = active
        .update(&state.orm)
        .await
        .map_err(|err| AppError::conflict_on_unique(err, "A movie with this title already exists"))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "movie_update",
        "movies",
        serde_json::json!({ "movie_id": movie.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", Movie::from(movie)))
}

/// Deleting a movie drops its showtimes; bookings keep their snapshot and lose the link.
pub async fn delete_movie(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Movies::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "movie_delete",
        "movies",
        serde_json::json!({ "movie_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
