mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, NaiveTime, Utc};
use cinema_booking_api::{
    app::build_app,
    db::{create_pool, orm_from_pool, run_migrations},
    dto::{
        bookings::{CreateBookingRequest, PayBookingRequest, QuoteRequest, UpdateBookingStatusRequest},
        cinemas::{CreateCinemaRequest, CreateHallRequest, CreateShowtimeRequest},
        movies::CreateMovieRequest,
    },
    entity::{AuditLogs, BookingSeats, Bookings, Users, audit_logs, booking_seats, bookings, users},
    error::AppError,
    middleware::auth::AuthUser,
    models::{BookingStatus, PaymentMethod, ROLE_ADMIN, ROLE_USER},
    routes::params::{BookingListQuery, Pagination, SeatQuery},
    seating::{SeatMap, SeatStatus, SeatTier, SeatTypes},
    services::{
        admin_service, auth_service::issue_token, booking_service, cinema_service,
        hold_sweeper::HoldSweeper, movie_service, notification_service, seat_service, ticket_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
    Statement, TransactionTrait,
};
use tower::ServiceExt;
use uuid::Uuid;

// Hold -> pay -> ticket, with double-booking, idempotent resubmission and hold expiry.
#[tokio::test]
async fn hold_pay_and_expiry_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run booking flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = create_user(&state, ROLE_ADMIN, "admin@example.com").await?;
    let alice = create_user(&state, ROLE_USER, "alice@example.com").await?;
    let bob = create_user(&state, ROLE_USER, "bob@example.com").await?;

    let seeded = seed_showtime(&state, &admin).await?;
    let showtime_id = seeded.showtime_id;

    // The quote matches what the hold later charges.
    let quoted = seat_service::quote(
        &state,
        QuoteRequest {
            showtime_id,
            seats: vec!["E5".into(), "E6".into()],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(quoted.total, 200_000);
    assert_eq!(quoted.seats.len(), 2);

    // Alice holds two VIP seats.
    let held = booking_service::create_booking(
        &state,
        &alice,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["E5".into(), "e6".into()],
            idempotency_key: Some("alice-1".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(held.status, BookingStatus::Pending);
    assert_eq!(held.total_amount, quoted.total);
    assert!(held.hold_expires_at > Utc::now());

    // Resubmitting the same key returns the same booking.
    let again = booking_service::create_booking(
        &state,
        &alice,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["E5".into(), "E6".into()],
            idempotency_key: Some("alice-1".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(again.id, held.id);

    // Bob cannot take a held seat.
    let clash = booking_service::create_booking(
        &state,
        &bob,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["E6".into(), "E7".into()],
            idempotency_key: None,
        },
    )
    .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))), "got {clash:?}");

    let seats = seat_service::showtime_seats(&state, showtime_id).await?.data.unwrap();
    let row_e = seats.layout.rows.iter().find(|r| r.row == "E").unwrap();
    assert_eq!(row_e.seats[4].status, SeatStatus::Occupied);
    assert_eq!(row_e.seats[6].status, SeatStatus::Available);

    // The seat picker finds the same screening by movie, cinema, hall, date and time.
    let picker = seat_service::seats_for_movie(&state, seeded.movie_id, seeded.seat_query("19:30"))
        .await?
        .data
        .unwrap();
    assert_eq!(picker.showtime.id, showtime_id);
    assert_eq!(picker.layout.occupied, 2);

    let quote_taken = seat_service::quote(
        &state,
        QuoteRequest {
            showtime_id,
            seats: vec!["E5".into()],
        },
    )
    .await;
    assert!(matches!(quote_taken, Err(AppError::Conflict(_))), "got {quote_taken:?}");

    let no_slot = seat_service::seats_for_movie(&state, seeded.movie_id, seeded.seat_query("21:00")).await;
    match no_slot {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Selected showtime not available"),
        other => panic!("expected missing showtime, got {other:?}"),
    }

    let mut wrong_cinema = seeded.seat_query("19:30");
    wrong_cinema.cinema = Uuid::new_v4();
    let mismatch = seat_service::seats_for_movie(&state, seeded.movie_id, wrong_cinema).await;
    match mismatch {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Hall does not belong to this cinema"),
        other => panic!("expected cinema mismatch, got {other:?}"),
    }

    // Alice pays; a second payment is refused.
    let paid = booking_service::pay_booking(
        &state,
        &alice,
        held.id,
        PayBookingRequest {
            payment_method: PaymentMethod::Momo,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.status, BookingStatus::Paid);
    assert!(paid.paid_at.is_some());

    let twice = booking_service::pay_booking(
        &state,
        &alice,
        held.id,
        PayBookingRequest {
            payment_method: PaymentMethod::Card,
        },
    )
    .await;
    assert!(matches!(twice, Err(AppError::BadRequest(_))));

    let tickets = ticket_service::my_tickets(&state, &alice, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(tickets.items.len(), 1);
    assert_eq!(tickets.items[0].seats, vec!["E5", "E6"]);

    let inbox = notification_service::list_notifications(&state, &alice).await?.data.unwrap();
    assert_eq!(inbox.unread, 1);
    assert_eq!(inbox.items[0].kind, notification_service::KIND_TICKET);

    // Bob holds a seat but lets the hold lapse.
    let lapsed = booking_service::create_booking(
        &state,
        &bob,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["A1".into()],
            idempotency_key: None,
        },
    )
    .await?
    .data
    .unwrap();
    expire_hold(&state, lapsed.id).await?;

    let late = booking_service::pay_booking(
        &state,
        &bob,
        lapsed.id,
        PayBookingRequest {
            payment_method: PaymentMethod::Cash,
        },
    )
    .await;
    match late {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Seat hold expired"),
        other => panic!("expected expired hold, got {other:?}"),
    }
    let lapsed = booking_service::get_booking(&state, &bob, lapsed.id).await?.data.unwrap();
    assert_eq!(lapsed.status, BookingStatus::Expired);

    // The seat is free again.
    let retaken = booking_service::create_booking(
        &state,
        &bob,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["A1".into()],
            idempotency_key: None,
        },
    )
    .await?
    .data
    .unwrap();

    // The sweeper expires lapsed holds nobody touches.
    expire_hold(&state, retaken.id).await?;
    let released = HoldSweeper::new(state.clone()).sweep_once().await?;
    assert_eq!(released, 1);

    // Bob cannot read Alice's booking; admin sees everything.
    let denied = booking_service::get_booking(&state, &bob, held.id).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let all = booking_service::list_all_bookings(&state, &admin, BookingListQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(all.items.len(), 3);

    let stats = admin_service::dashboard_stats(&state, &admin).await?.data.unwrap();
    assert_eq!(stats.paid_bookings, 1);
    assert_eq!(stats.revenue, 200_000);

    // Cancelling frees the seats.
    booking_service::cancel_booking(&state, &alice, held.id).await?;
    let seats = seat_service::showtime_seats(&state, showtime_id).await?.data.unwrap();
    assert_eq!(seats.layout.occupied, 0);

    let audited = AuditLogs::find()
        .filter(audit_logs::Column::Action.eq("booking_created"))
        .count(&state.orm)
        .await?;
    assert_eq!(audited, 3);

    // A payment holding the row lock wins over a concurrent sweep of the same lapsed hold.
    let racing = hold(&state, &bob, showtime_id, "B1").await?;
    expire_hold(&state, racing).await?;

    let txn = state.orm.begin().await?;
    let locked = Bookings::find_by_id(racing)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .unwrap();
    let mut paying: bookings::ActiveModel = locked.into();
    paying.status = Set(BookingStatus::Paid.as_str().into());
    paying.paid_at = Set(Some(Utc::now().fixed_offset()));
    paying.update(&txn).await?;

    let sweeper = HoldSweeper::new(state.clone());
    let sweep = tokio::spawn(async move { sweeper.sweep_once().await });
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    txn.commit().await?;

    assert_eq!(sweep.await??, 0);
    let racing = booking_service::get_booking(&state, &bob, racing).await?.data.unwrap();
    assert_eq!(racing.status, BookingStatus::Paid);
    let seat_rows = BookingSeats::find()
        .filter(booking_seats::Column::BookingId.eq(racing.id))
        .count(&state.orm)
        .await?;
    assert_eq!(seat_rows, 1);
    let stolen = booking_service::create_booking(
        &state,
        &alice,
        CreateBookingRequest {
            showtime_id,
            seats: vec!["B1".into()],
            idempotency_key: None,
        },
    )
    .await;
    assert!(matches!(stolen, Err(AppError::Conflict(_))), "got {stolen:?}");

    // Admin status changes from the dashboard.
    let counter = hold(&state, &bob, showtime_id, "C1").await?;
    let denied = booking_service::update_booking_status(
        &state,
        &bob,
        counter,
        UpdateBookingStatusRequest { status: BookingStatus::Paid },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let confirmed = booking_service::update_booking_status(
        &state,
        &admin,
        counter,
        UpdateBookingStatusRequest { status: BookingStatus::Paid },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Paid);
    assert_eq!(confirmed.payment_method.as_deref(), Some("cash"));
    assert!(confirmed.paid_at.is_some());

    let backwards = booking_service::update_booking_status(
        &state,
        &admin,
        counter,
        UpdateBookingStatusRequest { status: BookingStatus::Expired },
    )
    .await;
    assert!(matches!(backwards, Err(AppError::BadRequest(_))), "got {backwards:?}");

    let voided = booking_service::update_booking_status(
        &state,
        &admin,
        counter,
        UpdateBookingStatusRequest { status: BookingStatus::Cancelled },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(voided.status, BookingStatus::Cancelled);
    let seats = seat_service::showtime_seats(&state, showtime_id).await?.data.unwrap();
    assert_eq!(seats.layout.occupied, 1);

    // A demoted admin loses admin routes before the token expires.
    let (token, _) = issue_token(&state, admin.user_id, ROLE_ADMIN)?;
    assert_eq!(get_status(&state, "/api/admin/stats", &token).await, StatusCode::OK);
    Users::update_many()
        .col_expr(users::Column::Role, Expr::value(ROLE_USER))
        .filter(users::Column::Id.eq(admin.user_id))
        .exec(&state.orm)
        .await?;
    assert_eq!(get_status(&state, "/api/admin/stats", &token).await, StatusCode::FORBIDDEN);

    Ok(())
}

async fn hold(state: &AppState, user: &AuthUser, showtime_id: Uuid, seat: &str) -> anyhow::Result<Uuid> {
    let booking = booking_service::create_booking(
        state,
        user,
        CreateBookingRequest {
            showtime_id,
            seats: vec![seat.into()],
            idempotency_key: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(booking.id)
}

async fn get_status(state: &AppState, uri: &str, token: &str) -> StatusCode {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    build_app(state.clone()).oneshot(request).await.unwrap().status()
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = orm_from_pool(&pool);
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE notifications, booking_seats, bookings, showtimes, halls, cinemas, movies, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState::new(pool, orm, common::test_config(database_url)))
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        full_name: Set(email.to_string()),
        phone: Set(None),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

struct Seeded {
    movie_id: Uuid,
    cinema_id: Uuid,
    hall_id: Uuid,
    showtime_id: Uuid,
    show_date: chrono::NaiveDate,
}

impl Seeded {
    fn seat_query(&self, time: &str) -> SeatQuery {
        SeatQuery {
            cinema: self.cinema_id,
            hall: self.hall_id,
            date: self.show_date,
            time: time.into(),
        }
    }
}

async fn seed_showtime(state: &AppState, admin: &AuthUser) -> anyhow::Result<Seeded> {
    let movie = movie_service::create_movie(
        state,
        admin,
        CreateMovieRequest {
            title: "Harbor Lights".into(),
            category: "Drama".into(),
            description: None,
            duration_minutes: 120,
            release_date: Utc::now().date_naive() - Duration::days(3),
            director: None,
            actors: vec![],
            poster_url: None,
            banner_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    let cinema = cinema_service::create_cinema(
        state,
        admin,
        CreateCinemaRequest {
            name: "Riverside".into(),
            address: "12 River Road".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let hall = cinema_service::add_hall(
        state,
        admin,
        cinema.id,
        CreateHallRequest {
            name: "Hall 1".into(),
            hall_type: "2D".into(),
            seat_map: SeatMap {
                rows: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
                columns: 8,
                vip_rows: vec!["E".into()],
                couple_rows: vec![],
                seat_types: SeatTypes {
                    standard: SeatTier { price: 75_000 },
                    vip: SeatTier { price: 100_000 },
                    couple: None,
                },
            },
        },
    )
    .await?
    .data
    .unwrap();

    let showtime = cinema_service::create_showtime(
        state,
        admin,
        CreateShowtimeRequest {
            movie_id: movie.id,
            hall_id: hall.id,
            show_date: Utc::now().date_naive() + Duration::days(1),
            show_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();

    Ok(Seeded {
        movie_id: movie.id,
        cinema_id: cinema.id,
        hall_id: hall.id,
        showtime_id: showtime.id,
        show_date: showtime.show_date,
    })
}

async fn expire_hold(state: &AppState, booking_id: Uuid) -> anyhow::Result<()> {
    let past = (Utc::now() - Duration::minutes(1)).fixed_offset();
    bookings::Entity::update_many()
        .col_expr(bookings::Column::HoldExpiresAt, Expr::value(past))
        .filter(bookings::Column::Id.eq(booking_id))
        .exec(&state.orm)
        .await?;
    Ok(())
}
