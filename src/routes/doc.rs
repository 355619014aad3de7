use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::DashboardStats,
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bookings::{BookingList, CreateBookingRequest, PayBookingRequest, QuoteRequest, TicketList, UpdateBookingStatusRequest},
        cinemas::{
            CinemaList, CinemaWithHalls, CreateCinemaRequest, CreateHallRequest, CreateShowtimeRequest,
            ShowtimeList, ShowtimeSeats,
        },
        movies::{CinemaSchedule, CreateMovieRequest, HallSchedule, MovieDetail, MovieList, UpdateMovieRequest},
        notifications::NotificationList,
        users::{AdminUpdateUserRequest, UpdateProfileRequest, UserList},
    },
    models::{Booking, BookingStatus, Cinema, Hall, Movie, Notification, PaymentMethod, Showtime, Ticket, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, bookings, cinemas, health, movies, notifications, params, seats, showtimes, tickets, users},
    seating::{PriceQuote, PricedSeat, SeatCell, SeatLayout, SeatMap, SeatRow, SeatStatus, SeatTier, SeatType, SeatTypes},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::verify,
        movies::list_movies,
        movies::now_showing,
        movies::coming_soon,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        cinemas::list_cinemas,
        cinemas::get_cinema,
        cinemas::create_cinema,
        cinemas::add_hall,
        showtimes::list_showtimes,
        showtimes::get_showtime,
        showtimes::showtime_seats,
        showtimes::create_showtime,
        showtimes::delete_showtime,
        seats::seats_for_movie,
        seats::quote,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::list_all_bookings,
        bookings::get_booking,
        bookings::pay_booking,
        bookings::update_booking_status,
        bookings::cancel_booking,
        tickets::my_tickets,
        tickets::get_ticket,
        tickets::tickets_for_movie,
        tickets::tickets_for_user,
        users::get_profile,
        users::update_profile,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::user_bookings,
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
        notifications::clear_notifications,
        admin::dashboard_stats
    ),
    components(
        schemas(
            User,
            Movie,
            Cinema,
            Hall,
            Showtime,
            Booking,
            BookingStatus,
            PaymentMethod,
            Ticket,
            Notification,
            SeatMap,
            SeatTypes,
            SeatTier,
            SeatType,
            SeatStatus,
            SeatCell,
            SeatRow,
            SeatLayout,
            PricedSeat,
            PriceQuote,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateMovieRequest,
            UpdateMovieRequest,
            MovieList,
            MovieDetail,
            CinemaSchedule,
            HallSchedule,
            CreateCinemaRequest,
            CreateHallRequest,
            CreateShowtimeRequest,
            CinemaList,
            CinemaWithHalls,
            ShowtimeList,
            ShowtimeSeats,
            CreateBookingRequest,
            PayBookingRequest,
            UpdateBookingStatusRequest,
            QuoteRequest,
            BookingList,
            TicketList,
            UpdateProfileRequest,
            AdminUpdateUserRequest,
            UserList,
            NotificationList,
            DashboardStats,
            params::Pagination,
            params::MovieQuery,
            params::BookingListQuery,
            params::UserListQuery,
            params::ScreeningStatus,
            Meta,
            ApiResponse<User>,
            ApiResponse<Movie>,
            ApiResponse<MovieList>,
            ApiResponse<Booking>,
            ApiResponse<BookingList>,
            ApiResponse<TicketList>,
            ApiResponse<ShowtimeSeats>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and token verification"),
        (name = "Movies", description = "Movie catalogue"),
        (name = "Cinemas", description = "Cinemas and halls"),
        (name = "Showtimes", description = "Screenings and their seat maps"),
        (name = "Seats", description = "Seat picker lookups and price quotes"),
        (name = "Bookings", description = "Seat holds, payment and cancellation"),
        (name = "Tickets", description = "Paid bookings"),
        (name = "Users", description = "Profiles and user administration"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Admin", description = "Admin dashboard"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
