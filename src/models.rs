use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{
        bookings::Model as BookingModel, cinemas::Model as CinemaModel, halls::Model as HallModel,
        movies::Model as MovieModel, notifications::Model as NotificationModel,
        showtimes::Model as ShowtimeModel, users::Model as UserModel,
    },
    error::{AppError, AppResult},
    seating::{PricedSeat, SeatMap},
};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Public view of a user; the password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            phone: model.phone,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub release_date: NaiveDate,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub poster_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MovieModel> for Movie {
    fn from(model: MovieModel) -> Self {
        // Rows written by this service always hold a string array.
        let actors = serde_json::from_value(model.actors).unwrap_or_default();
        Self {
            id: model.id,
            title: model.title,
            category: model.category,
            description: model.description,
            duration_minutes: model.duration_minutes,
            release_date: model.release_date,
            director: model.director,
            actors,
            poster_url: model.poster_url,
            banner_url: model.banner_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cinema {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<CinemaModel> for Cinema {
    fn from(model: CinemaModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hall {
    pub id: Uuid,
    pub cinema_id: Uuid,
    pub name: String,
    pub hall_type: String,
    pub seat_map: SeatMap,
}

impl TryFrom<HallModel> for Hall {
    type Error = AppError;

    fn try_from(model: HallModel) -> AppResult<Self> {
        let seat_map = serde_json::from_value(model.seat_map).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("hall {} has a corrupt seat map: {e}", model.id))
        })?;
        Ok(Self {
            id: model.id,
            cinema_id: model.cinema_id,
            name: model.name,
            hall_type: model.hall_type,
            seat_map,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Showtime {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub hall_id: Uuid,
    pub show_date: NaiveDate,
    #[schema(value_type = String, example = "19:30:00")]
    pub show_time: NaiveTime,
}

impl From<ShowtimeModel> for Showtime {
    fn from(model: ShowtimeModel) -> Self {
        Self {
            id: model.id,
            movie_id: model.movie_id,
            hall_id: model.hall_id,
            show_date: model.show_date,
            show_time: model.show_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "paid" => Ok(BookingStatus::Paid),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "expired" => Ok(BookingStatus::Expired),
            other => Err(AppError::BadRequest(format!("unknown booking status '{other}'"))),
        }
    }
}

/// Payment is simulated; the method is recorded but no gateway is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Momo,
    Zalopay,
    Vnpay,
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Momo => "momo",
            PaymentMethod::Zalopay => "zalopay",
            PaymentMethod::Vnpay => "vnpay",
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub showtime_id: Option<Uuid>,
    pub movie_id: Option<Uuid>,
    pub movie_title: String,
    pub cinema_name: String,
    pub hall_name: String,
    pub show_date: NaiveDate,
    #[schema(value_type = String, example = "19:30:00")]
    pub show_time: NaiveTime,
    pub seats: Vec<PricedSeat>,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub payment_method: Option<String>,
    pub hold_expires_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingModel> for Booking {
    type Error = AppError;

    fn try_from(model: BookingModel) -> AppResult<Self> {
        let seats = serde_json::from_value(model.seats).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("booking {} has corrupt seats: {e}", model.id))
        })?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            showtime_id: model.showtime_id,
            movie_id: model.movie_id,
            movie_title: model.movie_title,
            cinema_name: model.cinema_name,
            hall_name: model.hall_name,
            show_date: model.show_date,
            show_time: model.show_time,
            seats,
            total_amount: model.total_amount,
            status: model.status.parse()?,
            payment_method: model.payment_method,
            hold_expires_at: model.hold_expires_at.with_timezone(&Utc),
            paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

/// A ticket is a paid booking seen from the buyer's side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Option<Uuid>,
    pub movie_title: String,
    pub cinema: String,
    pub hall: String,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "19:30:00")]
    pub time: NaiveTime,
    pub seats: Vec<String>,
    pub total_amount: i64,
    pub payment_method: Option<String>,
    pub status: BookingStatus,
    pub purchase_date: DateTime<Utc>,
}

impl From<Booking> for Ticket {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_id: booking.id,
            user_id: booking.user_id,
            movie_id: booking.movie_id,
            movie_title: booking.movie_title,
            cinema: booking.cinema_name,
            hall: booking.hall_name,
            date: booking.show_date,
            time: booking.show_time,
            seats: booking.seats.into_iter().map(|seat| seat.label).collect(),
            total_amount: booking.total_amount,
            payment_method: booking.payment_method,
            status: booking.status,
            purchase_date: booking.paid_at.unwrap_or(booking.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub booking_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            message: model.message,
            booking_id: model.booking_id,
            read: model.read,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
