use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Booking, BookingStatus, PaymentMethod, Ticket};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBookingRequest {
    pub showtime_id: Uuid,
    /// Seat labels such as `["E5", "E6"]`.
    #[validate(length(min = 1, max = 8, message = "Select between 1 and 8 seats"))]
    pub seats: Vec<String>,
    /// Resubmitting with the same key returns the booking created the first time.
    #[validate(length(min = 1, max = 128))]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayBookingRequest {
    pub payment_method: PaymentMethod,
}

/// Admin status change. `paid` confirms a pending hold as a cash sale at the counter.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub showtime_id: Uuid,
    pub seats: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<Booking>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketList {
    pub items: Vec<Ticket>,
}
