use serde::Serialize;
use utoipa::ToSchema;

/// Counters shown on the admin dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub movies: u64,
    pub users: u64,
    pub bookings: u64,
    pub paid_bookings: u64,
    pub revenue: i64,
}
