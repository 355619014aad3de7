pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod cinema_service;
pub mod hold_sweeper;
pub mod movie_service;
pub mod notification_service;
pub mod seat_service;
pub mod ticket_service;
pub mod user_service;
