pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cinemas;
pub mod movies;
pub mod notifications;
pub mod users;
