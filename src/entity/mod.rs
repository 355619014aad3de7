pub mod audit_logs;
pub mod booking_seats;
pub mod bookings;
pub mod cinemas;
pub mod halls;
pub mod movies;
pub mod notifications;
pub mod showtimes;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use booking_seats::Entity as BookingSeats;
pub use bookings::Entity as Bookings;
pub use cinemas::Entity as Cinemas;
pub use halls::Entity as Halls;
pub use movies::Entity as Movies;
pub use notifications::Entity as Notifications;
pub use showtimes::Entity as Showtimes;
pub use users::Entity as Users;
