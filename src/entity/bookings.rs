use sea_orm::entity::prelude::*;

/// A booking keeps a snapshot of what was bought (titles, names, seats) so a paid
/// ticket still reads correctly after the movie or showtime is removed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub showtime_id: Option<Uuid>,
    pub movie_id: Option<Uuid>,
    pub movie_title: String,
    pub cinema_name: String,
    pub hall_name: String,
    pub show_date: Date,
    pub show_time: Time,
    /// JSON array of `seating::PricedSeat`.
    pub seats: Json,
    pub total_amount: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub idempotency_key: Option<String>,
    pub hold_expires_at: DateTimeWithTimeZone,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::booking_seats::Entity")]
    BookingSeats,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::booking_seats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingSeats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
