use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "halls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cinema_id: Uuid,
    pub name: String,
    pub hall_type: String,
    /// Serialized `seating::SeatMap`.
    pub seat_map: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cinemas::Entity",
        from = "Column::CinemaId",
        to = "super::cinemas::Column::Id"
    )]
    Cinemas,
    #[sea_orm(has_many = "super::showtimes::Entity")]
    Showtimes,
}

impl Related<super::cinemas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cinemas.def()
    }
}

impl Related<super::showtimes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Showtimes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
