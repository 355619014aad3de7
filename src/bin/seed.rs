use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use cinema_booking_api::{
    config::AppConfig,
    db::create_pool,
    models::{ROLE_ADMIN, ROLE_USER},
    seating::{SeatMap, SeatTier, SeatTypes},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Cinema Admin", ROLE_ADMIN).await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "Demo User", ROLE_USER).await?;
    let movies = seed_movies(&pool).await?;
    let halls = seed_cinemas(&pool).await?;
    let showtimes = seed_showtimes(&pool, &movies, &halls).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, User ID: {user_id}, {} movies, {} halls, {showtimes} showtimes",
        movies.len(),
        halls.len()
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, phone, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind("0900000000")
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

async fn seed_movies(pool: &sqlx::PgPool) -> anyhow::Result<Vec<(Uuid, bool)>> {
    let today = Utc::now().date_naive();
    let movies: Vec<(&str, &str, i32, NaiveDate, &str, Vec<&str>)> = vec![
        ("Harbor Lights", "Drama", 124, today - Duration::days(20), "Mai Tran", vec!["Linh Pham", "Quang Do"]),
        ("Circuit Breaker", "Action", 131, today - Duration::days(8), "Alex Moreno", vec!["Sam Reyes", "Ivy Chen"]),
        ("The Paper Crane", "Animation", 96, today - Duration::days(3), "Hana Sato", vec!["Yui Mori"]),
        ("Midnight Ferry", "Horror", 102, today - Duration::days(1), "Oskar Lind", vec!["Eva Berg", "Nils Dahl"]),
        ("Orbit of Ash", "Sci-Fi", 142, today + Duration::days(14), "Priya Nair", vec!["Dev Shah", "Ana Ruiz"]),
        ("Summer on Route 9", "Comedy", 99, today + Duration::days(30), "Tom Keller", vec!["Lena Fox"]),
    ];

    let mut ids = Vec::with_capacity(movies.len());
    for (title, category, duration, release_date, director, actors) in movies {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO movies (id, title, category, description, duration_minutes, release_date, director, actors)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (title) DO UPDATE SET release_date = EXCLUDED.release_date
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(category)
        .bind(format!("{title} is a {} feature.", category.to_lowercase()))
        .bind(duration)
        .bind(release_date)
        .bind(director)
        .bind(serde_json::json!(actors))
        .fetch_one(pool)
        .await?;
        ids.push((id, release_date <= today));
    }

    println!("Seeded movies");
    Ok(ids)
}

fn seat_map(rows: &[&str], columns: u16, vip_rows: &[&str], couple_rows: &[&str]) -> SeatMap {
    let owned = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect::<Vec<_>>();
    SeatMap {
        rows: owned(rows),
        columns,
        vip_rows: owned(vip_rows),
        couple_rows: owned(couple_rows),
        seat_types: SeatTypes {
            standard: SeatTier { price: 75_000 },
            vip: SeatTier { price: 100_000 },
            couple: (!couple_rows.is_empty()).then_some(SeatTier { price: 180_000 }),
        },
    }
}

async fn seed_cinemas(pool: &sqlx::PgPool) -> anyhow::Result<Vec<Uuid>> {
    let cinemas = [
        ("Riverside Cinema", "12 River Road, District 1"),
        ("Skyline Multiplex", "88 Tower Avenue, District 7"),
    ];
    let halls = [
        ("Hall 1", "2D", seat_map(&["A", "B", "C", "D", "E", "F", "G", "H"], 12, &["E", "F"], &["H"])),
        ("Hall 2", "3D", seat_map(&["A", "B", "C", "D", "E", "F"], 10, &["D", "E"], &[])),
    ];

    let mut hall_ids = Vec::new();
    for (name, address) in cinemas {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM cinemas WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        let cinema_id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    "INSERT INTO cinemas (id, name, address) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(Uuid::new_v4())
                .bind(name)
                .bind(address)
                .fetch_one(pool)
                .await?;
                id
            }
        };

        for (hall_name, hall_type, map) in &halls {
            map.validate()?;
            let (id,): (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO halls (id, cinema_id, name, hall_type, seat_map)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (cinema_id, name) DO UPDATE SET seat_map = EXCLUDED.seat_map
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(cinema_id)
            .bind(hall_name)
            .bind(hall_type)
            .bind(serde_json::to_value(map)?)
            .fetch_one(pool)
            .await?;
            hall_ids.push(id);
        }
    }

    println!("Seeded cinemas and halls");
    Ok(hall_ids)
}

/// A week of screenings for every movie already released, rotating across halls.
async fn seed_showtimes(pool: &sqlx::PgPool, movies: &[(Uuid, bool)], halls: &[Uuid]) -> anyhow::Result<u64> {
    let slots = ["10:00", "13:30", "17:00", "20:30"];
    let today = Utc::now().date_naive();
    let showing: Vec<Uuid> = movies.iter().filter(|(_, released)| *released).map(|(id, _)| *id).collect();
    if showing.is_empty() || halls.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for day in 0..7 {
        let date = today + Duration::days(day);
        for (hall_idx, hall_id) in halls.iter().enumerate() {
            for (slot_idx, slot) in slots.iter().enumerate() {
                let movie_id = showing[(hall_idx + slot_idx) % showing.len()];
                let time = NaiveTime::parse_from_str(slot, "%H:%M")?;
                let result = sqlx::query(
                    r#"
                    INSERT INTO showtimes (id, movie_id, hall_id, show_date, show_time)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (hall_id, show_date, show_time) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(movie_id)
                .bind(hall_id)
                .bind(date)
                .bind(time)
                .execute(pool)
                .await?;
                created += result.rows_affected();
            }
        }
    }

    println!("Seeded showtimes");
    Ok(created)
}
