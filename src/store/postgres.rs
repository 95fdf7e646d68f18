use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{assemble_catalog, FilmStore, Result};
use crate::models::{Film, FilmGraph, NewFilm, Reservation, SalesRecord, Seat, ShowCategory, Slot};

const FILM_COLUMNS: &str = "film_id, name, description, genre, duration, amount";

#[derive(Clone)]
pub struct PgFilmStore {
    pool: PgPool,
}

impl PgFilmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilmStore for PgFilmStore {
    async fn insert_film(&self, film: NewFilm) -> Result<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        // The unique index on LOWER(name) turns a duplicate into "no row returned"
        let film_id: Option<i32> = sqlx::query_scalar(
            "INSERT INTO films (name, description, genre, duration, amount)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT DO NOTHING
             RETURNING film_id"
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(&film.genre)
        .bind(film.duration)
        .bind(film.amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(film_id) = film_id else {
            tx.rollback().await?;
            debug!("Film {:?} already exists, nothing inserted", film.name);
            return Ok(None);
        };

        for slot in &film.slots {
            let slot_id: i32 = sqlx::query_scalar(
                "INSERT INTO slots (film_id, show_category, slot_date)
                 VALUES ($1, $2, $3)
                 RETURNING slot_id"
            )
            .bind(film_id)
            .bind(slot.show_category)
            .bind(slot.slot_date)
            .fetch_one(&mut *tx)
            .await?;

            let (rows, numbers): (Vec<i32>, Vec<i32>) = slot.seat_positions().unzip();
            sqlx::query(
                "INSERT INTO seats (slot_id, row, number)
                 SELECT $1, r, n FROM UNNEST($2::int4[], $3::int4[]) AS t(r, n)"
            )
            .bind(slot_id)
            .bind(&rows)
            .bind(&numbers)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Film {} created with {} slots", film_id, film.slots.len());
        Ok(Some(film_id))
    }

    async fn films_by_name(&self, name: &str) -> Result<Vec<Film>> {
        let films = sqlx::query_as::<_, Film>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE LOWER(name) = LOWER($1) ORDER BY film_id"
        ))
        .bind(name.trim())
        .fetch_all(&self.pool)
        .await?;
        Ok(films)
    }

    async fn films_by_genre(&self, genre: &str) -> Result<Vec<Film>> {
        let films = sqlx::query_as::<_, Film>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE LOWER(genre) = LOWER($1) ORDER BY film_id"
        ))
        .bind(genre.trim())
        .fetch_all(&self.pool)
        .await?;
        Ok(films)
    }

    async fn film_by_id(&self, film_id: i32) -> Result<Option<Film>> {
        let film = sqlx::query_as::<_, Film>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE film_id = $1"
        ))
        .bind(film_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(film)
    }

    async fn catalog(&self) -> Result<Vec<FilmGraph>> {
        // One snapshot for all three reads so seats never point at unseen slots
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let films = sqlx::query_as::<_, Film>(&format!(
            "SELECT {FILM_COLUMNS} FROM films ORDER BY film_id"
        ))
        .fetch_all(&mut *tx)
        .await?;

        let slots = sqlx::query_as::<_, Slot>(
            "SELECT slot_id, film_id, show_category, slot_date FROM slots ORDER BY slot_id"
        )
        .fetch_all(&mut *tx)
        .await?;

        let seats = sqlx::query_as::<_, Seat>(
            "SELECT seat_id, slot_id, row, number, is_reserved
             FROM seats
             ORDER BY slot_id, row, number"
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        assemble_catalog(films, slots, seats)
    }

    async fn find_slot(
        &self,
        film_id: i32,
        category: ShowCategory,
        date: NaiveDate,
    ) -> Result<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            "SELECT slot_id, film_id, show_category, slot_date
             FROM slots
             WHERE film_id = $1 AND show_category = $2 AND slot_date = $3"
        )
        .bind(film_id)
        .bind(category)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slot)
    }

    async fn free_seats(&self, slot_id: i32) -> Result<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT seat_id, slot_id, row, number, is_reserved
             FROM seats
             WHERE slot_id = $1 AND is_reserved = FALSE
             ORDER BY row, number"
        )
        .bind(slot_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn reserve_seats(&self, reservation: &Reservation) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let booking_id: i64 = sqlx::query_scalar(
            "INSERT INTO bookings (booking_ref, film_id, slot_id, customer, seat_count, total_amount)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING booking_id"
        )
        .bind(reservation.booking_ref)
        .bind(reservation.film_id)
        .bind(reservation.slot_id)
        .bind(&reservation.customer)
        .bind(reservation.seat_ids.len() as i32)
        .bind(reservation.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        // A concurrent reservation that commits first makes its rows fail the
        // is_reserved guard here, so the affected count comes up short
        let updated = sqlx::query(
            "UPDATE seats
             SET is_reserved = TRUE, booking_id = $1
             WHERE slot_id = $2 AND seat_id = ANY($3) AND is_reserved = FALSE"
        )
        .bind(booking_id)
        .bind(reservation.slot_id)
        .bind(&reservation.seat_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated != reservation.seat_ids.len() as u64 {
            tx.rollback().await?;
            debug!(
                "Reservation {} lost a race: {} of {} seats still free",
                reservation.booking_ref,
                updated,
                reservation.seat_ids.len()
            );
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn sales(&self) -> Result<Vec<SalesRecord>> {
        let records = sqlx::query_as::<_, SalesRecord>(
            r#"
            SELECT
                f.film_id,
                f.name,
                f.genre,
                COUNT(b.booking_id) AS bookings,
                COALESCE(SUM(b.seat_count), 0)::BIGINT AS tickets_sold,
                COALESCE(SUM(b.total_amount), 0)::FLOAT8 AS revenue
            FROM films f
            LEFT JOIN bookings b ON b.film_id = f.film_id
            GROUP BY f.film_id, f.name, f.genre
            ORDER BY f.film_id
            "#
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
