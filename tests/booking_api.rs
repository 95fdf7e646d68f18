mod common;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use common::*;
use film_booking::models::{Film, FilmGraph, NewFilm, Reservation, SalesRecord, Seat, ShowCategory, Slot};
use film_booking::store::{self, FilmStore, MemoryStore};

fn seat_ids(receipt: &Value) -> Vec<i64> {
    receipt["data"]["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["seatId"].as_i64().unwrap())
        .collect()
}

async fn reserved_seat_count(app: &axum::Router) -> usize {
    let catalog = get(app, "/api/film/All", &user_token("auditor")).await;
    catalog
        .body
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|f| f["slots"].as_array().unwrap().clone())
        .flat_map(|s| s["seats"].as_array().unwrap().clone())
        .filter(|seat| seat["isReserved"] == json!(true))
        .count()
}

#[tokio::test]
async fn confirmation_returns_receipt_and_reserves_seats() {
    let app = app();
    let film_id = create_film(&app, film_body("Heat", "Crime", 2, 5)).await;

    let response = post(&app, "/api/booking/confirm", &user_token("alice"), booking_body(film_id, 3)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["isSuccess"], json!(true));
    assert_eq!(response.body["statusCode"], json!(201));

    let receipt = &response.body["data"];
    assert_eq!(receipt["filmId"], json!(film_id));
    assert_eq!(receipt["showCategory"], json!("Evening"));
    assert_eq!(receipt["slotDate"], json!(SLOT_DATE));
    assert_eq!(receipt["totalAmount"], json!(30.0));
    assert_eq!(receipt["seats"].as_array().unwrap().len(), 3);
    assert!(receipt["bookingId"].as_str().is_some());

    assert_eq!(reserved_seat_count(&app).await, 3);
}

#[tokio::test]
async fn confirmation_requires_authentication() {
    let app = app();
    let response = send(&app, Method::POST, "/api/booking/confirm", None, Some(booking_body(1, 1))).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn null_confirmation_is_rejected() {
    let app = app();
    let response = post(&app, "/api/booking/confirm", &user_token("alice"), Value::Null).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], json!("Should Not Be an Empty"));
}

#[tokio::test]
async fn unknown_slot_is_not_found() {
    let app = app();
    let film_id = create_film(&app, film_body("Heat", "Crime", 1, 1)).await;

    let mut body = booking_body(film_id, 1);
    body["category"] = json!("Morning");
    let response = post(&app, "/api/booking/confirm", &user_token("alice"), body).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        json!(format!("No Morning slot for film {} on {}", film_id, SLOT_DATE))
    );
}

#[tokio::test]
async fn quantity_out_of_range_is_a_bad_request() {
    let app = app();
    let film_id = create_film(&app, film_body("Heat", "Crime", 1, 1)).await;

    let response = post(&app, "/api/booking/confirm", &user_token("alice"), booking_body(film_id, 0)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["title"], json!("Bad Request"));
}

#[tokio::test]
async fn sold_out_slot_is_a_conflict() {
    let app = app();
    let film_id = create_film(&app, film_body("Heat", "Crime", 1, 2)).await;

    post(&app, "/api/booking/confirm", &user_token("alice"), booking_body(film_id, 2)).await;
    let response = post(&app, "/api/booking/confirm", &user_token("bob"), booking_body(film_id, 1)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], json!("insufficient seats available"));
    assert_eq!(response.body["statusCode"], json!(409));
}

#[tokio::test]
async fn sales_report_totals_confirmed_bookings() {
    let app = app();
    let heat = create_film(&app, film_body("Heat", "Crime", 4, 5)).await;
    create_film(&app, film_body("Alien", "Horror", 1, 1)).await;

    for customer in ["alice", "bob", "carol"] {
        let response = post(&app, "/api/booking/confirm", &user_token(customer), booking_body(heat, 2)).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = get(&app, "/api/film/sales", &admin_token()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!([
            { "filmId": heat, "name": "Heat", "genre": "Crime", "bookings": 3, "ticketsSold": 6, "revenue": 60.0 },
            { "filmId": heat + 1, "name": "Alien", "genre": "Horror", "bookings": 0, "ticketsSold": 0, "revenue": 0.0 }
        ])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_confirmations_never_share_a_seat() {
    let app = app_over(Arc::new(MemoryStore::new()), 50);
    let film_id = create_film(&app, film_body("Heat", "Crime", 2, 10)).await;

    let attempts: Vec<_> = (0..30)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let token = user_token(&format!("customer-{}", i));
                post(&app, "/api/booking/confirm", &token, booking_body(film_id, 3)).await
            })
        })
        .collect();
    let responses: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let mut taken = HashSet::new();
    let mut booked = 0;
    for response in &responses {
        match response.status {
            StatusCode::CREATED => {
                for seat in seat_ids(&response.body) {
                    assert!(taken.insert(seat), "seat {} reserved twice", seat);
                }
                booked += 3;
            }
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {}", other),
        }
    }

    assert!(booked > 0);
    assert!(booked <= 20);
    assert_eq!(reserved_seat_count(&app).await, booked);
}

/// Store whose reservations lose the race a fixed number of times.
struct LosingStore {
    inner: MemoryStore,
    losses: u32,
    attempts: AtomicU32,
}

impl LosingStore {
    fn new(losses: u32) -> Self {
        Self { inner: MemoryStore::new(), losses, attempts: AtomicU32::new(0) }
    }
}

#[async_trait]
impl FilmStore for LosingStore {
    async fn insert_film(&self, film: NewFilm) -> store::Result<Option<i32>> {
        self.inner.insert_film(film).await
    }

    async fn films_by_name(&self, name: &str) -> store::Result<Vec<Film>> {
        self.inner.films_by_name(name).await
    }

    async fn films_by_genre(&self, genre: &str) -> store::Result<Vec<Film>> {
        self.inner.films_by_genre(genre).await
    }

    async fn film_by_id(&self, film_id: i32) -> store::Result<Option<Film>> {
        self.inner.film_by_id(film_id).await
    }

    async fn catalog(&self) -> store::Result<Vec<FilmGraph>> {
        self.inner.catalog().await
    }

    async fn find_slot(
        &self,
        film_id: i32,
        category: ShowCategory,
        date: NaiveDate,
    ) -> store::Result<Option<Slot>> {
        self.inner.find_slot(film_id, category, date).await
    }

    async fn free_seats(&self, slot_id: i32) -> store::Result<Vec<Seat>> {
        self.inner.free_seats(slot_id).await
    }

    async fn reserve_seats(&self, reservation: &Reservation) -> store::Result<bool> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.losses {
            return Ok(false);
        }
        self.inner.reserve_seats(reservation).await
    }

    async fn sales(&self) -> store::Result<Vec<SalesRecord>> {
        self.inner.sales().await
    }
}

#[tokio::test]
async fn lost_races_are_retried_until_seats_are_won() {
    let store = Arc::new(LosingStore::new(2));
    let app = app_over(store.clone(), 3);
    let film_id = create_film(&app, film_body("Heat", "Crime", 1, 4)).await;

    let response = post(&app, "/api/booking/confirm", &user_token("alice"), booking_body(film_id, 2)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_are_a_conflict() {
    let store = Arc::new(LosingStore::new(u32::MAX));
    let app = app_over(store.clone(), 3);
    let film_id = create_film(&app, film_body("Heat", "Crime", 1, 4)).await;

    let response = post(&app, "/api/booking/confirm", &user_token("alice"), booking_body(film_id, 1)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], json!("insufficient seats available"));
    assert_eq!(store.attempts.load(Ordering::SeqCst), 4);
    assert_eq!(reserved_seat_count(&app).await, 0);
}
