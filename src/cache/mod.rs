//! Redis read-through cache in front of a [`FilmStore`].
//!
//! Only the full catalog graph is cached: it is the most expensive read and
//! the one every client polls. Writes go straight to the inner store, then bump
//! a generation counter and drop the cached graph; a graph loaded before a
//! write is never stored. Redis failures never fail a request; they are
//! logged and the inner store answers instead.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{Film, FilmGraph, NewFilm, Reservation, SalesRecord, Seat, ShowCategory, Slot};
use crate::redis_client::RedisClient;
use crate::store::{FilmStore, Result};

pub mod catalog;

pub const CATALOG_KEY: &str = "films:catalog";
pub const CATALOG_GENERATION_KEY: &str = "films:catalog:gen";

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    store: Arc<dyn FilmStore>,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, store: Arc<dyn FilmStore>, ttl_seconds: u64) -> Self {
        Self { redis, store, ttl_seconds }
    }

    // Load the catalog once at startup so the first client does not pay for it
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");
        match self.catalog().await {
            Ok(films) => info!("Cache warmup done, {} films cached", films.len()),
            Err(e) => warn!("Cache warmup failed: {:?}", e),
        }
    }

    async fn drop_cached_catalog(&self) {
        match self.invalidate_catalog().await {
            Ok(()) => debug!("Invalidated film catalog cache"),
            Err(e) => warn!("Catalog cache invalidation failed: {:?}", e),
        }
    }
}

#[async_trait]
impl FilmStore for CacheService {
    async fn insert_film(&self, film: NewFilm) -> Result<Option<i32>> {
        let film_id = self.store.insert_film(film).await?;
        if film_id.is_some() {
            self.drop_cached_catalog().await;
        }
        Ok(film_id)
    }

    async fn films_by_name(&self, name: &str) -> Result<Vec<Film>> {
        self.store.films_by_name(name).await
    }

    async fn films_by_genre(&self, genre: &str) -> Result<Vec<Film>> {
        self.store.films_by_genre(genre).await
    }

    async fn film_by_id(&self, film_id: i32) -> Result<Option<Film>> {
        self.store.film_by_id(film_id).await
    }

    async fn catalog(&self) -> Result<Vec<FilmGraph>> {
        match self.get_catalog_from_cache().await {
            Ok(Some(films)) => return Ok(films),
            Ok(None) => {}
            Err(e) => warn!("Catalog cache read failed: {:?}", e),
        }

        let generation = match self.catalog_generation().await {
            Ok(generation) => Some(generation),
            Err(e) => {
                warn!("Catalog generation read failed: {:?}", e);
                None
            }
        };

        let films = self.store.catalog().await?;
        if let Some(generation) = generation {
            match self.save_catalog_to_cache(&films, generation).await {
                Ok(true) => {}
                Ok(false) => debug!("Catalog changed while loading, not cached"),
                Err(e) => warn!("Catalog cache write failed: {:?}", e),
            }
        }
        Ok(films)
    }

    async fn find_slot(
        &self,
        film_id: i32,
        category: ShowCategory,
        date: NaiveDate,
    ) -> Result<Option<Slot>> {
        self.store.find_slot(film_id, category, date).await
    }

    // Seat state must come from the store itself; a stale cache would hand out taken seats
    async fn free_seats(&self, slot_id: i32) -> Result<Vec<Seat>> {
        self.store.free_seats(slot_id).await
    }

    async fn reserve_seats(&self, reservation: &Reservation) -> Result<bool> {
        let reserved = self.store.reserve_seats(reservation).await?;
        if reserved {
            self.drop_cached_catalog().await;
        }
        Ok(reserved)
    }

    async fn sales(&self) -> Result<Vec<SalesRecord>> {
        self.store.sales().await
    }
}
