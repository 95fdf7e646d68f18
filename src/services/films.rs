use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::error::Result;
use crate::models::dto::AddFilmDto;
use crate::models::{Film, FilmGraph, NewFilm, SalesRecord};
use crate::store::FilmStore;

/// Catalog queries and film creation.
#[derive(Clone)]
pub struct FilmService {
    store: Arc<dyn FilmStore>,
}

impl FilmService {
    pub fn new(store: Arc<dyn FilmStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a film with its slots.
    ///
    /// `Ok(None)` means the store declined the film (its name is taken).
    pub async fn create_film(&self, dto: AddFilmDto) -> Result<Option<i32>> {
        dto.validate()?;

        let film = NewFilm::from(dto);
        let name = film.name.clone();
        let film_id = self.store.insert_film(film).await?;
        match film_id {
            Some(id) => info!("Film {:?} created with id {}", name, id),
            None => warn!("Film {:?} not created: name already taken", name),
        }
        Ok(film_id)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Vec<Film>> {
        Ok(self.store.films_by_name(name).await?)
    }

    pub async fn get_by_genre(&self, genre: &str) -> Result<Vec<Film>> {
        Ok(self.store.films_by_genre(genre).await?)
    }

    pub async fn get_by_id(&self, film_id: i32) -> Result<Option<Film>> {
        Ok(self.store.film_by_id(film_id).await?)
    }

    /// Full film/slot/seat graph, unpaginated.
    pub async fn get_all(&self) -> Result<Vec<FilmGraph>> {
        Ok(self.store.catalog().await?)
    }

    pub async fn get_sales(&self) -> Result<Vec<SalesRecord>> {
        Ok(self.store.sales().await?)
    }
}
