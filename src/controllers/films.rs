//! Film catalog endpoints under `/api/film`.
//!
//! Lookups answer with the [`ApiResponse`] envelope; `All` and `sales`
//! return their payloads raw.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::dto::{AddFilmDto, FilmRecord, ShowFilmRecord};
use crate::models::Film;
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/film/add", post(create_film))
        .route("/film/flim-name", get(get_film_by_name))
        .route("/film/flim-genre", get(get_film_by_genre))
        .route("/film/film-id/{id}", get(get_film_by_id))
        .route("/film/All", get(get_all_films))
        .route("/film/sales", get(get_sales))
}

/* ---------- helpers ---------- */

fn not_found_by_id(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("Flim Not Found for this Id : {}", id))
}

fn film_list(term: &str, films: Vec<Film>) -> Result<ApiResponse<Vec<ShowFilmRecord>>> {
    if films.is_empty() {
        return Err(AppError::NotFound(format!("{} not found!", term)));
    }
    let records = films.into_iter().map(ShowFilmRecord::from).collect();
    Ok(ApiResponse::success(records, StatusCode::OK))
}

/* ---------- CREATE ---------- */

// POST /api/film/add
async fn create_film(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    payload: std::result::Result<Json<Option<AddFilmDto>>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(dto) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let dto = dto.ok_or_else(|| AppError::Validation("Should Not Be an Empty".to_string()))?;

    tracing::debug!("create_film requested by {}", admin.subject);
    let film_id = state
        .films
        .create_film(dto)
        .await?
        .ok_or_else(|| AppError::Validation("Film not created.".to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/film/film-id/{}", film_id))],
        ApiResponse::done("Created", StatusCode::CREATED),
    ))
}

/* ---------- LOOKUPS ---------- */

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenreQuery {
    genre: String,
}

// GET /api/film/flim-name?name=
async fn get_film_by_name(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    query: std::result::Result<Query<NameQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ShowFilmRecord>>> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let films = state.films.get_by_name(&params.name).await?;
    film_list(&params.name, films)
}

// GET /api/film/flim-genre?genre=
async fn get_film_by_genre(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    query: std::result::Result<Query<GenreQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ShowFilmRecord>>> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let films = state.films.get_by_genre(&params.genre).await?;
    film_list(&params.genre, films)
}

// GET /api/film/film-id/{id}
async fn get_film_by_id(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<ShowFilmRecord>> {
    // Only integer ids match this route
    let id: i32 = raw_id.parse().map_err(|_| not_found_by_id(&raw_id))?;

    let film = state.films.get_by_id(id).await?.ok_or_else(|| not_found_by_id(id))?;
    Ok(ApiResponse::success(ShowFilmRecord::from(film), StatusCode::OK))
}

// GET /api/film/All
async fn get_all_films(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Response> {
    let films = state.films.get_all().await?;
    if films.is_empty() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let records: Vec<FilmRecord> = films.into_iter().map(FilmRecord::from).collect();
    Ok(Json(records).into_response())
}

/* ---------- SALES ---------- */

// GET /api/film/sales
async fn get_sales(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse> {
    let sales = state.films.get_sales().await?;
    tracing::info!("Sales report generated for {} films", sales.len());
    Ok(Json(sales))
}
