use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Movie,
    services::{recommendations, title_search},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct WatchlistRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub genres: Vec<String>,
    pub rating: f64,
    pub plot: String,
    pub poster_link: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            director: movie.director.clone(),
            release_year: movie.release_year,
            genres: movie.genres.clone(),
            rating: movie.rating,
            plot: movie.plot.clone(),
            poster_link: movie.poster_link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub username: String,
    /// Whether a previously saved watchlist was found
    pub restored: bool,
    pub watchlist: Vec<MovieResponse>,
}

fn to_responses(movies: &[Movie]) -> Vec<MovieResponse> {
    movies.iter().map(MovieResponse::from).collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Look up a single movie by exact title
pub async fn search_movie(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<MovieResponse>> {
    title_search::find_movie(&state.catalog, &query.title)
        .map(|movie| Json(MovieResponse::from(movie)))
        .ok_or_else(|| AppError::NotFound(format!("No movie titled {:?}", query.title)))
}

/// Recommend movies related to the given title
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(username): Path<String>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    tracing::info!(
        request_id = %request_id,
        username = %username,
        title = %query.title,
        "Processing recommendation request"
    );

    let movies = recommendations::get_recommendations(
        &state.catalog,
        &state.graph,
        state.watchlists.clone(),
        &username,
        &query.title,
    )
    .await?;

    Ok(Json(to_responses(&movies)))
}

/// Start a session, restoring the user's saved watchlist if there is one
pub async fn start_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(username): Path<String>,
) -> AppResult<Json<SessionResponse>> {
    let restored = recommendations::start_session(&state.watchlists, &username).await?;
    let watchlist = recommendations::get_watchlist(&state.watchlists, &username).await;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        restored,
        "Session started"
    );

    Ok(Json(SessionResponse {
        username,
        restored,
        watchlist: to_responses(&watchlist),
    }))
}

/// Get a user's watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<Vec<MovieResponse>> {
    let watchlist = recommendations::get_watchlist(&state.watchlists, &username).await;
    Json(to_responses(&watchlist))
}

/// Add a movie to a user's watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(username): Path<String>,
    Json(request): Json<WatchlistRequest>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let added = recommendations::add_to_watchlist(
        &state.catalog,
        state.watchlists.clone(),
        &username,
        &request.title,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        title = %request.title,
        added,
        "Processed watchlist add"
    );

    let watchlist = recommendations::get_watchlist(&state.watchlists, &username).await;
    Ok(Json(to_responses(&watchlist)))
}

/// Remove a movie from a user's watchlist
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((username, title)): Path<(String, String)>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let removed = recommendations::remove_from_watchlist(
        &state.catalog,
        state.watchlists.clone(),
        &username,
        &title,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        title = %title,
        removed,
        "Processed watchlist remove"
    );

    let watchlist = recommendations::get_watchlist(&state.watchlists, &username).await;
    Ok(Json(to_responses(&watchlist)))
}
