use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{NewTrip, Trip, TripPatch},
    services::Committed,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route(
            "/:id",
            get(trip_detail).patch(update_trip).delete(delete_trip),
        )
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn list_trips(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Trip>> {
    let query = params.q.unwrap_or_default();
    Json(state.ledger.search_trips(&query).await)
}

async fn create_trip(
    State(state): State<AppState>,
    Json(draft): Json<NewTrip>,
) -> Result<(StatusCode, Json<Committed<Trip>>), AppError> {
    let committed = state.ledger.add_trip(draft).await?;
    Ok((StatusCode::CREATED, Json(committed)))
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    state.ledger.trip(&id).await.map(Json).ok_or(AppError::NotFound)
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TripPatch>,
) -> Result<Json<Committed<bool>>, AppError> {
    Ok(Json(state.ledger.update_trip(&id, patch).await?))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Committed<bool>> {
    Json(state.ledger.delete_trip(&id).await)
}
