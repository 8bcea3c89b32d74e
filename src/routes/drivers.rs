use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    error::AppError,
    models::{Driver, DriverPatch, NewDriver},
    services::Committed,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route(
            "/:id",
            get(driver_detail).patch(update_driver).delete(delete_driver),
        )
}

async fn list_drivers(State(state): State<AppState>) -> Json<Vec<Driver>> {
    Json(state.ledger.drivers().await)
}

async fn create_driver(
    State(state): State<AppState>,
    Json(draft): Json<NewDriver>,
) -> Result<(StatusCode, Json<Committed<Driver>>), AppError> {
    let committed = state.ledger.add_driver(draft).await?;
    Ok((StatusCode::CREATED, Json(committed)))
}

async fn driver_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    state
        .ledger
        .driver(&id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DriverPatch>,
) -> Result<Json<Committed<bool>>, AppError> {
    Ok(Json(state.ledger.update_driver(&id, patch).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Committed<bool>> {
    Json(state.ledger.delete_driver(&id).await)
}
