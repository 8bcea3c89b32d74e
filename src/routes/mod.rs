pub mod drivers;
pub mod export;
pub mod stats;
pub mod trips;

use axum::Router;
use chrono::Local;
use tower_http::trace::TraceLayer;

use crate::{models::trip::DATE_FORMAT, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/trips", trips::router())
        .nest("/drivers", drivers::router())
        .nest("/stats", stats::router())
        .nest("/export", export::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Local calendar date, the default for date-scoped queries.
fn today_string() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
