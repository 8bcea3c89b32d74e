use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::today_string;
use crate::{
    error::AppError,
    models::{DriverRevenue, MonthlyRevenue, Revenue, Summary},
    state::AppState,
};

const DEFAULT_MONTHS: u32 = 6;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/day", get(day))
        .route("/period", get(period))
        .route("/drivers/day", get(drivers_day))
        .route("/drivers/period", get(drivers_period))
        .route("/drivers/performance", get(drivers_performance))
        .route("/leaderboard", get(leaderboard))
        .route("/summary", get(summary))
        .route("/monthly", get(monthly))
}

#[derive(Debug, Deserialize)]
struct DayParams {
    date: Option<String>,
}

impl DayParams {
    fn date(self) -> String {
        self.date.unwrap_or_else(today_string)
    }
}

#[derive(Debug, Deserialize)]
struct PeriodParams {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverviewParams {
    today: Option<NaiveDate>,
    months: Option<u32>,
}

impl OverviewParams {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

async fn day(State(state): State<AppState>, Query(params): Query<DayParams>) -> Json<Revenue> {
    Json(state.ledger.day_revenue(&params.date()).await)
}

async fn period(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Revenue>, AppError> {
    let start = params.start.unwrap_or_default();
    let end = params.end.unwrap_or_default();
    Ok(Json(state.ledger.period_revenue(&start, &end).await?))
}

async fn drivers_day(
    State(state): State<AppState>,
    Query(params): Query<DayParams>,
) -> Json<Vec<DriverRevenue>> {
    Json(state.ledger.driver_revenue_by_day(&params.date()).await)
}

async fn drivers_period(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<DriverRevenue>>, AppError> {
    let start = params.start.unwrap_or_default();
    let end = params.end.unwrap_or_default();
    Ok(Json(state.ledger.driver_revenue_by_period(&start, &end).await?))
}

async fn drivers_performance(State(state): State<AppState>) -> Json<Vec<DriverRevenue>> {
    Json(state.ledger.driver_performance().await)
}

async fn leaderboard(State(state): State<AppState>) -> Json<Vec<DriverRevenue>> {
    Json(state.ledger.driver_leaderboard().await)
}

async fn summary(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Json<Summary> {
    Json(state.ledger.summary(params.today()).await)
}

async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<Vec<MonthlyRevenue>>, AppError> {
    let months = params.months.unwrap_or(DEFAULT_MONTHS);
    let series = state.ledger.monthly_revenue(params.today(), months).await?;
    Ok(Json(series))
}
