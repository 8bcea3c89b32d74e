use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use csv::{QuoteStyle, WriterBuilder};
use serde::Deserialize;
use tracing::info;

use super::today_string;
use crate::{error::AppError, services::export::ExportTable, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/day", get(export_day))
        .route("/all", get(export_all))
}

#[derive(Debug, Deserialize)]
struct ExportParams {
    date: Option<String>,
}

async fn export_day(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let date = params.date.unwrap_or_else(today_string);
    let table = state.ledger.daily_trips_export(&date).await?;
    download(table)
}

async fn export_all(State(state): State<AppState>) -> Result<Response, AppError> {
    let table = state.ledger.all_trips_export().await?;
    download(table)
}

/// Writes the table as comma separated text. Nothing is quoted or escaped.
pub fn render_csv(table: &ExportTable) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(anyhow::Error::from)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(anyhow::Error::from)?;
    }
    let bytes = writer.into_inner().map_err(|err| anyhow::anyhow!("{err}"))?;
    String::from_utf8(bytes).map_err(|err| AppError::Other(err.into()))
}

fn download(table: ExportTable) -> Result<Response, AppError> {
    let body = render_csv(&table)?;
    let file_name = table.file_name();
    info!(file = %file_name, rows = table.rows.len(), "export generated");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
