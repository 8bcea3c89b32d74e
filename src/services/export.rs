use std::fmt;

use serde::Serialize;

use crate::{error::ValidationError, models::Trip};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Text(text) => f.write_str(text),
            ExportValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            ExportValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Flat rows sharing one ordered header. Values are not escaped, so a
/// separator inside a value ends up as an extra column downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    /// File name without extension.
    pub stem: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<ExportValue>>,
}

impl ExportTable {
    fn build<'a>(
        stem: String,
        columns: &[Column],
        trips: impl Iterator<Item = &'a Trip>,
    ) -> Result<Self, ValidationError> {
        let rows: Vec<_> = trips
            .map(|trip| columns.iter().map(|(_, value)| value(trip)).collect())
            .collect();
        if rows.is_empty() {
            return Err(ValidationError::NothingToExport);
        }
        Ok(Self {
            stem,
            headers: columns.iter().map(|(header, _)| *header).collect(),
            rows,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.stem)
    }
}

type Column = (&'static str, fn(&Trip) -> ExportValue);

fn text(value: &str) -> ExportValue {
    ExportValue::Text(value.to_string())
}

fn customer(t: &Trip) -> ExportValue {
    text(&t.customer_name)
}

fn driver(t: &Trip) -> ExportValue {
    text(&t.driver_name)
}

fn destination(t: &Trip) -> ExportValue {
    text(&t.destination)
}

fn price(t: &Trip) -> ExportValue {
    ExportValue::Number(t.price)
}

fn departure_time(t: &Trip) -> ExportValue {
    text(&t.departure_time)
}

fn departure_date(t: &Trip) -> ExportValue {
    text(&t.departure_date)
}

fn customer_phone(t: &Trip) -> ExportValue {
    text(&t.customer_phone)
}

fn notes(t: &Trip) -> ExportValue {
    text(&t.notes)
}

fn created_at(t: &Trip) -> ExportValue {
    ExportValue::Text(t.created_at.to_rfc3339())
}

const TRIP_COLUMNS: [Column; 8] = [
    ("Customer", customer),
    ("Driver", driver),
    ("Destination", destination),
    ("Price", price),
    ("Departure time", departure_time),
    ("Departure date", departure_date),
    ("Customer phone", customer_phone),
    ("Notes", notes),
];

/// Trips departing on `date`, in store order.
pub fn daily_trips(trips: &[Trip], date: &str) -> Result<ExportTable, ValidationError> {
    ExportTable::build(
        format!("trips_{date}"),
        &TRIP_COLUMNS,
        trips.iter().filter(|trip| trip.departure_date == date),
    )
}

pub fn all_trips(trips: &[Trip]) -> Result<ExportTable, ValidationError> {
    let mut columns = TRIP_COLUMNS.to_vec();
    columns.push(("Created at", created_at));
    ExportTable::build("all_trips".to_string(), &columns, trips.iter())
}
