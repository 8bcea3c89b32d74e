use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    /// Name of the driver at booking time. Matched against `Driver::name`,
    /// never against a driver id, so renaming a driver detaches old trips.
    pub driver_name: String,
    pub customer_name: String,
    pub destination: String,
    pub price: f64,
    pub departure_time: String,
    pub departure_date: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub driver_name: String,
    pub customer_name: String,
    pub destination: String,
    pub price: f64,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub notes: String,
}

/// Fields to merge into an existing trip. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    pub driver_name: Option<String>,
    pub customer_name: Option<String>,
    pub destination: Option<String>,
    pub price: Option<f64>,
    pub departure_time: Option<String>,
    pub departure_date: Option<String>,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

impl NewTrip {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("driverName", &self.driver_name)?;
        require("customerName", &self.customer_name)?;
        require("destination", &self.destination)?;
        check_price(self.price)?;
        if let Some(date) = non_blank(&self.departure_date) {
            check_date("departureDate", date)?;
        }
        if let Some(time) = non_blank(&self.departure_time) {
            check_time("departureTime", time)?;
        }
        Ok(())
    }
}

impl TripPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.driver_name {
            require("driverName", name)?;
        }
        if let Some(name) = &self.customer_name {
            require("customerName", name)?;
        }
        if let Some(destination) = &self.destination {
            require("destination", destination)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(date) = &self.departure_date {
            check_date("departureDate", date)?;
        }
        if let Some(time) = &self.departure_time {
            check_time("departureTime", time)?;
        }
        Ok(())
    }
}

impl Trip {
    /// Same rules as a new trip, with both departure fields mandatory.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("driverName", &self.driver_name)?;
        require("customerName", &self.customer_name)?;
        require("destination", &self.destination)?;
        check_price(self.price)?;
        check_date("departureDate", &self.departure_date)?;
        check_time("departureTime", &self.departure_time)
    }

    /// Builds a trip from an already validated draft. Missing departure
    /// fields fall back to the local date and time of `created_at`.
    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: NewTrip) -> Self {
        let local = created_at.with_timezone(&Local);
        let departure_date = non_blank(&draft.departure_date)
            .map(str::to_string)
            .unwrap_or_else(|| local.format(DATE_FORMAT).to_string());
        let departure_time = non_blank(&draft.departure_time)
            .map(str::to_string)
            .unwrap_or_else(|| local.format(TIME_FORMAT).to_string());

        Self {
            id,
            driver_name: draft.driver_name,
            customer_name: draft.customer_name,
            destination: draft.destination,
            price: draft.price,
            departure_time,
            departure_date,
            customer_phone: draft.customer_phone,
            notes: draft.notes,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: TripPatch) {
        let TripPatch {
            driver_name,
            customer_name,
            destination,
            price,
            departure_time,
            departure_date,
            customer_phone,
            notes,
        } = patch;

        if let Some(value) = driver_name {
            self.driver_name = value;
        }
        if let Some(value) = customer_name {
            self.customer_name = value;
        }
        if let Some(value) = destination {
            self.destination = value;
        }
        if let Some(value) = price {
            self.price = value;
        }
        if let Some(value) = departure_time {
            self.departure_time = value;
        }
        if let Some(value) = departure_date {
            self.departure_date = value;
        }
        if let Some(value) = customer_phone {
            self.customer_phone = value;
        }
        if let Some(value) = notes {
            self.notes = value;
        }
    }
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(())
}

/// Dates are compared as strings elsewhere, so only the zero-padded
/// canonical form is accepted.
pub fn check_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let canonical = value.len() == 10
        && NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|date| date.format(DATE_FORMAT).to_string() == value)
            .unwrap_or(false);
    if !canonical {
        return Err(ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_time(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let canonical = value.len() == 5
        && NaiveTime::parse_from_str(value, TIME_FORMAT)
            .map(|time| time.format(TIME_FORMAT).to_string() == value)
            .unwrap_or(false);
    if !canonical {
        return Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewTrip {
        NewTrip {
            driver_name: "Khaled".into(),
            customer_name: "Ahmad".into(),
            destination: "Airport".into(),
            price: 40.0,
            departure_date: Some("2024-01-01".into()),
            departure_time: Some("08:30".into()),
            ..NewTrip::default()
        }
    }

    #[test]
    fn rejects_blank_required_fields() {
        let mut trip = draft();
        trip.customer_name = "   ".into();
        assert_eq!(
            trip.validate(),
            Err(ValidationError::MissingField("customerName"))
        );
    }

    #[test]
    fn rejects_negative_price() {
        let mut trip = draft();
        trip.price = -1.0;
        assert_eq!(trip.validate(), Err(ValidationError::InvalidPrice));
        trip.price = f64::NAN;
        assert_eq!(trip.validate(), Err(ValidationError::InvalidPrice));
    }

    #[test]
    fn rejects_non_canonical_dates() {
        let mut trip = draft();
        trip.departure_date = Some("2024-1-5".into());
        assert!(matches!(
            trip.validate(),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn missing_departure_defaults_to_creation_moment() {
        let mut trip = draft();
        trip.departure_date = None;
        trip.departure_time = Some(" ".into());
        assert!(trip.validate().is_ok());

        let created_at = Utc::now();
        let built = Trip::from_draft("t-1".into(), created_at, trip);
        let local = created_at.with_timezone(&Local);
        assert_eq!(built.departure_date, local.format(DATE_FORMAT).to_string());
        assert_eq!(built.departure_time, local.format(TIME_FORMAT).to_string());
    }

    #[test]
    fn stored_trip_needs_canonical_departure() {
        let mut trip = Trip::from_draft("t-1".into(), Utc::now(), draft());
        assert!(trip.validate().is_ok());
        trip.departure_time = "9".into();
        assert!(matches!(
            trip.validate(),
            Err(ValidationError::InvalidTime { .. })
        ));
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut trip = Trip::from_draft("t-1".into(), Utc::now(), draft());
        let before = trip.clone();
        trip.apply(TripPatch {
            price: Some(10.0),
            ..TripPatch::default()
        });
        assert_eq!(trip.price, 10.0);
        assert_eq!(
            Trip {
                price: before.price,
                ..trip.clone()
            },
            before
        );
    }
}
