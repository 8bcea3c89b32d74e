//! Revenue statistics over trip and driver snapshots.
//!
//! Trips are joined to drivers by `driver_name == name`. Trips whose driver
//! name matches no current driver still count towards day/period totals but
//! never appear in a per-driver breakdown.

use chrono::{Datelike, Months, NaiveDate};

use crate::{
    error::ValidationError,
    models::{
        trip::DATE_FORMAT, Driver, DriverRevenue, MonthlyRevenue, Revenue, Summary, Trip,
    },
};

fn revenue<'a>(trips: impl IntoIterator<Item = &'a Trip>) -> Revenue {
    trips.into_iter().fold(Revenue::default(), |acc, trip| Revenue {
        count: acc.count + 1,
        total: acc.total + trip.price,
    })
}

fn in_range(trip: &Trip, start: &str, end: &str) -> bool {
    start <= trip.departure_date.as_str() && trip.departure_date.as_str() <= end
}

fn require_bounds(start: &str, end: &str) -> Result<(), ValidationError> {
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(ValidationError::MissingDateBound);
    }
    Ok(())
}

pub fn day_revenue(trips: &[Trip], date: &str) -> Revenue {
    revenue(trips.iter().filter(|trip| trip.departure_date == date))
}

/// Both bounds inclusive.
pub fn period_revenue(trips: &[Trip], start: &str, end: &str) -> Result<Revenue, ValidationError> {
    require_bounds(start, end)?;
    Ok(revenue(trips.iter().filter(|trip| in_range(trip, start, end))))
}

/// One entry per driver in driver order, including drivers without trips.
fn per_driver<'a>(
    drivers: &[Driver],
    trips: impl Iterator<Item = &'a Trip> + Clone,
) -> Vec<DriverRevenue> {
    drivers
        .iter()
        .map(|driver| {
            let Revenue { count, total } =
                revenue(trips.clone().filter(|trip| trip.driver_name == driver.name));
            DriverRevenue {
                name: driver.name.clone(),
                trip_count: count,
                revenue: total,
            }
        })
        .collect()
}

fn without_idle(entries: Vec<DriverRevenue>) -> Vec<DriverRevenue> {
    entries
        .into_iter()
        .filter(|entry| entry.trip_count > 0)
        .collect()
}

pub fn driver_revenue_by_day(trips: &[Trip], drivers: &[Driver], date: &str) -> Vec<DriverRevenue> {
    without_idle(per_driver(
        drivers,
        trips.iter().filter(|trip| trip.departure_date == date),
    ))
}

pub fn driver_revenue_by_period(
    trips: &[Trip],
    drivers: &[Driver],
    start: &str,
    end: &str,
) -> Result<Vec<DriverRevenue>, ValidationError> {
    require_bounds(start, end)?;
    Ok(without_idle(per_driver(
        drivers,
        trips.iter().filter(|trip| in_range(trip, start, end)),
    )))
}

/// All drivers ranked by trip count over every trip. Ties keep driver order.
pub fn driver_leaderboard(trips: &[Trip], drivers: &[Driver]) -> Vec<DriverRevenue> {
    let mut board = per_driver(drivers, trips.iter());
    board.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));
    board
}

pub fn best_driver(trips: &[Trip], drivers: &[Driver]) -> Option<DriverRevenue> {
    driver_leaderboard(trips, drivers).into_iter().next()
}

/// All-time totals per driver in driver order, idle drivers left out.
pub fn driver_performance(trips: &[Trip], drivers: &[Driver]) -> Vec<DriverRevenue> {
    without_idle(per_driver(drivers, trips.iter()))
}

pub fn summary(trips: &[Trip], drivers: &[Driver], today: NaiveDate) -> Summary {
    let day = today.format(DATE_FORMAT).to_string();
    let month = today.format("%Y-%m").to_string();
    let year = today.format("%Y").to_string();

    Summary {
        today: day_revenue(trips, &day),
        month: revenue(trips.iter().filter(|t| t.departure_date.starts_with(&month))),
        year: revenue(trips.iter().filter(|t| t.departure_date.starts_with(&year))),
        best_driver: best_driver(trips, drivers),
    }
}

/// Longest monthly series served.
pub const MAX_MONTHS: u32 = 120;

/// The last `months` calendar months up to and including `today`'s, oldest
/// first. Months without trips are present with zero totals.
pub fn monthly_revenue(
    trips: &[Trip],
    today: NaiveDate,
    months: u32,
) -> Result<Vec<MonthlyRevenue>, ValidationError> {
    if months > MAX_MONTHS {
        return Err(ValidationError::TooManyMonths {
            max: MAX_MONTHS,
            value: months,
        });
    }
    let Some(first_of_month) = today.with_day(1) else {
        return Ok(Vec::new());
    };

    let mut starts: Vec<_> = (0..months)
        .map_while(|back| first_of_month.checked_sub_months(Months::new(back)))
        .collect();
    starts.reverse();

    Ok(starts
        .into_iter()
        .map(|start| {
            let month = start.format("%Y-%m").to_string();
            let Revenue { count, total } =
                revenue(trips.iter().filter(|t| t.departure_date.starts_with(&month)));
            MonthlyRevenue {
                month,
                count,
                total,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn trip(date: &str, driver: &str, price: f64) -> Trip {
        Trip {
            id: format!("{date}-{driver}-{price}"),
            driver_name: driver.into(),
            customer_name: "Customer".into(),
            destination: "Center".into(),
            price,
            departure_time: "10:00".into(),
            departure_date: date.into(),
            customer_phone: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    fn driver(name: &str) -> Driver {
        Driver {
            id: name.into(),
            name: name.into(),
            phone: String::new(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Trip> {
        vec![trip("2024-01-01", "A", 100.0), trip("2024-01-02", "B", 50.0)]
    }

    #[test]
    fn day_revenue_uses_exact_date() {
        let got = day_revenue(&sample(), "2024-01-01");
        assert_eq!(
            got,
            Revenue {
                count: 1,
                total: 100.0
            }
        );
        assert_eq!(day_revenue(&sample(), "2024-01-03"), Revenue::default());
    }

    #[test]
    fn period_revenue_is_inclusive() {
        let got = period_revenue(&sample(), "2024-01-01", "2024-01-02").unwrap();
        assert_eq!(
            got,
            Revenue {
                count: 2,
                total: 150.0
            }
        );
    }

    #[test]
    fn period_requires_both_bounds() {
        assert_eq!(
            period_revenue(&sample(), "", "2024-01-02"),
            Err(ValidationError::MissingDateBound)
        );
        assert_eq!(
            driver_revenue_by_period(&sample(), &[], "2024-01-01", " "),
            Err(ValidationError::MissingDateBound)
        );
    }

    #[test]
    fn unknown_driver_counts_in_totals_only() {
        let trips = vec![trip("2024-01-01", "A", 10.0), trip("2024-01-01", "Ghost", 5.0)];
        let drivers = vec![driver("A"), driver("B")];
        assert_eq!(day_revenue(&trips, "2024-01-01").count, 2);
        let by_driver = driver_revenue_by_day(&trips, &drivers, "2024-01-01");
        assert_eq!(
            by_driver,
            vec![DriverRevenue {
                name: "A".into(),
                trip_count: 1,
                revenue: 10.0
            }]
        );
    }

    #[test]
    fn leaderboard_ties_keep_driver_order() {
        let trips = vec![
            trip("2024-01-01", "C", 1.0),
            trip("2024-01-01", "B", 1.0),
            trip("2024-01-02", "C", 1.0),
        ];
        let drivers = vec![driver("A"), driver("B"), driver("C"), driver("D")];
        let names: Vec<_> = driver_leaderboard(&trips, &drivers)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["C", "B", "A", "D"]);
        assert!(best_driver(&trips, &[]).is_none());
    }

    #[test]
    fn monthly_revenue_spans_year_boundary() {
        let trips = vec![trip("2023-12-31", "A", 7.0), trip("2024-02-10", "A", 3.0)];
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let months = monthly_revenue(&trips, today, 3).unwrap();
        let keys: Vec<_> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, ["2023-12", "2024-01", "2024-02"]);
        assert_eq!(months[0].total, 7.0);
        assert_eq!(months[1].count, 0);
        assert_eq!(months[2].count, 1);
    }

    #[test]
    fn monthly_revenue_is_capped() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            monthly_revenue(&[], today, u32::MAX),
            Err(ValidationError::TooManyMonths {
                max: MAX_MONTHS,
                value: u32::MAX
            })
        );
        assert_eq!(monthly_revenue(&[], today, MAX_MONTHS).unwrap().len(), 120);
    }

    #[test]
    fn monthly_revenue_stops_at_the_earliest_date() {
        let today = NaiveDate::MIN.with_day(1).unwrap();
        let months = monthly_revenue(&[], today, 5).unwrap();
        assert_eq!(months.len(), 1);
    }

    #[test]
    fn summary_groups_by_date_prefix() {
        let trips = vec![
            trip("2024-03-05", "A", 10.0),
            trip("2024-03-01", "A", 5.0),
            trip("2024-01-01", "B", 1.0),
            trip("2023-03-05", "B", 100.0),
        ];
        let drivers = vec![driver("B"), driver("A")];
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let got = summary(&trips, &drivers, today);
        assert_eq!(got.today.count, 1);
        assert_eq!(got.month.total, 15.0);
        assert_eq!(got.year.count, 3);
        // tie at two trips each, driver order decides
        assert_eq!(got.best_driver.map(|d| d.name), Some("B".to_string()));
    }
}
