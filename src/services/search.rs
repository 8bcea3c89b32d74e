use crate::models::Trip;

/// Substring search over trips, keeping input order.
///
/// A blank query matches everything. Names, destination and notes are
/// compared case-insensitively; the phone number is matched literally
/// against the untrimmed query.
pub fn search_trips(trips: &[Trip], query: &str) -> Vec<Trip> {
    if query.trim().is_empty() {
        return trips.to_vec();
    }

    let folded = query.to_lowercase();
    trips
        .iter()
        .filter(|trip| matches(trip, query, &folded))
        .cloned()
        .collect()
}

fn matches(trip: &Trip, raw: &str, folded: &str) -> bool {
    [
        &trip.customer_name,
        &trip.driver_name,
        &trip.destination,
        &trip.notes,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(folded))
        || trip.customer_phone.contains(raw)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn trip(id: &str, customer: &str, phone: &str) -> Trip {
        Trip {
            id: id.into(),
            driver_name: "Khaled".into(),
            customer_name: customer.into(),
            destination: "Old Town".into(),
            price: 20.0,
            departure_time: "09:00".into(),
            departure_date: "2024-01-01".into(),
            customer_phone: phone.into(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let trips = vec![trip("1", "Ahmad", ""), trip("2", "Sara", "")];
        assert_eq!(search_trips(&trips, ""), trips);
        assert_eq!(search_trips(&trips, "   "), trips);
    }

    #[test]
    fn names_match_regardless_of_case() {
        let trips = vec![trip("1", "Ahmad", ""), trip("2", "Sara", "")];
        for query in ["ahmad", "AHMAD", "hMa"] {
            let found = search_trips(&trips, query);
            assert_eq!(found.len(), 1, "query {query:?}");
            assert_eq!(found[0].id, "1");
        }
    }

    #[test]
    fn phone_matches_literal_substrings_only() {
        let trips = vec![trip("1", "Ahmad", "0501234567")];
        assert_eq!(search_trips(&trips, "0501").len(), 1);
        assert!(search_trips(&trips, "501234568").is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let trips = vec![trip("1", "Ahmad", "")];
        assert!(search_trips(&trips, " ahmad ").is_empty());
    }
}
