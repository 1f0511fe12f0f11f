//! Known places and the map of visited destinations.
//!
//! Destinations are free text, so lookup is forgiving: exact key first,
//! then the first table entry that equals the destination ignoring case or
//! whose key appears inside it ("Tokyo, Japan" resolves to Tokyo).

use shared::{GeoPoint, MapConnection, Trip, VisitedMap};
use std::collections::BTreeSet;

struct Place {
    key: &'static str,
    name: &'static str,
    longitude: f64,
    latitude: f64,
    country_code: &'static str,
}

const fn place(key: &'static str, name: &'static str, longitude: f64, latitude: f64, country_code: &'static str) -> Place {
    Place {
        key,
        name,
        longitude,
        latitude,
        country_code,
    }
}

// Table order matters for substring matches
const PLACES: &[Place] = &[
    place("South Africa", "South Africa", 24.6727, -28.4793, "ZAF"),
    place("Cape Town", "Cape Town", 18.4241, -33.9249, "ZAF"),
    place("Johannesburg", "Johannesburg", 28.0473, -26.2041, "ZAF"),
    place("ZAR", "South Africa", 24.6727, -28.4793, "ZAF"),
    place("Japan", "Japan", 138.2529, 36.2048, "JPN"),
    place("Tokyo", "Tokyo", 139.6503, 35.6762, "JPN"),
    place("Kyoto", "Kyoto", 135.7681, 35.0116, "JPN"),
    place("Osaka", "Osaka", 135.5023, 34.6937, "JPN"),
    place("USA", "USA", -95.7129, 37.0902, "USA"),
    place("New York", "New York", -74.006, 40.7128, "USA"),
    place("Los Angeles", "Los Angeles", -118.2437, 34.0522, "USA"),
    place("UK", "UK", -3.436, 55.3781, "GBR"),
    place("London", "London", -0.1278, 51.5074, "GBR"),
    place("France", "France", 2.2137, 46.2276, "FRA"),
    place("Paris", "Paris", 2.3522, 48.8566, "FRA"),
    place("Italy", "Italy", 12.5674, 41.8719, "ITA"),
    place("Rome", "Rome", 12.4964, 41.9028, "ITA"),
    place("Germany", "Germany", 10.4515, 51.1657, "DEU"),
    place("Berlin", "Berlin", 13.405, 52.52, "DEU"),
    place("Spain", "Spain", -3.7492, 40.4637, "ESP"),
    place("Madrid", "Madrid", -3.7038, 40.4168, "ESP"),
    place("Australia", "Australia", 133.7751, -25.2744, "AUS"),
    place("Sydney", "Sydney", 151.2093, -33.8688, "AUS"),
    place("Thailand", "Thailand", 100.9925, 15.87, "THA"),
    place("Bangkok", "Bangkok", 100.5018, 13.7563, "THA"),
];

impl Place {
    fn to_point(&self) -> GeoPoint {
        GeoPoint {
            name: self.name.to_string(),
            longitude: self.longitude,
            latitude: self.latitude,
            country_code: self.country_code.to_string(),
        }
    }
}

/// Resolve a free-text destination to a known place
pub fn lookup_destination(destination: &str) -> Option<GeoPoint> {
    if destination.is_empty() {
        return None;
    }
    if let Some(place) = PLACES.iter().find(|place| place.key == destination) {
        return Some(place.to_point());
    }

    let lowered = destination.to_lowercase();
    PLACES
        .iter()
        .find(|place| {
            let key = place.key.to_lowercase();
            key == lowered || lowered.contains(&key)
        })
        .map(Place::to_point)
}

/// Map data for a set of trips seen from `home`
///
/// Trips whose destination cannot be resolved are left off the map. Returns
/// None when `home` itself is unknown.
pub fn visited_map(trips: &[Trip], home: &str) -> Option<VisitedMap> {
    let home = lookup_destination(home)?;
    let points: Vec<GeoPoint> = trips
        .iter()
        .filter_map(|trip| lookup_destination(&trip.destination))
        .collect();

    let visited_country_codes: BTreeSet<String> = std::iter::once(home.country_code.clone())
        .chain(points.iter().map(|point| point.country_code.clone()))
        .collect();

    let connections = points
        .iter()
        .map(|point| MapConnection {
            from: (home.longitude, home.latitude),
            to: (point.longitude, point.latitude),
        })
        .collect();

    Some(VisitedMap {
        home,
        points,
        visited_country_codes,
        connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::sample_trip;

    fn trip_to(destination: &str) -> Trip {
        let mut trip = sample_trip(destination, "2024-01-01", "2024-01-05");
        trip.destination = destination.to_string();
        trip
    }

    #[test]
    fn test_lookup_exact_case_insensitive_and_substring() {
        assert_eq!(lookup_destination("Kyoto").map(|p| p.name), Some("Kyoto".to_string()));
        assert_eq!(lookup_destination("new york").map(|p| p.name), Some("New York".to_string()));
        assert_eq!(
            lookup_destination("Shibuya, Tokyo").map(|p| p.country_code),
            Some("JPN".to_string())
        );
        assert_eq!(lookup_destination("ZAR").map(|p| p.name), Some("South Africa".to_string()));
        assert_eq!(lookup_destination("Atlantis"), None);
        assert_eq!(lookup_destination(""), None);
    }

    #[test]
    fn test_visited_map_includes_home_and_resolved_trips() {
        let trips = vec![trip_to("Tokyo"), trip_to("Paris"), trip_to("Atlantis"), trip_to("Osaka")];

        let map = visited_map(&trips, "South Africa").unwrap();

        assert_eq!(map.home.country_code, "ZAF");
        assert_eq!(map.points.len(), 3);
        assert_eq!(
            map.visited_country_codes.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["FRA", "JPN", "ZAF"]
        );
        assert_eq!(map.connections.len(), 3);
        assert_eq!(map.connections[0].from, (24.6727, -28.4793));
        assert_eq!(map.connections[0].to, (139.6503, 35.6762));
    }

    #[test]
    fn test_unknown_home_has_no_map() {
        assert!(visited_map(&[trip_to("Tokyo")], "Atlantis").is_none());
    }
}
