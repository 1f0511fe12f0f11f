use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the entity store, e.g. "trip::3f2a9c..."
pub type EntityId = String;

/// Serde helper for id fields: accepts a string, an integer or null
///
/// Exports from the browser app carry numeric ids. Import discards and
/// remaps them, so any scalar is taken as-is rather than failing the file.
pub mod entity_id {
    use super::EntityId;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawId>::deserialize(deserializer)? {
            Some(RawId::Text(id)) => id,
            Some(RawId::Signed(id)) => id.to_string(),
            Some(RawId::Unsigned(id)) => id.to_string(),
            Some(RawId::Float(id)) => id.to_string(),
            None => EntityId::new(),
        })
    }
}

/// Parse the calendar day out of a date or date-time string.
///
/// Only the `YYYY-MM-DD` prefix is considered, so "2024-01-01",
/// "2024-01-01T23:30" and "2024-01-01T00:00:00Z" all land on the same day.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Lifecycle state of a trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planning,
    Booked,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Booked => "booked",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" => Ok(TripStatus::Planning),
            "booked" => Ok(TripStatus::Booked),
            "ongoing" => Ok(TripStatus::Ongoing),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            other => Err(format!("Unknown trip status: {}", other)),
        }
    }
}

/// Currency code used as an open key ("USD", "EUR", "ZAR", ...)
///
/// Codes are normalised to upper case on construction so "usd" and "USD"
/// land in the same budget bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn zar() -> Self {
        Self::new("ZAR")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Common accessors for every record owned by a trip
pub trait TripScoped {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: EntityId);
    fn trip_id(&self) -> &str;
    fn set_trip_id(&mut self, trip_id: EntityId);
}

/// Top-level container for one travel plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    pub name: String,
    pub destination: String,
    /// First day of the trip (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the trip (inclusive)
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text target budget, e.g. "$1,500 total"
    #[serde(default)]
    pub budget: Option<String>,
    /// Cover image reference (data URL or path)
    #[serde(default)]
    pub cover_image: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

impl Trip {
    /// Number of days between start and end, 0 when the range is inverted
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }

    /// Human readable duration ("1 day", "5 days")
    pub fn duration_label(&self) -> String {
        match self.duration_days() {
            1 => "1 day".to_string(),
            days => format!("{} days", days),
        }
    }
}

/// Intermediate stop on a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightStop {
    pub airport: String,
    /// Layover duration in minutes
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub trip_id: EntityId,
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    /// Local date-time, e.g. "2024-03-01T10:30"
    pub departure_time: String,
    /// Local date-time, e.g. "2024-03-01T18:05"
    pub arrival_time: String,
    pub price: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub stops: Vec<FlightStop>,
    #[serde(default)]
    pub booking_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
    pub created_at: String,
}

impl Flight {
    /// Calendar day the flight departs on
    pub fn departure_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.departure_time)
    }

    /// Total layover time across all stops, in minutes
    pub fn total_layover_minutes(&self) -> u32 {
        self.stops.iter().map(|stop| stop.duration).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationType {
    #[default]
    Hotel,
    #[serde(alias = "airbnb")]
    Apartment,
    Hostel,
    Guesthouse,
    Resort,
    Other,
}

impl AccommodationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "hotel",
            AccommodationType::Apartment => "apartment",
            AccommodationType::Hostel => "hostel",
            AccommodationType::Guesthouse => "guesthouse",
            AccommodationType::Resort => "resort",
            AccommodationType::Other => "other",
        }
    }
}

impl fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccommodationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hotel" => Ok(AccommodationType::Hotel),
            "apartment" | "airbnb" => Ok(AccommodationType::Apartment),
            "hostel" => Ok(AccommodationType::Hostel),
            "guesthouse" => Ok(AccommodationType::Guesthouse),
            "resort" => Ok(AccommodationType::Resort),
            "other" => Ok(AccommodationType::Other),
            other => Err(format!("Unknown accommodation type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub trip_id: EntityId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub accommodation_type: AccommodationType,
    pub location: String,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure day, not occupied
    pub check_out: NaiveDate,
    /// Total price of the stay, not nightly
    pub price: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub booking_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
    pub created_at: String,
}

impl Accommodation {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub trip_id: EntityId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub is_confirmed: bool,
    /// Rank among activities sharing the same date
    #[serde(default)]
    pub order: i64,
    pub created_at: String,
}

/// Free-text notes for a trip (at most one per trip)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub trip_id: EntityId,
    pub content: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "entity_id::deserialize")]
    pub trip_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// MIME type of the payload
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Opaque payload (base64 data URL)
    pub file: String,
    pub created_at: String,
}

impl TripScoped for Flight {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
    fn trip_id(&self) -> &str {
        &self.trip_id
    }
    fn set_trip_id(&mut self, trip_id: EntityId) {
        self.trip_id = trip_id;
    }
}

impl TripScoped for Accommodation {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
    fn trip_id(&self) -> &str {
        &self.trip_id
    }
    fn set_trip_id(&mut self, trip_id: EntityId) {
        self.trip_id = trip_id;
    }
}

impl TripScoped for Activity {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
    fn trip_id(&self) -> &str {
        &self.trip_id
    }
    fn set_trip_id(&mut self, trip_id: EntityId) {
        self.trip_id = trip_id;
    }
}

impl TripScoped for Note {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
    fn trip_id(&self) -> &str {
        &self.trip_id
    }
    fn set_trip_id(&mut self, trip_id: EntityId) {
        self.trip_id = trip_id;
    }
}

impl TripScoped for Document {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
    fn trip_id(&self) -> &str {
        &self.trip_id
    }
    fn set_trip_id(&mut self, trip_id: EntityId) {
        self.trip_id = trip_id;
    }
}

/// Flights, stays and activities of one trip, loaded together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripItinerary {
    pub flights: Vec<Flight>,
    pub accommodations: Vec<Accommodation>,
    pub activities: Vec<Activity>,
}

/// A new position for one activity, produced by a drag-and-drop move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityChange {
    pub activity_id: EntityId,
    pub date: NaiveDate,
    pub order: i64,
}

/// Which day of a stay a planner column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StayDay {
    CheckIn,
    Continuing,
}

/// Fixed (non-draggable) item shown in a planner column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem {
    Flight {
        flight: Flight,
    },
    Accommodation {
        accommodation: Accommodation,
        stay_day: StayDay,
    },
}

/// One column of the day-by-day planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerDay {
    pub date: NaiveDate,
    pub items: Vec<TimelineItem>,
    /// Activities of the day in display order
    pub activities: Vec<Activity>,
}

/// Totals split by booking state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSplit {
    pub total: f64,
    pub confirmed: f64,
    pub unconfirmed: f64,
}

impl CostSplit {
    pub fn add(&mut self, amount: f64, is_confirmed: bool) {
        self.total += amount;
        if is_confirmed {
            self.confirmed += amount;
        } else {
            self.unconfirmed += amount;
        }
    }
}

/// Native-currency totals for one currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyBreakdown {
    pub overall: CostSplit,
    pub flights: CostSplit,
    pub accommodations: CostSplit,
    pub activities: CostSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    UnderBudget,
    OverBudget,
}

/// Grand total measured against the trip's declared target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    pub target: f64,
    pub total_in_base: f64,
    /// Positive when money is left, negative when over
    pub remaining: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub base_currency: CurrencyCode,
    pub by_currency: BTreeMap<CurrencyCode, CurrencyBreakdown>,
    /// False when no exchange rates were available; base totals then read 0
    pub rates_available: bool,
    pub total_in_base: f64,
    pub confirmed_in_base: f64,
    pub target: Option<BudgetComparison>,
}

/// Counts shown on the trip overview cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripOverview {
    pub flight_count: usize,
    pub upcoming_flight_count: usize,
    pub stay_count: usize,
    pub confirmed_stay_count: usize,
    pub activity_count: usize,
    pub upcoming_activity_count: usize,
    pub has_note: bool,
}

/// State of the debounced note autosave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutosaveStatus {
    Idle,
    Pending,
    /// Saved at the contained RFC 3339 timestamp
    Saved(String),
    Failed(String),
}

/// File payload for trip export and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripExport {
    pub version: u32,
    pub exported_at: String,
    pub trip: Trip,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub accommodations: Vec<Accommodation>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// A known place on the world map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// ISO 3166-1 alpha-3 code
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConnection {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Data behind the map of visited destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedMap {
    pub home: GeoPoint,
    pub points: Vec<GeoPoint>,
    pub visited_country_codes: BTreeSet<String>,
    pub connections: Vec<MapConnection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calendar_date_ignores_time_component() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(parse_calendar_date("2024-01-01"), expected);
        assert_eq!(parse_calendar_date("2024-01-01T23:30"), expected);
        assert_eq!(parse_calendar_date("2024-01-01T00:00:00Z"), expected);
        assert_eq!(parse_calendar_date("2024-01-01 08:00"), expected);
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_currency_code_is_normalised() {
        assert_eq!(CurrencyCode::new(" usd "), CurrencyCode::usd());
        assert_eq!(CurrencyCode::from("zar").as_str(), "ZAR");

        let parsed: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(parsed, CurrencyCode::eur());
    }

    #[test]
    fn test_trip_status_round_trips_through_strings() {
        for status in [
            TripStatus::Planning,
            TripStatus::Booked,
            TripStatus::Ongoing,
            TripStatus::Completed,
            TripStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<TripStatus>(), Ok(status));
        }
        assert!("postponed".parse::<TripStatus>().is_err());
    }

    #[test]
    fn test_accommodation_accepts_legacy_airbnb_type() {
        let json = r#"{
            "name": "Loft",
            "type": "airbnb",
            "location": "Lisbon",
            "checkIn": "2024-05-01",
            "checkOut": "2024-05-04",
            "price": 300.0,
            "currency": "EUR",
            "createdAt": "2024-04-01T10:00:00Z"
        }"#;

        let stay: Accommodation = serde_json::from_str(json).unwrap();
        assert_eq!(stay.accommodation_type, AccommodationType::Apartment);
        assert_eq!(stay.nights(), 3);
        assert!(!stay.is_confirmed);
        assert!(stay.id.is_empty());
    }

    #[test]
    fn test_trip_duration_label() {
        let mut trip = Trip {
            id: "trip::1".to_string(),
            name: "Weekend".to_string(),
            destination: "Paris".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            status: TripStatus::Planning,
            description: None,
            budget: None,
            cover_image: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(trip.duration_label(), "1 day");

        trip.end_date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        assert_eq!(trip.duration_label(), "7 days");
    }

    #[test]
    fn test_flight_departure_date_and_layovers() {
        let flight = Flight {
            id: String::new(),
            trip_id: String::new(),
            airline: "KLM".to_string(),
            flight_number: "KL592".to_string(),
            departure_airport: "CPT".to_string(),
            arrival_airport: "AMS".to_string(),
            departure_time: "2024-03-01T22:15".to_string(),
            arrival_time: "2024-03-02T08:40".to_string(),
            price: 900.0,
            currency: CurrencyCode::eur(),
            stops: vec![
                FlightStop { airport: "JNB".to_string(), duration: 90 },
                FlightStop { airport: "NBO".to_string(), duration: 45 },
            ],
            booking_link: None,
            notes: None,
            is_confirmed: true,
            created_at: String::new(),
        };

        assert_eq!(flight.departure_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(flight.total_layover_minutes(), 135);
    }

    #[test]
    fn test_ids_accept_numbers_strings_and_null() {
        let note: Note = serde_json::from_str(
            r#"{"id": 4, "tripId": 3, "content": "hi", "updatedAt": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(note.id, "4");
        assert_eq!(note.trip_id, "3");

        let note: Note = serde_json::from_str(
            r#"{"id": "note::a", "tripId": null, "content": "hi", "updatedAt": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(note.id, "note::a");
        assert!(note.trip_id.is_empty());

        let missing: Result<Note, _> =
            serde_json::from_str(r#"{"id": [1], "content": "hi", "updatedAt": "2024-01-01T00:00:00Z"}"#);
        assert!(missing.is_err());
    }
}
