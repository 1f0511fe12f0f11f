use chrono::NaiveDate;
use shared::{CurrencyCode, Flight, StayDay, TimelineItem, TripStatus};
use tempfile::TempDir;
use trip_planner_backend::domain::commands::activities::{CreateActivityCommand, MoveActivityCommand};
use trip_planner_backend::domain::commands::trips::{CreateTripCommand, TripListQuery};
use trip_planner_backend::domain::export_service::export_to_json;
use trip_planner_backend::domain::models::ExchangeRates;
use trip_planner_backend::{initialize_backend, AppState, PlannerConfig};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

async fn backend(temp_dir: &TempDir) -> AppState {
    let config = PlannerConfig {
        data_directory: temp_dir.path().join("data"),
        ..PlannerConfig::default()
    };
    initialize_backend(config).await.unwrap()
}

async fn create_trip(state: &AppState, name: &str) -> String {
    state
        .trip_service
        .create_trip(CreateTripCommand {
            name: name.to_string(),
            destination: "Tokyo".to_string(),
            start_date: date("2024-01-01"),
            end_date: date("2024-01-04"),
            status: Some(TripStatus::Booked),
            description: None,
            budget: Some("R 40,000".to_string()),
            cover_image: None,
        })
        .await
        .unwrap()
        .id
}

fn flight(trip_id: &str, departure_time: &str, price: f64) -> Flight {
    Flight {
        id: String::new(),
        trip_id: trip_id.to_string(),
        airline: "Qatar Airways".to_string(),
        flight_number: "QR1369".to_string(),
        departure_airport: "JNB".to_string(),
        arrival_airport: "HND".to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: departure_time.to_string(),
        price,
        currency: CurrencyCode::usd(),
        stops: Vec::new(),
        booking_link: None,
        notes: None,
        is_confirmed: true,
        created_at: String::new(),
    }
}

fn activity(trip_id: &str, name: &str, day: &str) -> CreateActivityCommand {
    CreateActivityCommand {
        trip_id: trip_id.to_string(),
        name: name.to_string(),
        date: date(day),
        link: None,
        notes: None,
        duration: None,
        cost: Some(50.0),
        currency: CurrencyCode::usd(),
        is_confirmed: false,
        order: None,
    }
}

#[tokio::test]
async fn test_planner_move_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let state = backend(&temp_dir).await;
    let trip_id = create_trip(&state, "Japan").await;

    state.activity_service.add_activity(activity(&trip_id, "A", "2024-01-01")).await.unwrap();
    let b = state.activity_service.add_activity(activity(&trip_id, "B", "2024-01-01")).await.unwrap();
    state.activity_service.add_activity(activity(&trip_id, "C", "2024-01-01")).await.unwrap();

    let result = state
        .activity_service
        .move_activity(MoveActivityCommand {
            trip_id: trip_id.clone(),
            activity_id: b.id.clone(),
            destination_date: date("2024-01-02"),
            destination_index: 0,
        })
        .await
        .unwrap();
    assert_eq!(result.applied.len(), 2);

    let planner = state.itinerary_service.planner(&trip_id).await.unwrap();
    let names = |day: usize| -> Vec<String> { planner[day].activities.iter().map(|a| a.name.clone()).collect() };
    assert_eq!(planner.len(), 4);
    assert_eq!(names(0), vec!["A", "C"]);
    assert_eq!(names(1), vec!["B"]);
    assert_eq!(planner[0].activities[1].order, 1);
}

#[tokio::test]
async fn test_trip_lifecycle_with_budget_and_cascade() {
    let temp_dir = TempDir::new().unwrap();
    let state = backend(&temp_dir).await;
    let trip_id = create_trip(&state, "Japan").await;
    let keep_id = create_trip(&state, "Japan again").await;

    state.itinerary_service.add_flight(flight(&trip_id, "2024-01-01T09:00", 100.0)).await.unwrap();
    state.activity_service.add_activity(activity(&trip_id, "Museum", "2024-01-02")).await.unwrap();
    state.note_service.save_note(&trip_id, "Bring yen").await.unwrap();

    let without_rates = state.budget_service.trip_budget(&trip_id).await.unwrap();
    assert!(!without_rates.rates_available);
    assert_eq!(without_rates.total_in_base, 0.0);
    assert_eq!(without_rates.by_currency[&CurrencyCode::usd()].overall.total, 150.0);

    state
        .rate_provider
        .set_rates(ExchangeRates::new().with_rate("USD", 18.0).with_rate("ZAR", 1.0));
    let with_rates = state.budget_service.trip_budget(&trip_id).await.unwrap();
    assert!((with_rates.total_in_base - 2700.0).abs() < 1e-9);
    assert!((with_rates.confirmed_in_base - 1800.0).abs() < 1e-9);
    assert_eq!(with_rates.target.map(|t| t.target), Some(40000.0));

    let planner = state.itinerary_service.planner(&trip_id).await.unwrap();
    assert!(matches!(planner[0].items[0], TimelineItem::Flight { .. }));

    let map = state.visited_map().await.unwrap().unwrap();
    assert!(map.visited_country_codes.contains("JPN"));
    assert!(map.visited_country_codes.contains("ZAF"));

    let deleted = state.trip_service.delete_trip(&trip_id).await.unwrap();
    assert!(deleted.trip_deleted);
    assert_eq!(deleted.flights_deleted, 1);
    assert_eq!(deleted.activities_deleted, 1);
    assert_eq!(deleted.notes_deleted, 1);

    let remaining = state.trip_service.list_trips(TripListQuery::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep_id);
    assert!(state.note_service.get_note(&trip_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_export_import_round_trip_remaps_ownership() {
    let temp_dir = TempDir::new().unwrap();
    let state = backend(&temp_dir).await;
    let trip_id = create_trip(&state, "Japan").await;

    let first = state.itinerary_service.add_flight(flight(&trip_id, "2024-01-01T09:00", 100.0)).await.unwrap();
    let second = state.itinerary_service.add_flight(flight(&trip_id, "2024-01-04T21:00", 120.0)).await.unwrap();

    let export = state.export_service.export_trip(&trip_id).await.unwrap();
    let imported = state
        .export_service
        .import_trip_json(&export_to_json(&export).unwrap())
        .await
        .unwrap();

    assert_ne!(imported.id, trip_id);
    let flights = state.itinerary_service.list_flights(&imported.id).await.unwrap();
    assert_eq!(flights.len(), 2);
    for flight in &flights {
        assert_eq!(flight.trip_id, imported.id);
        assert_ne!(flight.id, first.id);
        assert_ne!(flight.id, second.id);
    }
}

#[tokio::test]
async fn test_stays_are_tagged_on_the_planner() {
    let temp_dir = TempDir::new().unwrap();
    let state = backend(&temp_dir).await;
    let trip_id = create_trip(&state, "Japan").await;

    state
        .itinerary_service
        .add_accommodation(shared::Accommodation {
            id: String::new(),
            trip_id: trip_id.clone(),
            name: "Park Hyatt".to_string(),
            accommodation_type: shared::AccommodationType::Hotel,
            location: "Shinjuku".to_string(),
            check_in: date("2024-01-01"),
            check_out: date("2024-01-04"),
            price: 900.0,
            currency: CurrencyCode::usd(),
            platform: None,
            booking_link: None,
            notes: None,
            is_confirmed: true,
            created_at: String::new(),
        })
        .await
        .unwrap();

    let planner = state.itinerary_service.planner(&trip_id).await.unwrap();
    let stay_days: Vec<Option<StayDay>> = planner
        .iter()
        .map(|day| {
            day.items.iter().find_map(|item| match item {
                TimelineItem::Accommodation { stay_day, .. } => Some(*stay_day),
                _ => None,
            })
        })
        .collect();

    assert_eq!(
        stay_days,
        vec![Some(StayDay::CheckIn), Some(StayDay::Continuing), Some(StayDay::Continuing), None]
    );
}
