//! Timeline projection: which flights, stays and activities fall on a day.
//!
//! Projection is a pure function of the three collections and the day, so
//! the planner can be rebuilt from scratch after any change.
//!
//! - A flight is on a day when it departs on that calendar day.
//! - A stay is on every day `d` with `check_in <= d < check_out`; the
//!   check-out day itself is free.
//! - Activities are on their own `date`, ranked by `order`; equal ranks keep
//!   their input order.

use chrono::NaiveDate;
use shared::{Accommodation, Activity, Flight, PlannerDay, StayDay, TimelineItem, Trip, TripItinerary};

use super::date_range::trip_days;

pub fn flight_departs_on(flight: &Flight, day: NaiveDate) -> bool {
    flight.departure_date() == Some(day)
}

pub fn accommodation_occupies(accommodation: &Accommodation, day: NaiveDate) -> bool {
    accommodation.check_in <= day && day < accommodation.check_out
}

pub fn flights_on<'a>(flights: &'a [Flight], day: NaiveDate) -> Vec<&'a Flight> {
    flights.iter().filter(|flight| flight_departs_on(flight, day)).collect()
}

pub fn accommodations_on<'a>(accommodations: &'a [Accommodation], day: NaiveDate) -> Vec<&'a Accommodation> {
    accommodations
        .iter()
        .filter(|accommodation| accommodation_occupies(accommodation, day))
        .collect()
}

/// Activities of one day in display order
pub fn activities_on<'a>(activities: &'a [Activity], day: NaiveDate) -> Vec<&'a Activity> {
    let mut on_day: Vec<&Activity> = activities.iter().filter(|activity| activity.date == day).collect();
    // sort_by_key is stable
    on_day.sort_by_key(|activity| activity.order);
    on_day
}

/// Build one planner column
pub fn project_day(itinerary: &TripItinerary, day: NaiveDate) -> PlannerDay {
    let mut items: Vec<TimelineItem> = flights_on(&itinerary.flights, day)
        .into_iter()
        .map(|flight| TimelineItem::Flight { flight: flight.clone() })
        .collect();

    items.extend(accommodations_on(&itinerary.accommodations, day).into_iter().map(|accommodation| {
        let stay_day = if accommodation.check_in == day {
            StayDay::CheckIn
        } else {
            StayDay::Continuing
        };
        TimelineItem::Accommodation {
            accommodation: accommodation.clone(),
            stay_day,
        }
    }));

    PlannerDay {
        date: day,
        items,
        activities: activities_on(&itinerary.activities, day).into_iter().cloned().collect(),
    }
}

/// Build every planner column for the trip's date range
pub fn build_planner(trip: &Trip, itinerary: &TripItinerary) -> Vec<PlannerDay> {
    trip_days(trip)
        .into_iter()
        .map(|day| project_day(itinerary, day))
        .collect()
}
