use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{FareQuery, Location, Route, VehicleClass};

/// A priced trip, echoing every input that went into the fare so a client
/// can render it without recomputing anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub token: Uuid,
    pub session_token: Uuid,
    pub route_token: Uuid,
    pub pickup: Location,
    pub drop: Location,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub vehicle: VehicleClass,
    pub vehicle_label: String,
    pub hour_of_day: i64,
    pub traffic_level: i64,
    pub fare: u64,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(session_token: Uuid, route: &Route, query: FareQuery) -> Self {
        let fare = query.estimate();

        Self {
            token: Uuid::new_v4(),
            session_token,
            route_token: route.token,
            pickup: route.origin.clone(),
            drop: route.destination.clone(),
            distance_km: query.distance_km,
            duration_minutes: route.duration_minutes(),
            vehicle_label: query.vehicle.label().into(),
            vehicle: query.vehicle,
            hour_of_day: query.hour_of_day,
            traffic_level: query.traffic_level,
            fare,
            created_at: Utc::now(),
        }
    }
}

#[test]
fn quote_echoes_route_and_options() {
    use crate::entities::{BookingOptions, Coordinates, LooseInteger, RouteSummary};
    use geo_types::LineString;

    let origin = Location::new(Coordinates::new(10.77, 106.69).unwrap(), "Ben Thanh".into());
    let destination = Location::from_coordinates(Coordinates::new(10.80, 106.66).unwrap());
    let route = Route::new(
        origin.clone(),
        destination.clone(),
        RouteSummary {
            distance_meters: 12500.0,
            duration_seconds: 1710.0,
            geometry: LineString::from(vec![(106.69, 10.77), (106.66, 10.80)]),
        },
    );

    let options = BookingOptions {
        vehicle: Some(VehicleClass::Bike),
        hour: Some(LooseInteger::Number(18.0)),
        traffic_level: Some(LooseInteger::Text("6".into())),
    };

    let session_token = Uuid::new_v4();
    let quote = Quote::new(session_token, &route, options.fare_query(route.distance_km()));

    assert_eq!(quote.session_token, session_token);
    assert_eq!(quote.route_token, route.token);
    assert_eq!(quote.pickup, origin);
    assert_eq!(quote.drop, destination);
    assert_eq!(quote.distance_km, 12.5);
    assert_eq!(quote.duration_minutes, 28.5);
    assert_eq!(quote.vehicle_label, "Motorbike");
    assert_eq!(quote.hour_of_day, 18);
    assert_eq!(quote.traffic_level, 6);
    assert_eq!(quote.fare, 151800);
}
