use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::QuoteAPI;
use crate::entities::{BookingOptions, LooseInteger, VehicleClass};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct EstimateParams {
    distance_km: f64,
    vehicle: Option<VehicleClass>,
    hour: Option<LooseInteger>,
    traffic_level: Option<LooseInteger>,
}

#[derive(Serialize, Deserialize)]
pub struct Estimate {
    distance_km: f64,
    vehicle: VehicleClass,
    vehicle_label: String,
    hour_of_day: i64,
    traffic_level: i64,
    fare: u64,
}

pub async fn estimate(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<EstimateParams>,
) -> Json<Estimate> {
    let options = BookingOptions {
        vehicle: params.vehicle,
        hour: params.hour,
        traffic_level: params.traffic_level,
    };

    let query = options.fare_query(params.distance_km);
    let fare = api.estimate_fare(query.clone());

    Json(Estimate {
        distance_km: query.distance_km,
        vehicle_label: query.vehicle.label().into(),
        vehicle: query.vehicle,
        hour_of_day: query.hour_of_day,
        traffic_level: query.traffic_level,
        fare,
    })
}

#[test]
fn query_string_options_are_loose() {
    let params: EstimateParams =
        serde_urlencoded::from_str("distance_km=12.5&vehicle=bike&hour=18&traffic_level=6")
            .unwrap();

    assert_eq!(params.distance_km, 12.5);
    assert_eq!(params.vehicle, Some(VehicleClass::Bike));
    assert_eq!(params.hour, Some(LooseInteger::Text("18".into())));
    assert_eq!(params.traffic_level, Some(LooseInteger::Text("6".into())));

    let params: EstimateParams =
        serde_urlencoded::from_str("distance_km=3&vehicle=scooter&hour=7pm").unwrap();

    assert_eq!(params.vehicle, Some(VehicleClass::Other("scooter".into())));
    assert_eq!(params.hour, Some(LooseInteger::Text("7pm".into())));
    assert_eq!(params.traffic_level, None);

    let missing_distance: Result<EstimateParams, _> = serde_urlencoded::from_str("vehicle=car4");
    assert!(missing_distance.is_err());
}
