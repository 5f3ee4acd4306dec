use serde::{Deserialize, Serialize};

use crate::entities::VehicleClass;

pub const DEFAULT_HOUR_OF_DAY: i64 = 8;
pub const DEFAULT_TRAFFIC_LEVEL: i64 = 3;

pub const PEAK_HOUR_MULTIPLIER: f64 = 1.2;
pub const MAX_TRAFFIC_LEVEL: i64 = 10;
/// Surcharge per traffic level, applied at half weight.
pub const TRAFFIC_STEP: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareQuery {
    pub distance_km: f64,
    pub vehicle: VehicleClass,
    pub hour_of_day: i64,
    pub traffic_level: i64,
}

impl FareQuery {
    pub fn estimate(&self) -> u64 {
        estimate_fare(
            self.distance_km,
            &self.vehicle,
            self.hour_of_day,
            self.traffic_level,
        )
    }
}

pub fn is_peak_hour(hour_of_day: i64) -> bool {
    matches!(hour_of_day, 7..=9 | 17..=19)
}

/// Estimates the fare for a trip. Never fails: traffic is clamped to
/// `0..=10`, the result is floored at the vehicle's minimum fare and
/// rounded half away from zero.
///
/// Distance is taken as given, so a negative distance lowers the fare
/// before the minimum applies.
pub fn estimate_fare(
    distance_km: f64,
    vehicle: &VehicleClass,
    hour_of_day: i64,
    traffic_level: i64,
) -> u64 {
    let table = vehicle.fare_table();

    let mut fare = table.base + distance_km * table.per_km;

    if is_peak_hour(hour_of_day) {
        fare *= PEAK_HOUR_MULTIPLIER;
    }

    let traffic_level = traffic_level.clamp(0, MAX_TRAFFIC_LEVEL) as f64;
    fare *= 1.0 + traffic_level * TRAFFIC_STEP / 2.0;

    // NaN fails the comparison and falls back to the minimum too
    if !(fare >= table.minimum) {
        fare = table.minimum;
    }

    fare.round() as u64
}

/// An integer option as sent by a client form: a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseInteger {
    Number(f64),
    Text(String),
}

impl LooseInteger {
    /// Integer value of the option. Numbers are truncated; text yields its
    /// leading signed digits, so `"17h"` is 17 and `"1e1"` is 1. `None` when
    /// there is nothing to read.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Number(_) => None,
            Self::Text(text) => leading_integer(text),
        }
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let sign_len = text.len() - unsigned.len();

    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    if digits == 0 {
        return None;
    }

    text[..sign_len + digits].parse().ok()
}

/// Options a user submits when booking. Anything missing or unparsable
/// falls back to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingOptions {
    pub vehicle: Option<VehicleClass>,
    pub hour: Option<LooseInteger>,
    pub traffic_level: Option<LooseInteger>,
}

impl BookingOptions {
    pub fn vehicle(&self) -> VehicleClass {
        self.vehicle
            .clone()
            .unwrap_or_else(|| VehicleClass::Other(String::new()))
    }

    pub fn hour_of_day(&self) -> i64 {
        self.hour
            .as_ref()
            .and_then(LooseInteger::to_integer)
            .unwrap_or(DEFAULT_HOUR_OF_DAY)
    }

    pub fn traffic_level(&self) -> i64 {
        self.traffic_level
            .as_ref()
            .and_then(LooseInteger::to_integer)
            .unwrap_or(DEFAULT_TRAFFIC_LEVEL)
    }

    pub fn fare_query(&self, distance_km: f64) -> FareQuery {
        FareQuery {
            distance_km,
            vehicle: self.vehicle(),
            hour_of_day: self.hour_of_day(),
            traffic_level: self.traffic_level(),
        }
    }
}

#[cfg(test)]
const ALL_VEHICLES: [&str; 6] = ["bike", "bike_premium", "car4", "car7", "car_luxury", "unknown"];

#[test]
fn zero_distance_off_peak_costs_the_minimum() {
    for name in ALL_VEHICLES {
        let vehicle = VehicleClass::from(name);
        let minimum = vehicle.fare_table().minimum as u64;

        assert_eq!(estimate_fare(0.0, &vehicle, 12, 0), minimum, "{}", name);
        assert_eq!(estimate_fare(0.0, &vehicle, 3, 4), minimum, "{}", name);
    }
}

#[test]
fn zero_distance_can_exceed_minimum_when_surcharged() {
    // 15000 * 1.2 * 1.25 is above the 20000 floor
    let fare = estimate_fare(0.0, &VehicleClass::BikePremium, 8, 10);
    assert_eq!(fare, 22500);
}

#[test]
fn fare_is_monotonic_in_distance() {
    for name in ALL_VEHICLES {
        let vehicle = VehicleClass::from(name);

        for hour in [0, 8, 18, 23] {
            for traffic in [-3, 0, 5, 10, 20] {
                let mut previous = 0;
                for step in -20..400 {
                    let distance_km = step as f64 * 0.25;
                    let fare = estimate_fare(distance_km, &vehicle, hour, traffic);
                    assert!(fare >= previous, "{} {} {} {}", name, hour, traffic, distance_km);
                    previous = fare;
                }
            }
        }
    }
}

#[test]
fn peak_surcharge_applies_on_exact_hours() {
    let peak: Vec<i64> = (-2..30).filter(|hour| is_peak_hour(*hour)).collect();
    assert_eq!(peak, vec![7, 8, 9, 17, 18, 19]);

    let fare = estimate_fare(10.0, &VehicleClass::Car4, 8, 0);
    let expected = ((20000.0 + 10.0 * 12000.0) * 1.2_f64).max(30000.0).round() as u64;
    assert_eq!(fare, expected);
    assert_eq!(fare, 168000);

    assert_eq!(estimate_fare(10.0, &VehicleClass::Car4, 10, 0), 140000);
    assert_eq!(estimate_fare(10.0, &VehicleClass::Car4, 6, 0), 140000);
}

#[test]
fn traffic_level_is_clamped() {
    for name in ALL_VEHICLES {
        let vehicle = VehicleClass::from(name);

        assert_eq!(
            estimate_fare(7.3, &vehicle, 18, 15),
            estimate_fare(7.3, &vehicle, 18, 10)
        );
        assert_eq!(
            estimate_fare(7.3, &vehicle, 18, -5),
            estimate_fare(7.3, &vehicle, 18, 0)
        );
        assert_eq!(
            estimate_fare(7.3, &vehicle, 18, i64::MAX),
            estimate_fare(7.3, &vehicle, 18, 10)
        );
    }
}

#[test]
fn unknown_vehicle_uses_default_table() {
    let fare = estimate_fare(5.0, &VehicleClass::from("unknown"), 8, 0);
    assert_eq!(fare, 90000);
}

#[test]
fn peak_bike_trip_in_heavy_traffic() {
    let fare = estimate_fare(12.5, &VehicleClass::Bike, 18, 6);
    let expected = ((10000.0 + 12.5 * 8000.0) * 1.2_f64 * (1.0 + 6.0 * 0.05 / 2.0))
        .max(15000.0)
        .round() as u64;

    assert_eq!(fare, expected);
    assert_eq!(fare, 151800);
}

#[test]
fn negative_and_nan_distances_are_floored() {
    assert_eq!(estimate_fare(-40.0, &VehicleClass::Car7, 8, 10), 40000);
    assert_eq!(estimate_fare(f64::NAN, &VehicleClass::Car7, 8, 10), 40000);
}

#[test]
fn booking_options_fall_back_to_defaults() {
    let options: BookingOptions =
        serde_json::from_str(r#"{"vehicle": "car7", "hour": "late", "traffic_level": 9}"#)
            .unwrap();

    assert_eq!(options.vehicle(), VehicleClass::Car7);
    assert_eq!(options.hour_of_day(), DEFAULT_HOUR_OF_DAY);
    assert_eq!(options.traffic_level(), 9);

    let options = BookingOptions::default();
    let query = options.fare_query(3.5);

    assert_eq!(query.hour_of_day, 8);
    assert_eq!(query.traffic_level, 3);
    assert_eq!(query.vehicle.fare_table(), crate::entities::FareTable::DEFAULT);
}

#[test]
fn loose_integers_truncate() {
    assert_eq!(LooseInteger::Text(" 17 ".into()).to_integer(), Some(17));
    assert_eq!(LooseInteger::Text("18.9".into()).to_integer(), Some(18));
    assert_eq!(LooseInteger::Number(6.7).to_integer(), Some(6));
    assert_eq!(LooseInteger::Text("".into()).to_integer(), None);
    assert_eq!(LooseInteger::Text("inf".into()).to_integer(), None);
    assert_eq!(LooseInteger::Number(f64::NAN).to_integer(), None);
}

#[test]
fn loose_integers_read_leading_digits() {
    assert_eq!(LooseInteger::Text("17h".into()).to_integer(), Some(17));
    assert_eq!(LooseInteger::Text(" 8 pm".into()).to_integer(), Some(8));
    assert_eq!(LooseInteger::Text("1e1".into()).to_integer(), Some(1));
    assert_eq!(LooseInteger::Text("+7".into()).to_integer(), Some(7));
    assert_eq!(LooseInteger::Text("-2x".into()).to_integer(), Some(-2));
    assert_eq!(LooseInteger::Text("-".into()).to_integer(), None);
    assert_eq!(LooseInteger::Text("h17".into()).to_integer(), None);
    assert_eq!(LooseInteger::Text("99999999999999999999".into()).to_integer(), None);
}

#[test]
fn suffixed_options_price_like_their_leading_digits() {
    let options = BookingOptions {
        vehicle: Some(VehicleClass::Bike),
        hour: Some(LooseInteger::Text("18h".into())),
        traffic_level: Some(LooseInteger::Text("1e1".into())),
    };

    assert_eq!(options.hour_of_day(), 18);
    assert_eq!(options.traffic_level(), 1);
    assert_eq!(options.fare_query(12.5).estimate(), 135300);
}
