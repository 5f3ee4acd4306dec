use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// A WGS84 position in degrees. Always finite and within range; every
/// constructor validates, including deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = Error;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat, raw.lng)
    }
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(invalid_input_error());
        }

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid_input_error());
        }

        Ok(Self { lat, lng })
    }

    /// Parses the numeric-string encoding geocoders use for positions.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, Error> {
        let lat: f64 = lat.trim().parse().map_err(|_| invalid_input_error())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid_input_error())?;

        Coordinates::new(lat, lng)
    }

    pub fn display_text(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.lng,
            y: coordinates.lat,
        }
    }
}

/// One trip endpoint: a position and the text shown for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: Coordinates,
    pub description: String,
}

impl Location {
    pub fn new(coordinates: Coordinates, description: String) -> Self {
        Self {
            coordinates,
            description,
        }
    }

    /// A location picked directly on the map, labelled by its position.
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            description: coordinates.display_text(),
            coordinates,
        }
    }
}

#[test]
fn coordinates_reject_out_of_range() {
    assert!(Coordinates::new(10.775, 106.7).is_ok());
    assert!(Coordinates::new(90.0, -180.0).is_ok());
    assert!(Coordinates::new(90.5, 0.0).is_err());
    assert!(Coordinates::new(0.0, 180.1).is_err());
    assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn coordinates_parse_numeric_strings() {
    let coordinates = Coordinates::parse("10.7769", " 106.7009 ").unwrap();
    assert_eq!(coordinates.lat, 10.7769);
    assert_eq!(coordinates.lng, 106.7009);

    assert!(Coordinates::parse("north", "106.7").is_err());
    assert!(Coordinates::parse("NaN", "106.7").is_err());
}

#[test]
fn coordinates_deserialization_validates() {
    let ok: Result<Coordinates, _> = serde_json::from_str(r#"{"lat": 10.8, "lng": 106.6}"#);
    assert!(ok.is_ok());

    let bad: Result<Coordinates, _> = serde_json::from_str(r#"{"lat": 120.0, "lng": 106.6}"#);
    assert!(bad.is_err());
}

#[test]
fn map_click_location_is_labelled_with_position() {
    let coordinates = Coordinates::new(10.775, 106.7).unwrap();
    let location = Location::from_coordinates(coordinates);

    assert_eq!(location.description, "10.775000, 106.700000");

    let point: Point<f64> = coordinates.into();
    assert_eq!(point.x(), 106.7);
    assert_eq!(point.y(), 10.775);
}
