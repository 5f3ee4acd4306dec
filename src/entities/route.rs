use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Location;

/// What a route planner reports for a pair of positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: LineString<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub token: Uuid,
    pub origin: Location,
    pub destination: Location,
    pub distance: f64,
    pub duration: f64,
    pub geometry: LineString<f64>,
}

impl Route {
    pub fn new(origin: Location, destination: Location, summary: RouteSummary) -> Self {
        Self {
            token: Uuid::new_v4(),
            origin,
            destination,
            distance: summary.distance_meters,
            duration: summary.duration_seconds,
            geometry: summary.geometry,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration / 60.0
    }

    pub fn connects(&self, origin: &Location, destination: &Location) -> bool {
        &self.origin == origin && &self.destination == destination
    }
}
