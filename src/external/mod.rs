pub mod nominatim;
pub mod osrm;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, PlaceCandidate, RouteSummary},
    error::Error,
};

/// Turns free text into candidate places, best match first.
#[async_trait]
pub trait Geocoder {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error>;
}

/// Computes a driving route between two positions.
#[async_trait]
pub trait RoutePlanner {
    async fn route(&self, origin: Coordinates, destination: Coordinates)
        -> Result<RouteSummary, Error>;
}

/// Accepts either a bare host (`router.project-osrm.org`) or a full base URL.
fn base_url(api_base: &str) -> String {
    let api_base = api_base.trim_end_matches('/');

    if api_base.starts_with("http://") || api_base.starts_with("https://") {
        api_base.to_string()
    } else {
        format!("https://{}", api_base)
    }
}

#[test]
fn base_url_defaults_to_https() {
    assert_eq!(
        base_url("nominatim.openstreetmap.org"),
        "https://nominatim.openstreetmap.org"
    );
    assert_eq!(base_url("http://localhost:5000/"), "http://localhost:5000");
}
