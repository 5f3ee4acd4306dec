use async_trait::async_trait;
use geo_types::LineString;
use serde::{Deserialize, Serialize};

use super::{base_url, RoutePlanner};
use crate::{
    config::Config,
    entities::{Coordinates, RouteSummary},
    error::{no_route_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub distance: f64,
    pub duration: f64,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response {
    pub code: String,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug)]
pub struct Osrm {
    client: reqwest::Client,
    api_base: String,
}

impl Osrm {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: config.osrm_api_base.clone(),
        })
    }
}

#[async_trait]
impl RoutePlanner for Osrm {
    #[tracing::instrument(skip(self))]
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteSummary, Error> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            base_url(&self.api_base),
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        );

        let res = self
            .client
            .get(url)
            .query(&[("overview", "full")])
            .query(&[("geometries", "geojson")])
            .query(&[("alternatives", "false")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        // OSRM reports unroutable input as a 400 with a JSON body
        if status_code != 200 && status_code != 400 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        into_summary(data)
    }
}

/// Takes the first route of a response.
pub fn into_summary(data: Response) -> Result<RouteSummary, Error> {
    match data.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(no_route_error()),
        code => {
            tracing::warn!("routing failed with code {}: {:?}", code, data.message);
            return Err(upstream_error());
        }
    }

    let route = data
        .routes
        .into_iter()
        .next()
        .ok_or_else(no_route_error)?;

    let geometry: LineString<f64> = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| (lng, lat))
        .collect::<Vec<_>>()
        .into();

    Ok(RouteSummary {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry,
    })
}

#[test]
fn first_route_is_summarized() {
    let body = r#"{
        "code": "Ok",
        "routes": [
            {
                "distance": 4512.3,
                "duration": 612.8,
                "weight": 612.8,
                "geometry": {"type": "LineString", "coordinates": [[106.698, 10.7725], [106.699, 10.7798]]}
            },
            {
                "distance": 9000.0,
                "duration": 900.0,
                "geometry": {"type": "LineString", "coordinates": []}
            }
        ],
        "waypoints": []
    }"#;

    let data: Response = serde_json::from_str(body).unwrap();
    let summary = into_summary(data).unwrap();

    assert_eq!(summary.distance_meters, 4512.3);
    assert_eq!(summary.duration_seconds, 612.8);
    assert_eq!(summary.geometry.0.len(), 2);
    assert_eq!(summary.geometry.0[0].x, 106.698);
    assert_eq!(summary.geometry.0[0].y, 10.7725);
}

#[test]
fn unroutable_responses_are_no_route() {
    let data: Response =
        serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#).unwrap();
    assert_eq!(into_summary(data), Err(no_route_error()));

    let data: Response = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
    assert_eq!(into_summary(data), Err(no_route_error()));

    let data: Response = serde_json::from_str(r#"{"code": "TooBig"}"#).unwrap();
    assert_eq!(into_summary(data), Err(upstream_error()));
}
