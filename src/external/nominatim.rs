use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{base_url, Geocoder};
use crate::{
    config::Config,
    entities::{Coordinates, PlaceCandidate},
    error::{invalid_input_error, upstream_error, Error},
};

/// A search hit as returned by `/search?format=json`. Positions come back
/// as numeric strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub place_id: Option<u64>,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    api_base: String,
    country_codes: String,
    language: String,
    limit: u32,
}

impl Nominatim {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: config.nominatim_api_base.clone(),
            country_codes: config.country_codes.clone(),
            language: config.language.clone(),
            limit: config.result_limit,
        })
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
        let url = format!("{}/search", base_url(&self.api_base));

        let res = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, self.language.as_str())
            .query(&[("format", "json")])
            .query(&[("q", query)])
            .query(&[("countrycodes", self.country_codes.as_str())])
            .query(&[("limit", self.limit)])
            .query(&[("addressdetails", 1)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let places: Vec<Place> = res.json().await?;

        Ok(into_candidates(places))
    }
}

/// Keeps the order of hits, dropping any without a valid position.
pub fn into_candidates(places: Vec<Place>) -> Vec<PlaceCandidate> {
    places
        .into_iter()
        .filter_map(|place| match Coordinates::parse(&place.lat, &place.lon) {
            Ok(coordinates) => Some(PlaceCandidate {
                label: place.display_name,
                coordinates,
            }),
            Err(_) => {
                tracing::warn!("skipping place with invalid position: {:?}", place);
                None
            }
        })
        .collect()
}

#[test]
fn search_hits_become_candidates() {
    let body = r#"[
        {"place_id": 1, "display_name": "Chợ Bến Thành, Quận 1", "lat": "10.7725", "lon": "106.6980", "class": "amenity"},
        {"place_id": 2, "display_name": "Broken", "lat": "", "lon": "106.0"},
        {"display_name": "Nhà thờ Đức Bà", "lat": "10.7798", "lon": "106.6990"}
    ]"#;

    let places: Vec<Place> = serde_json::from_str(body).unwrap();
    let candidates = into_candidates(places);

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].label, "Chợ Bến Thành, Quận 1");
    assert_eq!(candidates[0].coordinates.lat, 10.7725);
    assert_eq!(candidates[0].coordinates.lng, 106.698);
    assert_eq!(candidates[1].label, "Nhà thờ Đức Bà");
}
