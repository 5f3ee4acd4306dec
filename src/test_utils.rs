use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use geo_types::LineString;

use crate::{
    engine::{DynGeocoder, DynRoutePlanner, Engine},
    entities::{Coordinates, PlaceCandidate, RouteSummary},
    error::{no_route_error, upstream_error, Error},
    external::{Geocoder, RoutePlanner},
};

pub const TEST_DEBOUNCE: Duration = Duration::from_millis(50);

pub fn candidate(label: &str, lat: f64, lng: f64) -> PlaceCandidate {
    PlaceCandidate {
        label: label.into(),
        coordinates: Coordinates::new(lat, lng).unwrap(),
    }
}

pub fn engine_with(geocoder: FakeGeocoder, planner: FakePlanner) -> Engine {
    Engine::with_providers(
        Arc::new(geocoder) as DynGeocoder,
        Arc::new(planner) as DynRoutePlanner,
        TEST_DEBOUNCE,
    )
}

pub fn test_engine() -> Engine {
    engine_with(FakeGeocoder::new(), FakePlanner::straight_line(1000.0, 120.0))
}

/// Geocoder answering from a fixed table and recording every query it gets.
#[derive(Clone, Default)]
pub struct FakeGeocoder {
    results: HashMap<String, Vec<PlaceCandidate>>,
    delays: HashMap<String, Duration>,
    failing: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_results(mut self, query: &str, candidates: Vec<PlaceCandidate>) -> Self {
        self.results.insert(query.into(), candidates);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
        self.queries.lock().unwrap().push(query.into());

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing {
            return Err(upstream_error());
        }

        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

/// Route planner returning a fixed distance and duration for any pair.
#[derive(Clone)]
pub struct FakePlanner {
    summary: Option<(f64, f64)>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl FakePlanner {
    pub fn straight_line(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            summary: Some((distance_meters, duration_seconds)),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unroutable() -> Self {
        Self {
            summary: None,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutePlanner for FakePlanner {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteSummary, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (distance_meters, duration_seconds) = self.summary.ok_or_else(no_route_error)?;

        Ok(RouteSummary {
            distance_meters,
            duration_seconds,
            geometry: LineString::from(vec![origin, destination]),
        })
    }
}
