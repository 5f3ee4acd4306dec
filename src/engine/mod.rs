mod debounce;
mod helpers;
mod quote_api;
mod search_api;
mod session_api;

pub use debounce::{Debouncer, Ticket};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    api::API,
    config::Config,
    entities::{Quote, Role, Session},
    error::Error,
    external::{nominatim::Nominatim, osrm::Osrm, Geocoder, RoutePlanner},
};

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
pub type DynRoutePlanner = Arc<dyn RoutePlanner + Send + Sync>;

/// Search queries shorter than this never reach the geocoder.
pub const MIN_QUERY_LENGTH: usize = 3;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub struct Engine {
    sessions: Mutex<HashMap<Uuid, Session>>,
    quotes: Mutex<HashMap<Uuid, Quote>>,
    debouncer: Debouncer<(Uuid, Role)>,
    session_ttl: Duration,
    geocoder: DynGeocoder,
    planner: DynRoutePlanner,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let geocoder = Arc::new(Nominatim::new(config)?) as DynGeocoder;
        let planner = Arc::new(Osrm::new(config)?) as DynRoutePlanner;

        tracing::info!(
            nominatim = %config.nominatim_api_base,
            osrm = %config.osrm_api_base,
            debounce_ms = config.search_debounce.as_millis() as u64,
            session_ttl_secs = config.session_idle_timeout.as_secs(),
            "engine configured"
        );

        Ok(
            Self::with_providers(geocoder, planner, config.search_debounce)
                .with_session_ttl(config.session_idle_timeout),
        )
    }

    pub fn with_providers(
        geocoder: DynGeocoder,
        planner: DynRoutePlanner,
        search_debounce: Duration,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            quotes: Mutex::new(HashMap::new()),
            debouncer: Debouncer::new(search_debounce),
            session_ttl: DEFAULT_SESSION_TTL,
            geocoder,
            planner,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Removes sessions untouched for longer than the session TTL, along with
    /// their quotes and pending searches. Returns how many were removed.
    #[tracing::instrument(skip(self))]
    pub async fn evict_idle_sessions(&self, now: DateTime<Utc>) -> usize {
        let evicted: Vec<Uuid> = {
            let mut sessions = self.sessions.lock().await;

            let idle: Vec<Uuid> = sessions
                .values()
                .filter(|session| session.is_idle(now, self.session_ttl))
                .map(|session| session.token)
                .collect();

            for token in &idle {
                sessions.remove(token);
            }

            idle
        };

        if evicted.is_empty() {
            return 0;
        }

        self.release_sessions(&evicted).await;

        tracing::info!("evicted {} idle sessions", evicted.len());

        evicted.len()
    }

    /// Sweeps idle sessions every `period` until the engine is dropped.
    pub fn spawn_sweeper(engine: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let engine = Arc::downgrade(engine);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;

                let engine = match engine.upgrade() {
                    Some(engine) => engine,
                    None => break,
                };

                engine.evict_idle_sessions(Utc::now()).await;
            }
        })
    }
}

impl API for Engine {}

#[test]
fn idle_sessions_are_evicted_with_their_quotes() {
    use crate::api::{QuoteAPI, SessionAPI};
    use crate::entities::{BookingOptions, Coordinates};
    use crate::error::{quote_not_found_error, session_not_found_error};
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine().with_session_ttl(Duration::from_secs(60));

        let idle = engine.create_session().await.unwrap();
        let active = engine.create_session().await.unwrap();

        engine
            .click_map(idle.token, Coordinates::new(10.0, 106.0).unwrap())
            .await
            .unwrap();
        engine
            .click_map(idle.token, Coordinates::new(10.1, 106.1).unwrap())
            .await
            .unwrap();
        let quote = engine
            .create_quote(idle.token, BookingOptions::default())
            .await
            .unwrap();

        let ticket = engine
            .debouncer
            .settle((idle.token, Role::Pickup))
            .await
            .unwrap();

        engine
            .update_session(&idle.token, |session| {
                session.last_active = Utc::now() - chrono::Duration::minutes(5)
            })
            .await
            .unwrap();

        assert_eq!(engine.evict_idle_sessions(Utc::now()).await, 1);

        assert_eq!(
            engine.find_session(idle.token).await.unwrap_err(),
            session_not_found_error()
        );
        assert_eq!(
            engine.find_quote(quote.token).await.unwrap_err(),
            quote_not_found_error()
        );
        assert!(!engine.debouncer.is_current(&ticket).await);
        assert!(engine.find_session(active.token).await.is_ok());
    });
}

#[test]
fn sweeper_evicts_in_the_background() {
    use crate::api::SessionAPI;
    use crate::error::session_not_found_error;
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = Arc::new(test_engine().with_session_ttl(Duration::from_millis(20)));
        let session = engine.create_session().await.unwrap();

        let sweeper = Engine::spawn_sweeper(&engine, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(
            engine.find_session(session.token).await.unwrap_err(),
            session_not_found_error()
        );

        sweeper.abort();
    });
}
