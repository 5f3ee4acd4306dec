use super::{Engine, MIN_QUERY_LENGTH};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::SearchAPI,
    entities::{Role, SearchOutcome},
    error::Error,
};

#[async_trait]
impl SearchAPI for Engine {
    /// Debounced per session and field. Each call restarts the quiet period;
    /// results of any call that a later one overtook are discarded, even when
    /// its geocoder request was already in flight.
    #[tracing::instrument(skip(self))]
    async fn find_place_suggestions(
        &self,
        token: Uuid,
        field: Role,
        query: String,
    ) -> Result<SearchOutcome, Error> {
        self.fetch_session(&token).await?;

        let ticket = match self.debouncer.settle((token, field)).await {
            Some(ticket) => ticket,
            None => {
                tracing::debug!("search cancelled by a newer keystroke");
                return Ok(SearchOutcome::Superseded);
            }
        };

        let candidates = if query.chars().count() < MIN_QUERY_LENGTH {
            vec![]
        } else {
            match self.geocoder.search(&query).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    tracing::warn!("geocoding failed, reporting no results: {}", err);
                    vec![]
                }
            }
        };

        if !self.debouncer.is_current(&ticket).await {
            tracing::debug!("discarding stale search results");
            return Ok(SearchOutcome::Superseded);
        }

        tracing::info!("found {} candidates", candidates.len());

        Ok(SearchOutcome::Results { candidates })
    }
}

#[test]
fn short_queries_skip_the_geocoder() {
    use crate::api::SessionAPI;
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let geocoder = FakeGeocoder::new();
        let engine = engine_with(geocoder.clone(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        let outcome = engine
            .find_place_suggestions(session.token, Role::Pickup, "ab".into())
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Results { candidates: vec![] });
        assert!(geocoder.queries().is_empty());

        // whitespace counts toward the length
        engine
            .find_place_suggestions(session.token, Role::Pickup, " ab".into())
            .await
            .unwrap();

        assert_eq!(geocoder.queries(), vec![" ab".to_string()]);
    });
}

#[test]
fn burst_of_keystrokes_issues_one_request() {
    use crate::api::SessionAPI;
    use crate::test_utils::{candidate, engine_with, FakeGeocoder, FakePlanner};
    use std::time::Duration;

    tokio_test::block_on(async {
        let geocoder = FakeGeocoder::new()
            .with_results("ben thanh", vec![candidate("Ben Thanh Market", 10.7725, 106.698)]);
        let engine = engine_with(geocoder.clone(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        let first = engine.find_place_suggestions(session.token, Role::Pickup, "ben".into());
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            engine
                .find_place_suggestions(session.token, Role::Pickup, "ben thanh".into())
                .await
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), SearchOutcome::Superseded);
        assert_eq!(
            second.unwrap(),
            SearchOutcome::Results {
                candidates: vec![candidate("Ben Thanh Market", 10.7725, 106.698)]
            }
        );
        assert_eq!(geocoder.queries(), vec!["ben thanh".to_string()]);
    });
}

#[test]
fn slow_earlier_response_is_discarded() {
    use crate::api::SessionAPI;
    use crate::test_utils::{candidate, engine_with, FakeGeocoder, FakePlanner};
    use std::time::Duration;

    tokio_test::block_on(async {
        let geocoder = FakeGeocoder::new()
            .with_results("quan 1", vec![candidate("Quan 1", 10.7756, 106.7019)])
            .with_delay("quan 1", Duration::from_millis(200))
            .with_results("quan 10", vec![candidate("Quan 10", 10.7679, 106.6668)]);
        let engine = engine_with(geocoder.clone(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        let slow = engine.find_place_suggestions(session.token, Role::Drop, "quan 1".into());
        let fast = async {
            // after the first quiet period ends, while its request is in flight
            tokio::time::sleep(Duration::from_millis(80)).await;
            engine
                .find_place_suggestions(session.token, Role::Drop, "quan 10".into())
                .await
        };

        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow.unwrap(), SearchOutcome::Superseded);
        assert_eq!(
            fast.unwrap(),
            SearchOutcome::Results {
                candidates: vec![candidate("Quan 10", 10.7679, 106.6668)]
            }
        );
        assert_eq!(
            geocoder.queries(),
            vec!["quan 1".to_string(), "quan 10".to_string()]
        );
    });
}

#[test]
fn fields_debounce_independently() {
    use crate::api::SessionAPI;
    use crate::test_utils::{candidate, engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let geocoder = FakeGeocoder::new()
            .with_results("airport", vec![candidate("Tan Son Nhat", 10.8185, 106.6588)])
            .with_results("station", vec![candidate("Saigon Station", 10.7823, 106.6770)]);
        let engine = engine_with(geocoder.clone(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        let (pickup, drop) = tokio::join!(
            engine.find_place_suggestions(session.token, Role::Pickup, "airport".into()),
            engine.find_place_suggestions(session.token, Role::Drop, "station".into()),
        );

        assert!(matches!(pickup.unwrap(), SearchOutcome::Results { candidates } if candidates.len() == 1));
        assert!(matches!(drop.unwrap(), SearchOutcome::Results { candidates } if candidates.len() == 1));
    });
}

#[test]
fn geocoder_failure_reports_no_results() {
    use crate::api::SessionAPI;
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let engine = engine_with(FakeGeocoder::failing(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        let outcome = engine
            .find_place_suggestions(session.token, Role::Pickup, "district 7".into())
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Results { candidates: vec![] });
    });
}
