use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::QuoteAPI,
    entities::{BookingOptions, FareQuery, Quote, Route},
    error::{
        incomplete_selection_error, invalid_state_error, no_route_error, quote_not_found_error,
        Error,
    },
};

#[async_trait]
impl QuoteAPI for Engine {
    /// Routes between the session's endpoints and prices the trip. The
    /// previously displayed route is dropped first; the new one is kept only
    /// if the selection did not change while it was being computed.
    #[tracing::instrument(skip(self))]
    async fn create_quote(&self, token: Uuid, options: BookingOptions) -> Result<Quote, Error> {
        let (revision, pickup, drop) = self
            .update_session(&token, |session| {
                let (pickup, drop) = session
                    .selection
                    .endpoints()
                    .map(|(pickup, drop)| (pickup.clone(), drop.clone()))
                    .ok_or_else(incomplete_selection_error)?;

                session.route = None;

                Ok::<_, Error>((session.revision, pickup, drop))
            })
            .await??;

        let summary = self
            .planner
            .route(pickup.coordinates, drop.coordinates)
            .await
            .map_err(|err| {
                tracing::warn!("routing failed: {}", err);
                no_route_error()
            })?;

        let route = Route::new(pickup, drop, summary);

        let attached = self
            .update_session(&token, |session| session.attach_route(revision, route.clone()))
            .await?;

        if !attached {
            tracing::warn!("selection changed while routing, discarding route");
            return Err(invalid_state_error());
        }

        let quote = Quote::new(token, &route, options.fare_query(route.distance_km()));

        tracing::info!(
            fare = quote.fare,
            distance_km = quote.distance_km,
            vehicle = quote.vehicle.name(),
            "quoted trip"
        );

        self.quotes.lock().await.insert(quote.token, quote.clone());

        Ok(quote)
    }

    #[tracing::instrument(skip(self))]
    async fn find_quote(&self, token: Uuid) -> Result<Quote, Error> {
        self.quotes
            .lock()
            .await
            .get(&token)
            .cloned()
            .ok_or_else(quote_not_found_error)
    }

    fn estimate_fare(&self, query: FareQuery) -> u64 {
        query.estimate()
    }
}

#[test]
fn booking_requires_both_endpoints() {
    use crate::api::SessionAPI;
    use crate::entities::Coordinates;
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let planner = FakePlanner::straight_line(12500.0, 1710.0);
        let engine = engine_with(FakeGeocoder::new(), planner.clone());
        let session = engine.create_session().await.unwrap();

        engine
            .click_map(session.token, Coordinates::new(10.0, 106.0).unwrap())
            .await
            .unwrap();

        let result = engine
            .create_quote(session.token, BookingOptions::default())
            .await;

        assert_eq!(result.unwrap_err(), incomplete_selection_error());
        assert_eq!(planner.calls(), 0);

        let after = engine.find_session(session.token).await.unwrap();
        assert_eq!(after.revision, 1);
    });
}

#[test]
fn booking_prices_the_routed_trip() {
    use crate::api::SessionAPI;
    use crate::entities::{Coordinates, LooseInteger, VehicleClass};
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let planner = FakePlanner::straight_line(12500.0, 1710.0);
        let engine = engine_with(FakeGeocoder::new(), planner.clone());
        let session = engine.create_session().await.unwrap();

        engine
            .click_map(session.token, Coordinates::new(10.7725, 106.698).unwrap())
            .await
            .unwrap();
        engine
            .click_map(session.token, Coordinates::new(10.8185, 106.6588).unwrap())
            .await
            .unwrap();

        let options = BookingOptions {
            vehicle: Some(VehicleClass::Bike),
            hour: Some(LooseInteger::Text("18".into())),
            traffic_level: Some(LooseInteger::Number(6.0)),
        };

        let quote = engine.create_quote(session.token, options).await.unwrap();

        assert_eq!(quote.fare, 151800);
        assert_eq!(quote.distance_km, 12.5);
        assert_eq!(quote.duration_minutes, 28.5);
        assert_eq!(planner.calls(), 1);

        let session = engine.find_session(session.token).await.unwrap();
        assert_eq!(session.route.map(|route| route.token), Some(quote.route_token));

        let stored = engine.find_quote(quote.token).await.unwrap();
        assert_eq!(stored, quote);
    });
}

#[test]
fn booking_defaults_hour_and_traffic() {
    use crate::api::SessionAPI;
    use crate::entities::{estimate_fare, Coordinates, VehicleClass};
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let engine = engine_with(FakeGeocoder::new(), FakePlanner::straight_line(5000.0, 600.0));
        let session = engine.create_session().await.unwrap();

        engine
            .click_map(session.token, Coordinates::new(10.0, 106.0).unwrap())
            .await
            .unwrap();
        engine
            .click_map(session.token, Coordinates::new(10.1, 106.1).unwrap())
            .await
            .unwrap();

        let options: BookingOptions =
            serde_json::from_str(r#"{"vehicle": "car4", "hour": "", "traffic_level": "heavy"}"#)
                .unwrap();

        let quote = engine.create_quote(session.token, options).await.unwrap();

        assert_eq!(quote.hour_of_day, 8);
        assert_eq!(quote.traffic_level, 3);
        assert_eq!(quote.fare, estimate_fare(5.0, &VehicleClass::Car4, 8, 3));
    });
}

#[test]
fn routing_failure_leaves_selection_unchanged() {
    use crate::api::SessionAPI;
    use crate::entities::Coordinates;
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};

    tokio_test::block_on(async {
        let engine = engine_with(FakeGeocoder::new(), FakePlanner::unroutable());
        let session = engine.create_session().await.unwrap();

        engine
            .click_map(session.token, Coordinates::new(10.0, 106.0).unwrap())
            .await
            .unwrap();
        let before = engine
            .click_map(session.token, Coordinates::new(10.1, 106.1).unwrap())
            .await
            .unwrap();

        let result = engine
            .create_quote(session.token, BookingOptions::default())
            .await;
        assert_eq!(result.unwrap_err(), no_route_error());

        let after = engine.find_session(session.token).await.unwrap();
        assert_eq!(after.selection, before.selection);
        assert_eq!(after.revision, before.revision);
        assert!(after.route.is_none());
    });
}

#[test]
fn selection_change_during_routing_discards_route() {
    use crate::api::SessionAPI;
    use crate::entities::Coordinates;
    use crate::test_utils::{engine_with, FakeGeocoder, FakePlanner};
    use std::time::Duration;

    tokio_test::block_on(async {
        let planner =
            FakePlanner::straight_line(3000.0, 400.0).with_delay(Duration::from_millis(100));
        let engine = engine_with(FakeGeocoder::new(), planner);
        let session = engine.create_session().await.unwrap();

        engine
            .click_map(session.token, Coordinates::new(10.0, 106.0).unwrap())
            .await
            .unwrap();
        engine
            .click_map(session.token, Coordinates::new(10.1, 106.1).unwrap())
            .await
            .unwrap();

        let booking = engine.create_quote(session.token, BookingOptions::default());
        let swap = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            engine.swap(session.token).await
        };

        let (booking, swap) = tokio::join!(booking, swap);

        assert_eq!(booking.unwrap_err(), invalid_state_error());
        assert!(swap.unwrap().route.is_none());

        let after = engine.find_session(session.token).await.unwrap();
        assert!(after.route.is_none());
    });
}

#[test]
fn unknown_quote_is_not_found() {
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine();

        let result = engine.find_quote(Uuid::new_v4()).await;
        assert_eq!(result.unwrap_err(), quote_not_found_error());
    });
}
