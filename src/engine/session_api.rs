use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::SessionAPI,
    entities::{Coordinates, Location, Role, SelectionEvent, Session},
    error::{session_not_found_error, Error},
};

impl Engine {
    async fn apply_event(&self, token: Uuid, event: SelectionEvent) -> Result<Session, Error> {
        self.update_session(&token, |session| {
            session.apply(event);
            session.clone()
        })
        .await
    }
}

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_session(&self) -> Result<Session, Error> {
        let session = Session::new();

        self.sessions
            .lock()
            .await
            .insert(session.token, session.clone());

        tracing::info!("created session {}", session.token);

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, token: Uuid) -> Result<Session, Error> {
        self.fetch_session(&token).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_session(&self, token: Uuid) -> Result<(), Error> {
        self.sessions
            .lock()
            .await
            .remove(&token)
            .ok_or_else(session_not_found_error)?;

        self.release_sessions(&[token]).await;

        tracing::info!("deleted session {}", token);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn pick_search_result(
        &self,
        token: Uuid,
        role: Role,
        location: Location,
    ) -> Result<Session, Error> {
        self.apply_event(token, SelectionEvent::PickSearchResult { role, location })
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn click_map(&self, token: Uuid, coordinates: Coordinates) -> Result<Session, Error> {
        self.apply_event(token, SelectionEvent::ClickMap { coordinates })
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn swap(&self, token: Uuid) -> Result<Session, Error> {
        self.apply_event(token, SelectionEvent::Swap).await
    }

    #[tracing::instrument(skip(self))]
    async fn reset(&self, token: Uuid) -> Result<Session, Error> {
        self.apply_event(token, SelectionEvent::Reset).await
    }
}

#[test]
fn sessions_are_independent() {
    use crate::entities::SelectionState;
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine();

        let first = engine.create_session().await.unwrap();
        let second = engine.create_session().await.unwrap();

        let coordinates = Coordinates::new(10.775, 106.7).unwrap();
        engine.click_map(first.token, coordinates).await.unwrap();

        let first = engine.find_session(first.token).await.unwrap();
        let second = engine.find_session(second.token).await.unwrap();

        assert_eq!(
            first.selection,
            SelectionState::PickupOnly {
                pickup: Location::from_coordinates(coordinates)
            }
        );
        assert_eq!(second.selection, SelectionState::Empty);
    });
}

#[test]
fn three_clicks_start_a_new_cycle() {
    use crate::entities::SelectionState;
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine();
        let session = engine.create_session().await.unwrap();

        let a = Coordinates::new(10.0, 106.0).unwrap();
        let b = Coordinates::new(10.1, 106.1).unwrap();
        let c = Coordinates::new(10.2, 106.2).unwrap();

        engine.click_map(session.token, a).await.unwrap();
        engine.click_map(session.token, b).await.unwrap();
        let session = engine.click_map(session.token, c).await.unwrap();

        assert_eq!(
            session.selection,
            SelectionState::PickupOnly {
                pickup: Location::from_coordinates(c)
            }
        );
        assert_eq!(session.revision, 3);
    });
}

#[test]
fn swap_keeps_display_text_with_coordinates() {
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine();
        let session = engine.create_session().await.unwrap();

        let market = Location::new(
            Coordinates::new(10.7725, 106.698).unwrap(),
            "Ben Thanh Market".into(),
        );
        let clicked = Coordinates::new(10.80, 106.66).unwrap();

        engine
            .pick_search_result(session.token, Role::Pickup, market.clone())
            .await
            .unwrap();
        engine.click_map(session.token, clicked).await.unwrap();
        let session = engine.swap(session.token).await.unwrap();

        assert_eq!(session.selection.pickup(), Some(&Location::from_coordinates(clicked)));
        assert_eq!(session.selection.drop(), Some(&market));

        let session = engine.reset(session.token).await.unwrap();
        assert!(session.selection.pickup().is_none());
        assert!(session.selection.drop().is_none());
    });
}

#[test]
fn unknown_session_is_not_found() {
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let engine = test_engine();

        let result = engine.swap(Uuid::new_v4()).await;
        assert_eq!(result.unwrap_err(), session_not_found_error());

        let session = engine.create_session().await.unwrap();
        engine.delete_session(session.token).await.unwrap();

        let result = engine.find_session(session.token).await;
        assert_eq!(result.unwrap_err(), session_not_found_error());
    });
}
