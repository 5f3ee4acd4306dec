use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Route, SelectionEvent, SelectionState};

/// One user's booking context: the current selection and the route shown
/// for it, if any.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub selection: SelectionState,
    /// Bumped on every selection event.
    pub revision: u64,
    pub route: Option<Route>,
    pub created_at: DateTime<Utc>,
    /// Last time the session was read or changed.
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            token: Uuid::new_v4(),
            selection: SelectionState::Empty,
            revision: 0,
            route: None,
            created_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Whether the session has been left alone for longer than `ttl` as of
    /// `now`.
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_active)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self), fields(token = %self.token))]
    pub fn apply(&mut self, event: SelectionEvent) {
        let invalidates_route = matches!(event, SelectionEvent::Swap | SelectionEvent::Reset);

        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.apply(event);
        self.revision += 1;

        let route_is_current = match (&self.route, self.selection.endpoints()) {
            (Some(route), Some((pickup, drop))) => route.connects(pickup, drop),
            _ => false,
        };

        if invalidates_route || !route_is_current {
            self.route = None;
        }

        tracing::debug!(state = %self.selection.name(), revision = self.revision, "selection updated");
    }

    /// Stores a route if it was computed for the selection as it stands at
    /// `revision`.
    pub fn attach_route(&mut self, revision: u64, route: Route) -> bool {
        if self.revision != revision {
            return false;
        }

        self.route = Some(route);
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
fn session_with_route() -> Session {
    use crate::entities::{Coordinates, RouteSummary};
    use geo_types::LineString;

    let mut session = Session::new();
    session.apply(SelectionEvent::ClickMap {
        coordinates: Coordinates::new(10.0, 106.0).unwrap(),
    });
    session.apply(SelectionEvent::ClickMap {
        coordinates: Coordinates::new(10.1, 106.1).unwrap(),
    });

    let (pickup, drop) = session.selection.endpoints().unwrap();
    let route = Route::new(
        pickup.clone(),
        drop.clone(),
        RouteSummary {
            distance_meters: 1000.0,
            duration_seconds: 120.0,
            geometry: LineString::from(vec![(106.0, 10.0), (106.1, 10.1)]),
        },
    );

    assert!(session.attach_route(session.revision, route));
    session
}

#[test]
fn swap_discards_route() {
    let mut session = session_with_route();

    session.apply(SelectionEvent::Swap);

    assert!(session.route.is_none());
    assert!(session.selection.is_complete());
}

#[test]
fn reset_discards_route_and_selection() {
    let mut session = session_with_route();

    session.apply(SelectionEvent::Reset);

    assert!(session.route.is_none());
    assert_eq!(session.selection, SelectionState::Empty);
}

#[test]
fn changing_an_endpoint_discards_route() {
    use crate::entities::{Coordinates, Location, Role};

    let mut session = session_with_route();

    session.apply(SelectionEvent::PickSearchResult {
        role: Role::Drop,
        location: Location::new(Coordinates::new(10.2, 106.2).unwrap(), "Thu Duc".into()),
    });

    assert!(session.route.is_none());
}

#[test]
fn stale_route_is_not_attached() {
    let mut session = session_with_route();
    let route = session.route.clone().unwrap();
    let revision = session.revision;

    session.apply(SelectionEvent::Swap);

    assert!(!session.attach_route(revision, route));
    assert!(session.route.is_none());
    assert_eq!(session.revision, revision + 1);
}

#[test]
fn session_goes_idle_after_ttl() {
    let mut session = Session::new();
    let ttl = Duration::from_secs(60);

    assert!(!session.is_idle(Utc::now(), ttl));
    assert!(session.is_idle(Utc::now() + chrono::Duration::seconds(61), ttl));

    session.last_active = Utc::now() - chrono::Duration::minutes(5);
    assert!(session.is_idle(Utc::now(), ttl));

    session.touch();
    assert!(!session.is_idle(Utc::now(), ttl));
}
