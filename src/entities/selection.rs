use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Location};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pickup,
    Drop,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Drop => "drop",
        }
    }
}

/// Which trip endpoints have been chosen so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    PickupOnly { pickup: Location },
    DropOnly { drop: Location },
    Both { pickup: Location, drop: Location },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
    PickSearchResult { role: Role, location: Location },
    ClickMap { coordinates: Coordinates },
    Swap,
    Reset,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::Empty
    }
}

impl SelectionState {
    pub fn name(&self) -> String {
        match self {
            Self::Empty => "empty".into(),
            Self::PickupOnly { pickup: _ } => "pickup_only".into(),
            Self::DropOnly { drop: _ } => "drop_only".into(),
            Self::Both { pickup: _, drop: _ } => "both".into(),
        }
    }

    fn from_slots(pickup: Option<Location>, drop: Option<Location>) -> Self {
        match (pickup, drop) {
            (None, None) => Self::Empty,
            (Some(pickup), None) => Self::PickupOnly { pickup },
            (None, Some(drop)) => Self::DropOnly { drop },
            (Some(pickup), Some(drop)) => Self::Both { pickup, drop },
        }
    }

    fn into_slots(self) -> (Option<Location>, Option<Location>) {
        match self {
            Self::Empty => (None, None),
            Self::PickupOnly { pickup } => (Some(pickup), None),
            Self::DropOnly { drop } => (None, Some(drop)),
            Self::Both { pickup, drop } => (Some(pickup), Some(drop)),
        }
    }

    pub fn pickup(&self) -> Option<&Location> {
        match self {
            Self::PickupOnly { pickup } | Self::Both { pickup, drop: _ } => Some(pickup),
            _ => None,
        }
    }

    pub fn drop(&self) -> Option<&Location> {
        match self {
            Self::DropOnly { drop } | Self::Both { pickup: _, drop } => Some(drop),
            _ => None,
        }
    }

    /// Both endpoints are set, so a route can be requested.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Both { pickup: _, drop: _ })
    }

    pub fn endpoints(&self) -> Option<(&Location, &Location)> {
        match self {
            Self::Both { pickup, drop } => Some((pickup, drop)),
            _ => None,
        }
    }

    /// Pure transition function. Every event is accepted in every state.
    pub fn apply(self, event: SelectionEvent) -> Self {
        match event {
            SelectionEvent::PickSearchResult { role, location } => {
                let (pickup, drop) = self.into_slots();
                match role {
                    Role::Pickup => Self::from_slots(Some(location), drop),
                    Role::Drop => Self::from_slots(pickup, Some(location)),
                }
            }
            SelectionEvent::ClickMap { coordinates } => {
                let location = Location::from_coordinates(coordinates);
                match self {
                    Self::Empty => Self::PickupOnly { pickup: location },
                    Self::DropOnly { drop } => Self::Both {
                        pickup: location,
                        drop,
                    },
                    Self::PickupOnly { pickup } => Self::Both {
                        pickup,
                        drop: location,
                    },
                    // a full selection starts a fresh cycle
                    Self::Both { pickup: _, drop: _ } => Self::PickupOnly { pickup: location },
                }
            }
            SelectionEvent::Swap => {
                let (pickup, drop) = self.into_slots();
                Self::from_slots(drop, pickup)
            }
            SelectionEvent::Reset => Self::Empty,
        }
    }
}

#[cfg(test)]
fn location(lat: f64, lng: f64) -> Location {
    Location::from_coordinates(Coordinates::new(lat, lng).unwrap())
}

#[cfg(test)]
fn click(lat: f64, lng: f64) -> SelectionEvent {
    SelectionEvent::ClickMap {
        coordinates: Coordinates::new(lat, lng).unwrap(),
    }
}

#[test]
fn map_clicks_rotate_through_slots() {
    let state = SelectionState::Empty.apply(click(10.0, 106.0));
    assert_eq!(
        state,
        SelectionState::PickupOnly {
            pickup: location(10.0, 106.0)
        }
    );

    let state = state.apply(click(11.0, 107.0));
    assert_eq!(
        state,
        SelectionState::Both {
            pickup: location(10.0, 106.0),
            drop: location(11.0, 107.0),
        }
    );

    let state = state.apply(click(12.0, 108.0));
    assert_eq!(
        state,
        SelectionState::PickupOnly {
            pickup: location(12.0, 108.0)
        }
    );
}

#[test]
fn map_click_fills_missing_pickup() {
    let state = SelectionState::DropOnly {
        drop: location(11.0, 107.0),
    }
    .apply(click(10.0, 106.0));

    assert_eq!(
        state,
        SelectionState::Both {
            pickup: location(10.0, 106.0),
            drop: location(11.0, 107.0),
        }
    );
}

#[test]
fn search_pick_overwrites_role_in_any_state() {
    let picked = Location::new(
        Coordinates::new(10.77, 106.69).unwrap(),
        "Ben Thanh Market".into(),
    );

    let state = SelectionState::Empty.apply(SelectionEvent::PickSearchResult {
        role: Role::Drop,
        location: picked.clone(),
    });
    assert_eq!(
        state,
        SelectionState::DropOnly {
            drop: picked.clone()
        }
    );

    let state = SelectionState::Both {
        pickup: location(10.0, 106.0),
        drop: location(11.0, 107.0),
    }
    .apply(SelectionEvent::PickSearchResult {
        role: Role::Pickup,
        location: picked.clone(),
    });
    assert_eq!(
        state,
        SelectionState::Both {
            pickup: picked,
            drop: location(11.0, 107.0),
        }
    );
}

#[test]
fn swap_exchanges_endpoints_and_holes() {
    let both = SelectionState::Both {
        pickup: location(10.0, 106.0),
        drop: location(11.0, 107.0),
    };
    assert_eq!(
        both.apply(SelectionEvent::Swap),
        SelectionState::Both {
            pickup: location(11.0, 107.0),
            drop: location(10.0, 106.0),
        }
    );

    let pickup_only = SelectionState::PickupOnly {
        pickup: location(10.0, 106.0),
    };
    assert_eq!(
        pickup_only.apply(SelectionEvent::Swap),
        SelectionState::DropOnly {
            drop: location(10.0, 106.0)
        }
    );

    assert_eq!(
        SelectionState::Empty.apply(SelectionEvent::Swap),
        SelectionState::Empty
    );
}

#[test]
fn reset_always_empties() {
    let state = SelectionState::Both {
        pickup: location(10.0, 106.0),
        drop: location(11.0, 107.0),
    }
    .apply(SelectionEvent::Reset);

    assert_eq!(state, SelectionState::Empty);
    assert!(!state.is_complete());
}
