use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Location};

/// A geocoder match offered as a search suggestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub label: String,
    pub coordinates: Coordinates,
}

impl From<PlaceCandidate> for Location {
    fn from(candidate: PlaceCandidate) -> Self {
        Location::new(candidate.coordinates, candidate.label)
    }
}

/// Result of a debounced search. A search that was overtaken by a newer
/// one for the same field reports `Superseded` and carries no candidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Results { candidates: Vec<PlaceCandidate> },
    Superseded,
}
