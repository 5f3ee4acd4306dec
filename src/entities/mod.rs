mod fare;
mod location;
mod place;
mod quote;
mod route;
mod selection;
mod session;
mod vehicle;

pub use fare::{
    estimate_fare, is_peak_hour, BookingOptions, FareQuery, LooseInteger, DEFAULT_HOUR_OF_DAY,
    DEFAULT_TRAFFIC_LEVEL,
};
pub use location::{Coordinates, Location};
pub use place::{PlaceCandidate, SearchOutcome};
pub use quote::Quote;
pub use route::{Route, RouteSummary};
pub use selection::{Role, SelectionEvent, SelectionState};
pub use session::Session;
pub use vehicle::{FareTable, VehicleClass};
