use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    BookingOptions, Coordinates, FareQuery, Location, Quote, Role, SearchOutcome, Session,
};
use crate::error::Error;

#[async_trait]
pub trait SessionAPI {
    async fn create_session(&self) -> Result<Session, Error>;
    async fn find_session(&self, token: Uuid) -> Result<Session, Error>;
    async fn delete_session(&self, token: Uuid) -> Result<(), Error>;

    async fn pick_search_result(
        &self,
        token: Uuid,
        role: Role,
        location: Location,
    ) -> Result<Session, Error>;
    async fn click_map(&self, token: Uuid, coordinates: Coordinates) -> Result<Session, Error>;
    async fn swap(&self, token: Uuid) -> Result<Session, Error>;
    async fn reset(&self, token: Uuid) -> Result<Session, Error>;
}

#[async_trait]
pub trait SearchAPI {
    async fn find_place_suggestions(
        &self,
        token: Uuid,
        field: Role,
        query: String,
    ) -> Result<SearchOutcome, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    async fn create_quote(&self, token: Uuid, options: BookingOptions) -> Result<Quote, Error>;
    async fn find_quote(&self, token: Uuid) -> Result<Quote, Error>;
    fn estimate_fare(&self, query: FareQuery) -> u64;
}

pub trait API: SessionAPI + SearchAPI + QuoteAPI {}
