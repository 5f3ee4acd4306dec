use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::api::QuoteAPI;
use crate::entities::{BookingOptions, Quote};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
    Json(options): Json<BookingOptions>,
) -> Result<Json<Quote>, Error> {
    let quote = api.create_quote(token, options).await?;

    Ok(quote.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Quote>, Error> {
    let quote = api.find_quote(token).await?;

    Ok(quote.into())
}
