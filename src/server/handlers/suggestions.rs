use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::SearchAPI;
use crate::entities::{Role, SearchOutcome};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct FindParams {
    field: Role,
    #[serde(default)]
    q: String,
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
    Query(params): Query<FindParams>,
) -> Result<Json<SearchOutcome>, Error> {
    let outcome = api
        .find_place_suggestions(token, params.field, params.q)
        .await?;

    Ok(outcome.into())
}

#[test]
fn query_string_selects_field() {
    let params: FindParams = serde_urlencoded::from_str("field=pickup&q=ben+thanh").unwrap();
    assert_eq!(params.field, Role::Pickup);
    assert_eq!(params.q, "ben thanh");

    let params: FindParams = serde_urlencoded::from_str("field=drop").unwrap();
    assert_eq!(params.field, Role::Drop);
    assert_eq!(params.q, "");

    let missing_field: Result<FindParams, _> = serde_urlencoded::from_str("q=airport");
    assert!(missing_field.is_err());
}
