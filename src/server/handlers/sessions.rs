use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::SessionAPI;
use crate::entities::{Coordinates, Location, PlaceCandidate, Role, Session};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct PickSearchResultParams {
    role: Role,
    candidate: PlaceCandidate,
}

#[derive(Serialize, Deserialize)]
pub struct ClickMapParams {
    coordinates: Coordinates,
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<Session>, Error> {
    let session = api.create_session().await?;

    Ok(session.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Session>, Error> {
    let session = api.find_session(token).await?;

    Ok(session.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_session(token).await?;

    Ok(().into())
}

pub async fn pick_search_result(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
    Json(params): Json<PickSearchResultParams>,
) -> Result<Json<Session>, Error> {
    let location: Location = params.candidate.into();
    let session = api.pick_search_result(token, params.role, location).await?;

    Ok(session.into())
}

pub async fn click_map(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
    Json(params): Json<ClickMapParams>,
) -> Result<Json<Session>, Error> {
    let session = api.click_map(token, params.coordinates).await?;

    Ok(session.into())
}

pub async fn swap(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Session>, Error> {
    let session = api.swap(token).await?;

    Ok(session.into())
}

pub async fn reset(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Session>, Error> {
    let session = api.reset(token).await?;

    Ok(session.into())
}

#[test]
fn search_result_body_becomes_location() {
    let params: PickSearchResultParams = serde_json::from_str(
        r#"{
            "role": "drop",
            "candidate": {
                "label": "Cho Ben Thanh, Quan 1",
                "coordinates": {"lat": 10.7725, "lng": 106.698}
            }
        }"#,
    )
    .unwrap();

    assert_eq!(params.role, Role::Drop);

    let location: Location = params.candidate.into();
    assert_eq!(location.description, "Cho Ben Thanh, Quan 1");
    assert_eq!(location.coordinates, Coordinates::new(10.7725, 106.698).unwrap());

    let unknown_role: Result<PickSearchResultParams, _> = serde_json::from_str(
        r#"{"role": "stop", "candidate": {"label": "x", "coordinates": {"lat": 0, "lng": 0}}}"#,
    );
    assert!(unknown_role.is_err());
}

#[test]
fn map_click_body_validates_coordinates() {
    let params: ClickMapParams =
        serde_json::from_str(r#"{"coordinates": {"lat": 10.8, "lng": 106.66}}"#).unwrap();
    assert_eq!(params.coordinates, Coordinates::new(10.8, 106.66).unwrap());

    let out_of_range: Result<ClickMapParams, _> =
        serde_json::from_str(r#"{"coordinates": {"lat": 10.8, "lng": 186.66}}"#);
    assert!(out_of_range.is_err());

    let missing: Result<ClickMapParams, _> = serde_json::from_str(r#"{"coordinates": {"lat": 10.8}}"#);
    assert!(missing.is_err());
}
