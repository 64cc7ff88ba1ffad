use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    db::Location,
    error::{Error, INVALID_DATA_INPUT},
    services::parse_location_id,
    AppState,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateLocation {
    /// city to look up at the weather provider
    #[serde(default)]
    pub city_name: String,
    /// optional country code narrowing the lookup, e.g. "PL"
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Only a JSON object is a location request; arrays and scalars are
/// rejected before any field is looked at.
fn parse_create_location(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateLocation, Error> {
    let invalid = |reason: String| {
        warn!("rejected location body: {}", reason);
        Error::InvalidInput(INVALID_DATA_INPUT.to_string())
    };

    let Json(value) = body.map_err(|e| invalid(e.to_string()))?;
    if !value.is_object() {
        return Err(invalid(format!("expected an object, got {}", value)));
    }
    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/locations/{location_id}",
    params(
        ("location_id" = i64, Path, description = "Provider identifier of the location"),
    ),
    responses(
        (status = OK, description = "Stored location", body = Location),
        (status = BAD_REQUEST, description = "location_id must be an integer", body = String),
        (status = NOT_FOUND, description = "Location is not stored", body = String),
        (status = SERVICE_UNAVAILABLE, description = "Storage is unavailable", body = String)
    ))]
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Result<Json<Location>, Error> {
    let location_id = parse_location_id(&location_id)?;
    state.locations.get_location(location_id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/locations",
    responses(
        (status = OK, description = "All stored locations ordered by country, then city", body = Vec<Location>),
        (status = SERVICE_UNAVAILABLE, description = "Storage is unavailable", body = String)
    ))]
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Location>>, Error> {
    state.locations.list_locations().await.map(Json)
}

#[utoipa::path(
    post,
    path = "/locations",
    request_body = CreateLocation,
    responses(
        (status = CREATED, description = "Location resolved at the provider and stored", body = Location),
        (status = BAD_REQUEST, description = "Body is not valid or city_name is missing", body = String),
        (status = NOT_FOUND, description = "Provider does not know the city", body = String),
        (status = CONFLICT, description = "Location is already stored", body = String),
        (status = SERVICE_UNAVAILABLE, description = "Provider or storage is unavailable", body = String),
        (status = GATEWAY_TIMEOUT, description = "Provider did not answer in time", body = String)
    ))]
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Location>), Error> {
    let body = parse_create_location(body)?;

    let location = state
        .locations
        .create_location(&body.city_name, body.country_code.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    delete,
    path = "/locations/{location_id}",
    params(
        ("location_id" = i64, Path, description = "Provider identifier of the location"),
    ),
    responses(
        (status = OK, description = "Location and its weather history removed"),
        (status = BAD_REQUEST, description = "location_id must be an integer", body = String),
        (status = NOT_FOUND, description = "Location is not stored", body = String),
        (status = SERVICE_UNAVAILABLE, description = "Storage is unavailable", body = String)
    ))]
pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Result<StatusCode, Error> {
    let location_id = parse_location_id(&location_id)?;
    state.locations.delete_location(location_id).await?;
    Ok(StatusCode::OK)
}
