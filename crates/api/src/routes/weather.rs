use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    db::{Statistics, WeatherReading},
    error::Error,
    services::parse_location_id,
    AppState,
};

#[utoipa::path(
    get,
    path = "/weather/{location_id}",
    params(
        ("location_id" = i64, Path, description = "Provider identifier of a stored location"),
    ),
    responses(
        (status = OK, description = "Current weather, fetched and recorded", body = WeatherReading),
        (status = BAD_REQUEST, description = "location_id must be an integer", body = String),
        (status = NOT_FOUND, description = "Location is not stored or unknown to the provider", body = String),
        (status = SERVICE_UNAVAILABLE, description = "Provider or storage is unavailable", body = String),
        (status = GATEWAY_TIMEOUT, description = "Provider did not answer in time", body = String)
    ))]
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Result<Json<WeatherReading>, Error> {
    let location_id = parse_location_id(&location_id)?;
    state.weather.ingest(location_id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/weather/{location_id}/statistics",
    params(
        ("location_id" = i64, Path, description = "Provider identifier of a stored location"),
    ),
    responses(
        (status = OK, description = "Monthly temperatures and daily conditions", body = Statistics),
        (status = BAD_REQUEST, description = "location_id must be an integer", body = String),
        (status = NOT_FOUND, description = "Location is not stored", body = String),
        (status = SERVICE_UNAVAILABLE, description = "Storage is unavailable", body = String)
    ))]
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Result<Json<Statistics>, Error> {
    let location_id = parse_location_id(&location_id)?;
    state.statistics.statistics(location_id).await.map(Json)
}
