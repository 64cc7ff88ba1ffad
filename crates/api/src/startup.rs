use crate::{
    db::{self, Database, LocationAccess, LocationStore, WeatherAccess, WeatherStore},
    provider::{OpenWeatherClient, WeatherProvider},
    routes::{
        self, create_location, delete_location, get_location, get_statistics, get_weather,
        list_locations,
    },
    LocationOrchestrator, StatisticsAggregator, WeatherIngestion,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use weather_api_core::ProviderConfig;

pub struct AppState {
    pub locations: LocationOrchestrator,
    pub weather: WeatherIngestion,
    pub statistics: StatisticsAggregator,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        locations: Arc<dyn LocationStore>,
        readings: Arc<dyn WeatherStore>,
    ) -> Self {
        Self {
            locations: LocationOrchestrator::new(provider.clone(), locations.clone()),
            weather: WeatherIngestion::new(provider, locations.clone(), readings.clone()),
            statistics: StatisticsAggregator::new(locations, readings),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::locations::get_location,
        routes::locations::list_locations,
        routes::locations::create_location,
        routes::locations::delete_location,
        routes::weather::get_weather,
        routes::weather::get_statistics,
    ),
    components(
        schemas(
                db::Location,
                db::WeatherReading,
                db::Condition,
                db::Statistics,
                db::MonthTemperature,
                routes::locations::CreateLocation
            )
    ),
    tags(
        (name = "weather api", description = "a RESTful api exposing stored locations and their weather history, enriched from open weather map")
    )
)]
struct ApiDoc;

pub fn build_app_state(
    db: &Database,
    provider_config: &ProviderConfig,
) -> Result<AppState, anyhow::Error> {
    let provider = Arc::new(
        OpenWeatherClient::new(provider_config)
            .map_err(|e| anyhow!("error setting up weather provider client: {}", e))?,
    );
    let locations = Arc::new(LocationAccess::new(db.pool().clone()));
    let readings = Arc::new(WeatherAccess::new(db.pool().clone()));

    Ok(AppState::new(provider, locations, readings))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route(
            "/locations/{location_id}",
            get(get_location).delete(delete_location),
        )
        .route("/weather/{location_id}", get(get_weather))
        .route("/weather/{location_id}/statistics", get(get_statistics))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", method, path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(
        target: "http_response",
        "response, {} {}, code: {}, time: {}",
        method,
        path,
        response.status().as_str(),
        response_time
    );

    response
}
