use crate::helpers::{spawn_app, warsaw_payload, TestApp};
use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use time::macros::datetime;
use weather_api::{Statistics, WeatherReading};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

async fn with_warsaw(test_app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Warsaw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .mount(&test_app.provider)
        .await;
    let response = test_app
        .post_json("/locations", r#"{"city_name": "Warsaw"}"#)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn current_weather_is_recorded() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .expect(1)
        .mount(&test_app.provider)
        .await;

    let response = test_app.get("/weather/756135").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["observed_at"], json!("2019-03-02T12:00:00Z"));
    assert_eq!(body["conditions"][0]["type"], json!("Rain"));

    let reading: WeatherReading = serde_json::from_str(&response.body).unwrap();
    assert_eq!(reading.location_id, 756135);
    assert_eq!(reading.observed_at, datetime!(2019-03-02 12:00 UTC));
    assert_eq!(reading.temperature, 279.15);
    assert_eq!(reading.temp_min, 278.15);
    assert_eq!(reading.temp_max, 280.15);
    assert_eq!(reading.conditions.len(), 2);
    assert!(reading.conditions.iter().all(|c| c.reading_id == reading.id));
}

#[tokio::test]
async fn weather_entries_without_a_label_are_not_recorded() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;

    let mut payload = warsaw_payload();
    payload["weather"] = json!([
        {"id": 500, "description": "light rain"},
        {"id": 500, "main": "Rain", "description": "light rain"}
    ]);
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&test_app.provider)
        .await;

    let response = test_app.get("/weather/756135").await;
    assert_eq!(response.status, StatusCode::OK);

    let reading: WeatherReading = serde_json::from_str(&response.body).unwrap();
    assert_eq!(reading.conditions.len(), 1);
    assert_eq!(reading.conditions[0].condition_type, "Rain");
}

#[tokio::test]
async fn statistics_after_two_readings() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;

    let mut later = warsaw_payload();
    later["dt"] = json!(1551628800);
    later["main"] = json!({"temp": 283.15, "temp_min": 281.15, "temp_max": 285.15});
    later["weather"] = json!([{"main": "Clear"}]);

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .up_to_n_times(1)
        .mount(&test_app.provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(200).set_body_json(later))
        .mount(&test_app.provider)
        .await;

    assert_eq!(test_app.get("/weather/756135").await.status, StatusCode::OK);
    assert_eq!(test_app.get("/weather/756135").await.status, StatusCode::OK);

    let response = test_app.get("/weather/756135/statistics").await;
    assert_eq!(response.status, StatusCode::OK);
    let stats: Statistics = serde_json::from_str(&response.body).unwrap();

    assert_eq!(stats.count, 2);
    assert_eq!(stats.month_temperature.len(), 1);
    assert_eq!(stats.month_temperature[0].month, "2019-03");
    assert_eq!(stats.month_temperature[0].min, 278.15);
    assert_eq!(stats.month_temperature[0].max, 285.15);
    assert!((stats.month_temperature[0].avg - 281.15).abs() < 1e-9);
    assert_eq!(stats.daily_condition["2019-03-02"], vec!["Rain", "Mist"]);
    assert_eq!(stats.daily_condition["2019-03-03"], vec!["Clear"]);
}

#[tokio::test]
async fn statistics_without_readings() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;

    let response = test_app.get("/weather/756135/statistics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"count": 0, "month_temperature": [], "daily_condition": {}})
    );
}

#[tokio::test]
async fn unknown_locations() {
    let test_app = spawn_app().await;

    let response = test_app.get("/weather/462356").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "location '462356' not found");

    let response = test_app.get("/weather/462356/statistics").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "location '462356' does not exist");

    let response = test_app.get("/weather/warsaw/statistics").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "location_id must be an integer");
}

#[tokio::test]
async fn provider_failures_while_ingesting() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "internal error"})))
        .up_to_n_times(1)
        .mount(&test_app.provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(warsaw_payload())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&test_app.provider)
        .await;

    let response = test_app.get("/weather/756135").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, "service is unavailable");

    let response = test_app.get("/weather/756135").await;
    assert_eq!(response.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.body, "service is unavailable");

    let stats: Statistics =
        serde_json::from_str(&test_app.get("/weather/756135/statistics").await.body).unwrap();
    assert_eq!(stats.count, 0);
}

#[tokio::test]
async fn deleting_a_location_drops_its_history() {
    let test_app = spawn_app().await;
    with_warsaw(&test_app).await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "756135"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .mount(&test_app.provider)
        .await;
    assert_eq!(test_app.get("/weather/756135").await.status, StatusCode::OK);

    assert_eq!(test_app.delete("/locations/756135").await.status, StatusCode::OK);
    with_warsaw(&test_app).await;

    let stats: Statistics =
        serde_json::from_str(&test_app.get("/weather/756135/statistics").await.body).unwrap();
    assert_eq!(stats.count, 0);
}
