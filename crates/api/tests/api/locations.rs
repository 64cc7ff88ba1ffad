use crate::helpers::{spawn_app, warsaw_payload, TEST_TOKEN};
use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use weather_api::Location;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

fn warsaw() -> Location {
    Location {
        location_id: 756135,
        city_name: "Warsaw".to_string(),
        country_code: "PL".to_string(),
        latitude: 0.0,
        longitude: 0.0,
    }
}

#[tokio::test]
async fn create_location_from_sparse_provider_payload() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Warsaw"))
        .and(query_param("appid", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "id": 756135, "name": "Warsaw", "sys": {"country": "PL"} }),
        ))
        .expect(1)
        .mount(&test_app.provider)
        .await;

    let response = test_app
        .post_json("/locations", r#"{"city_name": "Warsaw"}"#)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let created: Location = serde_json::from_str(&response.body).unwrap();
    assert_eq!(created, warsaw());

    let response = test_app.get("/locations/756135").await;
    assert_eq!(response.status, StatusCode::OK);
    let stored: Location = serde_json::from_str(&response.body).unwrap();
    assert_eq!(stored, warsaw());
}

#[tokio::test]
async fn creating_the_same_location_twice_is_a_conflict() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Warsaw,PL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .expect(2)
        .mount(&test_app.provider)
        .await;

    let body = r#"{"city_name": "Warsaw", "country_code": "PL"}"#;
    let first = test_app.post_json("/locations", body).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json()["latitude"], json!(52.23));

    let second = test_app.post_json("/locations", body).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body, "location 'Warsaw,PL' already exist");
}

#[tokio::test]
async fn create_location_rejects_bad_bodies() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .expect(0)
        .mount(&test_app.provider)
        .await;

    for body in ["{not json", "[]", r#"["Warsaw", "PL"]"#, r#""Warsaw""#] {
        let response = test_app.post_json("/locations", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response.body, "invalid data input");
    }

    let response = test_app
        .post_json("/locations", r#"{"country_code": "PL"}"#)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "input data field 'city_name' is required");
}

#[tokio::test]
async fn create_unknown_city_is_not_found() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&test_app.provider)
        .await;

    let response = test_app
        .post_json("/locations", r#"{"city_name": "Atlantis"}"#)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "location 'Atlantis' not found");
}

#[tokio::test]
async fn create_with_failing_provider_is_unavailable() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Warsaw"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"cod": 401, "message": "Invalid API key"})))
        .mount(&test_app.provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Krakow"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&test_app.provider)
        .await;

    for city in ["Warsaw", "Krakow"] {
        let response = test_app
            .post_json("/locations", &json!({ "city_name": city }).to_string())
            .await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body, "service is unavailable");
    }
    assert_eq!(test_app.get("/locations").await.body, "[]");
}

#[tokio::test]
async fn create_with_slow_provider_reports_unavailable() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(warsaw_payload())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&test_app.provider)
        .await;

    let response = test_app
        .post_json("/locations", r#"{"city_name": "Warsaw"}"#)
        .await;
    assert_eq!(response.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.body, "service is unavailable");
}

#[tokio::test]
async fn list_locations_in_country_then_city_order() {
    let test_app = spawn_app().await;
    assert_eq!(test_app.get("/locations").await.body, "[]");

    let cities = [
        ("Warsaw", 756135, "PL"),
        ("London", 2643743, "GB"),
        ("Krakow", 3094802, "PL"),
    ];
    for (name, id, country) in cities {
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "id": id, "name": name, "sys": {"country": country} }),
            ))
            .mount(&test_app.provider)
            .await;
        let response = test_app
            .post_json("/locations", &json!({ "city_name": name }).to_string())
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = test_app.get("/locations").await;
    assert_eq!(response.status, StatusCode::OK);
    let listed: Vec<Location> = serde_json::from_str(&response.body).unwrap();
    let names: Vec<&str> = listed.iter().map(|l| l.city_name.as_str()).collect();
    assert_eq!(names, vec!["London", "Krakow", "Warsaw"]);
}

#[tokio::test]
async fn get_location_errors() {
    let test_app = spawn_app().await;

    let response = test_app.get("/locations/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "location_id must be an integer");

    let response = test_app.get("/locations/462356").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "location '462356' not found");
}

#[tokio::test]
async fn delete_location() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warsaw_payload()))
        .mount(&test_app.provider)
        .await;
    test_app
        .post_json("/locations", r#"{"city_name": "Warsaw"}"#)
        .await;

    let response = test_app.delete("/locations/756135").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = test_app.delete("/locations/756135").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "location '756135' does not exist");

    let response = test_app.delete("/locations/x1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_outage_is_unavailable_not_missing() {
    let test_app = spawn_app().await;
    test_app.db.close().await;

    let response = test_app.get("/locations/1").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, "service is unavailable");

    let response = test_app.get("/locations").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let response = test_app.delete("/locations/1").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, "can not delete location '1'");
}

#[tokio::test]
async fn api_docs_are_served() {
    let test_app = spawn_app().await;

    let response = test_app.get("/docs").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("/locations/{location_id}"));
}

#[tokio::test]
async fn create_with_unidentified_provider_payload_stores_nothing() {
    let test_app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200})))
        .mount(&test_app.provider)
        .await;

    let response = test_app
        .post_json("/locations", r#"{"city_name": "Warsaw"}"#)
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, "service is unavailable");

    let response = test_app.get("/locations").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "[]");
}
