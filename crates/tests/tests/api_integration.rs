use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::Matcher;
use serde_json::{json, Value};
use tower::ServiceExt;
use venture_api::{build_app_with_store, ServiceConfig};
use venture_planner::OpenAiConfig;
use venture_storage::{MemoryPlaceStore, Store};

const CAPITAL_FORT: &str = "64b000000000000000000001";
const CAPITAL_SOUQ: &str = "64b000000000000000000002";
const NORTHERN_BEACH: &str = "64b000000000000000000003";

fn seeded_places() -> MemoryPlaceStore {
    MemoryPlaceStore::with_documents(vec![
        json!({
            "_id": { "$oid": CAPITAL_FORT },
            "category": "Things to do",
            "name": "Bahrain Fort",
            "description": "UNESCO listed fort",
            "imagePlace": ["fort-1.jpg", "fort-2.jpg"],
            "rate": 4.7,
            "duration": 2,
            "priceRange": "Free",
            "region": "Capital",
            "googleLocation": { "lat": 26.233, "lng": 50.520 },
            "internalNotes": "never leaves the store"
        }),
        json!({
            "_id": { "$oid": CAPITAL_SOUQ },
            "category": "Things to eat",
            "name": "Manama Souq",
            "imagePlace": [],
            "rate": 4.2,
            "region": "Capital"
        }),
        json!({
            "_id": { "$oid": NORTHERN_BEACH },
            "category": "Things to do",
            "name": "Marassi Beach",
            "rate": 4.5,
            "region": "Northern"
        }),
    ])
    .expect("seed documents are objects")
}

fn config(base_url: &str, legacy: bool) -> ServiceConfig {
    let mut openai = OpenAiConfig::new("test-key");
    openai.base_url = base_url.to_string();
    let mut config = ServiceConfig::new(openai);
    config.legacy_error_status = legacy;
    config
}

fn capital_request(days: u32) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate_itinerary")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "selectedRegion": "Capital",
                "budget": 500,
                "days": days,
                "groupSize": 2,
                "favouriteActivities": "history, food"
            })
            .to_string(),
        ))
        .unwrap()
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
    .to_string()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn capital_trip_returns_model_itinerary_built_from_capital_places() {
    let mut server = mockito::Server::new_async().await;
    let itinerary = json!({
        "title": "Exploring Capital of Bahrain",
        "days": [
            {
                "title": "Day 1",
                "description": "Forts and history",
                "places": [{ "_id": CAPITAL_FORT, "name": "Bahrain Fort" }]
            },
            {
                "title": "Day 2",
                "description": "Food in the old market",
                "places": [{ "_id": CAPITAL_SOUQ, "name": "Manama Souq" }]
            }
        ]
    });
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(CAPITAL_FORT.to_string()),
            Matcher::Regex(CAPITAL_SOUQ.to_string()),
            Matcher::Regex("json_object".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&itinerary.to_string()))
        .create_async()
        .await;

    let app = build_app_with_store(config(&server.url(), false), Store::Memory(seeded_places()))
        .expect("app should build");
    let (status, body) = send(app, capital_request(2)).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);

    let ids = body["days"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|day| day["places"].as_array().unwrap())
        .map(|place| place["_id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert!(ids.iter().all(|id| id == CAPITAL_FORT || id == CAPITAL_SOUQ));
    assert!(!ids.iter().any(|id| id == NORTHERN_BEACH));
}

#[tokio::test]
async fn two_day_capital_trip_draws_days_only_from_capital_records() {
    let mut server = mockito::Server::new_async().await;
    let reply = json!({
        "trip": {
            "title": "Exploring Capital of Bahrain",
            "description": "A 2-day adventure for 4 travellers",
            "days": [
                {
                    "title": "Day 1",
                    "description": "This is a description for Day 1",
                    "places": [
                        { "_id": CAPITAL_FORT, "name": "Bahrain Fort", "category": "Things to do" },
                        { "_id": CAPITAL_SOUQ, "name": "Manama Souq", "category": "Things to eat" }
                    ]
                },
                {
                    "title": "Day 2",
                    "description": "This is a description for Day 2",
                    "places": [{ "_id": CAPITAL_SOUQ, "name": "Manama Souq", "category": "Things to eat" }]
                }
            ]
        }
    });
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(CAPITAL_FORT.to_string()),
            Matcher::Regex(CAPITAL_SOUQ.to_string()),
            Matcher::Regex("diving".to_string()),
            Matcher::Regex("Things to do".to_string()),
        ]))
        .with_status(200)
        .with_body(completion_body(&reply.to_string()))
        .create_async()
        .await;

    let app = build_app_with_store(config(&server.url(), false), Store::Memory(seeded_places()))
        .expect("app should build");
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate_itinerary")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "selectedRegion": ["Capital"],
                "budget": "200",
                "days": 2,
                "groupSize": 4,
                "favouriteActivities": ["diving"]
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(app, request).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);

    let days = body["trip"]["days"].as_array().expect("trip.days");
    assert_eq!(days.len(), 2);
    let ids = days
        .iter()
        .flat_map(|day| day["places"].as_array().unwrap())
        .map(|place| place["_id"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|id| *id == CAPITAL_FORT || *id == CAPITAL_SOUQ));
}

#[tokio::test]
async fn prompt_never_carries_other_regions_or_unprojected_fields() {
    let mut server = mockito::Server::new_async().await;
    let leaking = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AnyOf(vec![
            Matcher::Regex(NORTHERN_BEACH.to_string()),
            Matcher::Regex("internalNotes".to_string()),
            Matcher::Regex("fort-2.jpg".to_string()),
        ]))
        .with_status(500)
        .expect(0)
        .create_async()
        .await;
    let clean = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(r#"{"days": []}"#))
        .create_async()
        .await;

    let app = build_app_with_store(config(&server.url(), false), Store::Memory(seeded_places()))
        .expect("app should build");
    let (status, body) = send(app, capital_request(1)).await;

    leaking.assert_async().await;
    clean.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "days": [] }));
}

#[tokio::test]
async fn non_json_model_reply_is_reported_as_error_body() {
    for (legacy, expected_status) in [(true, StatusCode::OK), (false, StatusCode::BAD_GATEWAY)] {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion_body("not json"))
            .create_async()
            .await;

        let app = build_app_with_store(config(&server.url(), legacy), Store::Memory(seeded_places()))
            .expect("app should build");
        let (status, body) = send(app, capital_request(2)).await;

        assert_eq!(status, expected_status);
        assert_eq!(
            body,
            json!({ "error": "Failed to parse JSON response from the model." })
        );
    }
}

#[tokio::test]
async fn unreachable_completion_service_reports_error_and_leaves_store_untouched() {
    for (legacy, expected_status) in [(true, StatusCode::OK), (false, StatusCode::BAD_GATEWAY)] {
        let places = seeded_places();
        let before = places.documents();

        let app = build_app_with_store(
            config("http://127.0.0.1:9", legacy),
            Store::Memory(places.clone()),
        )
        .expect("app should build");
        let (status, body) = send(app, capital_request(2)).await;

        assert_eq!(status, expected_status);
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("completion request failed"), "{message}");
        assert_eq!(places.documents(), before);
    }
}

#[tokio::test]
async fn completion_api_errors_surface_the_service_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "Rate limit reached"}}"#)
        .create_async()
        .await;

    let app = build_app_with_store(config(&server.url(), false), Store::Memory(seeded_places()))
        .expect("app should build");
    let (status, body) = send(app, capital_request(1)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "completion service returned 429: Rate limit reached"
    );
}

#[tokio::test]
async fn out_of_range_days_are_rejected_without_calling_the_model() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let app = build_app_with_store(config(&server.url(), false), Store::Memory(seeded_places()))
        .expect("app should build");
    let (status, body) = send(app, capital_request(0)).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "days must be between 1 and 30, got 0");
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app_with_store(config("http://127.0.0.1:9", false), Store::memory())
        .expect("app should build");

    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn preflight_allows_credentials_from_configured_origin() {
    let app = build_app_with_store(config("http://127.0.0.1:9", false), Store::memory())
        .expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/generate_itinerary")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
