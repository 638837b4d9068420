use agro_api::build_app;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

async fn test_app() -> Router {
    std::env::set_var("AGRO_LOCAL_RESOLVER_DELAY_MS", "0");
    std::env::set_var("AGRO_TRAINING_TICK_MS", "0");
    build_app().await.expect("app should build")
}

fn authed_post(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", "dev-agro-key")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = json_body(response).await;
    assert_eq!(parsed["status"], "ok");
    assert!(parsed.get("metrics").is_some());
}

#[tokio::test]
async fn chat_requires_api_key() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "hello" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_answers_locally_without_remote_assistant() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_post("/v1/chat", json!({ "text": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["channel"], "local");
    assert!(!parsed["reply_text"].as_str().unwrap().is_empty());
    assert!(!parsed["surface_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn chat_reuses_the_surface_and_close_is_idempotent() {
    let app = test_app().await;

    let first = app
        .clone()
        .oneshot(authed_post(
            "/v1/chat",
            json!({ "text": "hello", "language": "hi" }),
        ))
        .await
        .unwrap();
    let parsed = json_body(first).await;
    let surface_id = parsed["surface_id"].as_str().unwrap().to_string();
    assert_eq!(parsed["language"], "hi");

    let second = app
        .clone()
        .oneshot(authed_post(
            "/v1/chat",
            json!({ "surface_id": surface_id, "text": "irrigation schedule" }),
        ))
        .await
        .unwrap();
    let parsed = json_body(second).await;
    assert_eq!(parsed["surface_id"], surface_id);

    let close = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/surface/{surface_id}"))
                .header("x-api-key", "dev-agro-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(close.status(), StatusCode::OK);
    assert_eq!(json_body(close).await["closed"], true);

    let close_again = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/surface/{surface_id}"))
                .header("x-api-key", "dev-agro-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(close_again.status(), StatusCode::OK);
    assert_eq!(json_body(close_again).await["closed"], false);
}

#[tokio::test]
async fn yield_endpoint_computes_reference_value() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_post(
            "/v1/yield",
            json!({
                "district": "Lucknow",
                "area": 5.0,
                "unit": "acre",
                "soil_type": "alluvial",
                "irrigation": "full"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    assert_eq!(parsed["predicted_yield_quintals"], 518);
}

#[tokio::test]
async fn yield_endpoint_rejects_negative_area() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_post(
            "/v1/yield",
            json!({
                "district": "Lucknow",
                "area": -1.0,
                "unit": "acre",
                "soil_type": "alluvial",
                "irrigation": "full"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let parsed = json_body(response).await;
    assert_eq!(parsed["error"], "invalid_input");
}

#[tokio::test]
async fn webhook_answers_yield_and_help_commands() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed_post(
            "/v1/whatsapp/webhook",
            json!({ "body": "yield Lucknow 5 alluvial" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["reply"],
        "Predicted yield: 518 quintals"
    );

    let response = app
        .oneshot(authed_post(
            "/v1/whatsapp/webhook",
            json!({ "body": "help" }),
        ))
        .await
        .unwrap();
    let reply = json_body(response).await["reply"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(reply.contains("yield <district> <area> <soil>"));
}

#[tokio::test]
async fn classify_returns_result_and_untrained_hint() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_post(
            "/v1/classify",
            json!({ "image": "leaf-sample.jpg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = json_body(response).await;
    let result = &parsed["result"];
    assert!(!result["plant_type"].as_str().unwrap().is_empty());
    let confidence = result["confidence"].as_f64().unwrap();
    assert!((0.70..0.95).contains(&confidence));
    assert!(result["possible_diseases"].is_array());
    assert!(!result["recommendations"].as_array().unwrap().is_empty());
    // The engine is untrained, so the hint is present and no image URL
    // is echoed back.
    assert!(parsed["training_hint"].is_string());
    assert!(result.get("image_url").is_none());
}

#[tokio::test]
async fn training_rejects_unsupported_plants_and_thin_corpora() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed_post(
            "/v1/training/images",
            json!({ "plant_type": "orchid", "image": "orchid.jpg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for index in 0..2 {
        let response = app
            .clone()
            .oneshot(authed_post(
                "/v1/training/images",
                json!({ "plant_type": "sugarcane", "image": format!("cane-{index}.jpg") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(authed_post("/v1/training/start", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "not_enough_images");
}

#[tokio::test]
async fn training_starts_once_the_threshold_is_met() {
    let app = test_app().await;

    for index in 0..5 {
        let response = app
            .clone()
            .oneshot(authed_post(
                "/v1/training/images",
                json!({ "plant_type": "wheat", "image": format!("wheat-{index}.jpg") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let progress = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/training/progress")
                .header("x-api-key", "dev-agro-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(progress.status(), StatusCode::OK);
    let parsed = json_body(progress).await;
    assert_eq!(parsed["trained"], false);
    assert_eq!(parsed["images_per_plant"]["wheat"], 5);

    let response = app
        .clone()
        .oneshot(authed_post("/v1/training/start", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // With a zero training tick the background run finishes quickly.
    let mut trained = false;
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let progress = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/training/progress")
                    .header("x-api-key", "dev-agro-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let parsed = json_body(progress).await;
        if parsed["trained"] == true {
            assert_eq!(parsed["progress"], 100);
            trained = true;
            break;
        }
    }
    assert!(trained, "training run should complete");
}

#[tokio::test]
async fn whatsapp_connect_without_relay_is_unavailable() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_post(
            "/v1/whatsapp/connect",
            json!({ "phone_number": "+919999999999" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
