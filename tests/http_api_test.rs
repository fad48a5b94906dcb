//! HTTP boundary: request validation and the always-a-body contract.

mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use beforeafter::config::ProviderConfig;
use beforeafter::models::Provider;
use beforeafter::providers::OpenAIProvider;
use beforeafter::services::Orchestrator;
use beforeafter::{AppState, configure};
use common::{REACT_REPLY, StubProvider, jpeg};
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;

const BOUNDARY: &str = "----beforeafter-test-boundary";

enum Part<'a> {
    File(&'a str, &'a str, Vec<u8>),
    Text(&'a str, &'a str),
}

fn multipart(parts: Vec<Part<'_>>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

fn keyless_state() -> AppState {
    let config = ProviderConfig::new(None, "http://127.0.0.1:9");
    AppState::new(
        Orchestrator::new().with_provider(Arc::new(OpenAIProvider::new(&config, Client::new()))),
    )
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure),
        )
        .await
    };
}

fn post_multipart(uri: &str, parts: Vec<Part<'_>>) -> test::TestRequest {
    let (content_type, body) = multipart(parts);
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}

#[actix_web::test]
async fn health_endpoints() {
    let app = app!(keyless_state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/health/ping").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "pong"}));
}

#[actix_web::test]
async fn analyze_requires_two_images() {
    let app = app!(keyless_state());

    let req = post_multipart(
        "/api/ai/analyze",
        vec![Part::File("images", "current.jpg", jpeg(10, 10))],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid number of files");
}

#[actix_web::test]
async fn analyze_rejects_unknown_provider() {
    let app = app!(keyless_state());

    let req = post_multipart(
        "/api/ai/analyze",
        vec![
            Part::File("images", "current.jpg", jpeg(10, 10)),
            Part::File("images", "target.jpg", jpeg(10, 10)),
            Part::Text("aiProvider", "azure"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid provider");
}

#[actix_web::test]
async fn analyze_rejects_undecodable_images() {
    let app = app!(keyless_state());

    let req = post_multipart(
        "/api/ai/analyze",
        vec![
            Part::File("images", "current.jpg", b"not an image".to_vec()),
            Part::File("images", "target.jpg", jpeg(10, 10)),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn analyze_without_credentials_still_returns_a_body() {
    let app = app!(keyless_state());

    let req = post_multipart(
        "/api/ai/analyze",
        vec![
            Part::File("images", "current.jpg", jpeg(10, 10)),
            Part::File("images", "target.jpg", jpeg(10, 10)),
            Part::Text("framework", "react"),
            Part::Text("projectId", "p-1"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(body["differences"].as_array().unwrap().len(), 1);
    assert_eq!(body["differences"][0]["type"], "error");
    assert_eq!(body["suggestions"][0]["framework"], "react");
    assert!(body.get("processedAt").is_some());
}

#[actix_web::test]
async fn oversized_text_field_is_rejected() {
    let app = app!(keyless_state());
    let framework = "r".repeat(beforeafter::handlers::MAX_FIELD_BYTES + 1);

    let req = post_multipart(
        "/api/ai/analyze",
        vec![
            Part::File("images", "current.jpg", jpeg(10, 10)),
            Part::File("images", "target.jpg", jpeg(10, 10)),
            Part::Text("framework", &framework),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation error");
}

#[actix_web::test]
async fn detect_stack_uses_selected_provider() {
    let state = AppState::new(
        Orchestrator::new()
            .with_provider(Arc::new(StubProvider::replying(Provider::Anthropic, REACT_REPLY))),
    );
    let app = app!(state);

    let req = post_multipart(
        "/api/ai/detect-stack",
        vec![
            Part::File("codeFiles", "App.tsx", b"export const x = 1".to_vec()),
            Part::Text("aiProvider", "anthropic"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["framework"], "react");
    assert_eq!(body["provider"], "anthropic");
    assert_eq!(body["detectedFiles"][0]["filename"], "App.tsx");
}

#[actix_web::test]
async fn detect_stack_requires_a_file() {
    let app = app!(keyless_state());

    let req = post_multipart("/api/ai/detect-stack", vec![Part::Text("aiProvider", "openai")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn generate_code_degrades_without_credentials() {
    let app = app!(keyless_state());

    let req = test::TestRequest::post()
        .uri("/api/ai/generate-code")
        .set_json(json!({
            "framework": "react",
            "description": "Make the primary button green",
            "differences": [{"type": "color", "currentValue": "#3b82f6", "targetValue": "#10b981"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["framework"], "react");
    assert_eq!(body["suggestions"][0]["type"], "manual");
    assert_eq!(body["dependencies"], json!([]));
}

#[actix_web::test]
async fn generate_code_requires_description() {
    let app = app!(keyless_state());

    let req = test::TestRequest::post()
        .uri("/api/ai/generate-code")
        .set_json(json!({"framework": "react"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn models_catalog_and_probe() {
    let app = app!(keyless_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/ai/models?provider=anthropic").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Anthropic Claude");

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/ai/models").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("openai").is_some() && body.get("google").is_some());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/ai/models/test?provider=openai&model=gpt-4o")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["available"], false);
    assert_eq!(body["error"], "OpenAI API key not provided");
}
