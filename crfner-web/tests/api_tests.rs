use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use crfner_core::{CrfPredictor, FeatureMap, LabelPredictor, LabelingPipeline, NerError};
use crfner_web::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "crfner-test-boundary";

/// Rotula como "ENT" todo token capitalizado que não é o primeiro.
struct StubPredictor {
    labels: Vec<String>,
}

impl LabelPredictor for StubPredictor {
    fn predict(&self, features: &[FeatureMap]) -> crfner_core::Result<Vec<String>> {
        Ok(features
            .iter()
            .map(|f| (if f.is_capitalized && !f.is_first { "ENT" } else { "O" }).to_string())
            .collect())
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

struct FailingPredictor;

impl LabelPredictor for FailingPredictor {
    fn predict(&self, _features: &[FeatureMap]) -> crfner_core::Result<Vec<String>> {
        Err(NerError::SchemaMismatch {
            missing: vec!["word".into()],
            unexpected: vec![],
        })
    }
}

fn app_with(predictor: Arc<dyn LabelPredictor>) -> Router {
    let state = Arc::new(AppState::new(
        LabelingPipeline::new(predictor).unwrap(),
        ServerConfig::default(),
    ));
    create_router(state)
}

fn stub_app() -> Router {
    app_with(Arc::new(StubPredictor {
        labels: vec!["O".into(), "ENT".into()],
    }))
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(
        stub_app(),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["labels"], json!(["O", "ENT"]));
}

#[tokio::test]
async fn test_predict_labels_every_token() {
    let (status, body) = send(
        stub_app(),
        json_request("/predict", json!({ "phrase": "Jean habite à Paris." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phrase"], "Jean habite à Paris.");
    assert_eq!(
        body["annotations"],
        json!([
            { "mot": "Jean", "annotation": "O" },
            { "mot": "habite", "annotation": "O" },
            { "mot": "a", "annotation": "O" },
            { "mot": "Paris", "annotation": "ENT" },
            { "mot": ".", "annotation": "ENT" },
        ])
    );
}

#[tokio::test]
async fn test_predict_empty_phrase() {
    let (status, body) = send(stub_app(), json_request("/predict", json!({ "phrase": "   " }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annotations"], json!([]));
}

#[tokio::test]
async fn test_predict_without_phrase_is_bad_request() {
    let (status, body) = send(stub_app(), json_request("/predict", json!({ "text": "Jean" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_input");
}

#[tokio::test]
async fn test_predict_invalid_json_is_bad_request() {
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ phrase"))
        .unwrap();
    let (status, _) = send(stub_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predictor_failure_is_server_error() {
    let (status, body) = send(
        app_with(Arc::new(FailingPredictor)),
        json_request("/predict", json!({ "phrase": "Jean habite Paris" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "schema_mismatch");
}

#[tokio::test]
async fn test_features_endpoint() {
    let (status, body) = send(
        stub_app(),
        json_request("/features", json!({ "phrase": "Jean habite Paris" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tokens = body.as_array().unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0]["token"]["text"], "Jean");
    assert_eq!(tokens[0]["features"]["is_first"], true);
    assert_eq!(tokens[0]["features"]["next_word"], "habite");
    assert_eq!(tokens[2]["features"]["suffix-3"], "ris");
    assert_eq!(tokens[2]["features"]["is_last"], true);
}

#[tokio::test]
async fn test_upload_plain_text() {
    let (status, body) = send(
        stub_app(),
        multipart_request("file", "lettre.txt", "Jean habite Lyon".as_bytes()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phrase"], "Jean habite Lyon");
    assert_eq!(body["annotations"][2], json!({ "mot": "Lyon", "annotation": "ENT" }));
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let (status, body) = send(
        stub_app(),
        multipart_request("document", "lettre.txt", b"Jean habite Lyon"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn test_upload_unreadable_document() {
    let (status, body) = send(
        stub_app(),
        multipart_request("file", "binaire.txt", &[0xff, 0xfe, 0x00]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "extraction_failure");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::from(json!({ "phrase": "Paris" }).to_string()))
        .unwrap();
    let response = stub_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let request = Request::get("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = stub_app().oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_preflight_only_for_configured_origin() {
    let preflight = |origin: &'static str| {
        Request::options("/predict")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = stub_app()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let denied = stub_app()
        .oneshot(preflight("http://localhost:4000"))
        .await
        .unwrap();
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_shipped_model_annotates_french() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../models/crf_model.json");
    let predictor = CrfPredictor::load(path).unwrap();
    let (status, body) = send(
        app_with(Arc::new(predictor)),
        json_request("/predict", json!({ "phrase": "Jean habite à Paris." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["annotation"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["B-PER", "O", "O", "B-LOC", "O"]);
}
