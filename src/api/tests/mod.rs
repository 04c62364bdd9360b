use super::*;
use crate::provider::RetrievalProvider;
use crate::test_helpers::{Script, ScriptedProvider, saved_name};
use crate::types::BatchSummary;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Config rooted in a fresh temp dir
fn test_config() -> (Config, TempDir) {
    let temp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.output_dir = temp.path().join("downloads");
    config.output.failure_log = temp.path().join("error.log");
    (config, temp)
}

fn router_with(config: Config, provider: Arc<dyn RetrievalProvider>) -> (Router, BatchOrchestrator) {
    let orchestrator = BatchOrchestrator::new(&config, provider);
    (
        create_router(orchestrator.clone(), Arc::new(config)),
        orchestrator,
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_page_serves_form() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"cookies\""));
    assert!(html.contains("name=\"url\""));
}

#[tokio::test]
async fn get_cookies_page_is_html() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get-cookies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(response).await.contains("Cookie"));
}

#[tokio::test]
async fn form_submission_runs_batch_and_confirms() {
    let (config, _temp) = test_config();
    let failure_log = config.output.failure_log.clone();
    let provider = Arc::new(ScriptedProvider::new().with("https://site/q/1", Script::NotFound));
    let (app, orchestrator) = router_with(config, provider.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "cookies=z_c0%3Dabc&url=https%3A%2F%2Fsite%2Fq%2F1%0D%0A%0D%0Ahttps%3A%2F%2Fsite%2Fq%2F2",
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().starts_with("files saved to the "));
    assert_eq!(json["failure_log"], failure_log.display().to_string());

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].credential, "z_c0=abc");
    assert_eq!(calls[1].locator, "https://site/q/2");

    assert!(
        orchestrator
            .output_dir()
            .join(saved_name("https://site/q/2"))
            .exists()
    );
    let log = std::fs::read_to_string(failure_log).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.starts_with("processing URL failed: https://site/q/1, error: "));
}

#[tokio::test]
async fn json_batch_returns_summary() {
    let (config, _temp) = test_config();
    let provider = Arc::new(
        ScriptedProvider::new().with("https://site/a", Script::Fail("bad page".to_string())),
    );
    let (app, _) = router_with(config, provider);

    let response = app
        .oneshot(json_post(
            "/api/v1/batches",
            serde_json::json!({
                "urls": "https://site/a\nhttps://site/b\nhttps://site/c",
                "cookies": ""
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let summary: BatchSummary = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn blank_batch_is_accepted_without_calls() {
    let (config, _temp) = test_config();
    let output_dir = config.output.output_dir.clone();
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _) = router_with(config, provider.clone());

    let response = app
        .oneshot(json_post(
            "/api/v1/batches",
            serde_json::json!({ "urls": "\n  \n" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
    assert!(provider.calls().is_empty());
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn unopenable_failure_log_returns_500() {
    let (mut config, temp) = test_config();
    // A directory cannot be opened for appending
    config.output.failure_log = temp.path().to_path_buf();
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _) = router_with(config, provider.clone());

    let response = app
        .oneshot(json_post(
            "/api/v1/batches",
            serde_json::json!({ "urls": "https://site/a" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "failure_log_error");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (config, _temp) = test_config();
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _) = router_with(config, provider.clone());

    let response = app
        .oneshot(json_post(
            "/api/v1/batches",
            serde_json::json!({ "cookies": "only" }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_json_is_served() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/api/v1/batches"].is_object());
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let (mut config, _temp) = test_config();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn cors_headers_absent_when_disabled() {
    let (mut config, _temp) = test_config();
    config.server.api.cors_enabled = false;
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn swagger_ui_can_be_disabled() {
    let (mut config, _temp) = test_config();
    config.server.api.swagger_ui = false;
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn server_stops_on_shutdown_signal() {
    let (mut config, _temp) = test_config();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);
    let orchestrator = BatchOrchestrator::new(&config, Arc::new(ScriptedProvider::new()));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server(orchestrator, config, async move {
        let _ = rx.await;
    }));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
}

#[tokio::test]
async fn client_request_id_is_echoed_back() {
    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));

    let response = app
        .oneshot(json_post(
            "/api/v1/batches",
            serde_json::json!({ "urls": "" }),
        ))
        .await
        .unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let (config, _temp) = test_config();
    let (app, _) = router_with(config, Arc::new(ScriptedProvider::new()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/get-cookies")
                .header("X-Request-ID", "batch-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "batch-42");
}
