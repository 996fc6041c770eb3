use axum::{Router, body::Body, http::{Request, StatusCode}};
use common::{
    TestError, TestResult, config::ServerConfig, sample_ad_payload, test_assert, test_assert_eq,
    test_helpers::test_utils,
};
use http_body_util::BodyExt;
use scoring::{
    ResponseNormalizer,
    analyzer::Analyzer,
    error::MISSING_AD_MESSAGE,
    executable_utils::{AppState, build_router, cors_layer},
    model::AnalyzeResponse,
};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app() -> Router {
    let analyzer = Analyzer::heuristic_only(ResponseNormalizer::default());
    let state = AppState::new(Arc::new(analyzer), None);
    build_router(state, &ServerConfig::default()).expect("default server config is valid")
}

async fn send(app: Router, method: &str, uri: &str, body: Option<String>) -> TestResult<(StatusCode, String)> {
    let request = test_utils::build_request(method, uri, body)?;
    let (parts, body) = request.into_parts();
    let request = Request::from_parts(parts, Body::from(body));

    let response = app
        .oneshot(request)
        .await
        .map_err(|e| TestError::generic(format!("Request failed: {}", e)))?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TestError::generic(format!("Body read failed: {}", e)))?
        .to_bytes();
    let text = String::from_utf8(bytes.to_vec()).map_err(|e| TestError::generic(e.to_string()))?;
    Ok((status, text))
}

#[tokio::test]
async fn analyze_returns_success_envelope() -> TestResult {
    let body = serde_json::json!({ "data": sample_ad_payload() }).to_string();

    let (status, text) = send(create_test_app(), "POST", "/analyze", Some(body)).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    let response: AnalyzeResponse = serde_json::from_str(&text)?;
    test_assert!(response.success);
    test_assert!(response.error.is_none());
    let data = response.data.ok_or_else(|| TestError::assertion_failure("missing data"))?;
    test_assert_eq!(data.overall_score, 75);
    Ok(())
}

#[tokio::test]
async fn legacy_function_path_is_served() -> TestResult {
    let body = serde_json::json!({ "data": { "title": "Scooter" } }).to_string();
    let (status, _) = send(create_test_app(), "POST", "/.netlify/functions/analyze", Some(body)).await?;
    test_utils::check_status_code(status, StatusCode::OK)
}

#[tokio::test]
async fn missing_data_is_rejected() -> TestResult {
    for body in [None, Some("{}".to_string()), Some(r#"{"data": null}"#.to_string())] {
        let (status, text) = send(create_test_app(), "POST", "/analyze", body).await?;

        test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
        let json = test_utils::parse_json(&text)?;
        test_assert_eq!(json["success"], false);
        test_assert_eq!(json["error"], MISSING_AD_MESSAGE);
        test_assert!(json.get("data").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn missing_title_is_rejected() -> TestResult {
    let body = serde_json::json!({ "data": { "price": "10 €", "description": "Sans titre" } }).to_string();
    let (status, text) = send(create_test_app(), "POST", "/analyze", Some(body)).await?;

    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    test_assert!(text.contains(MISSING_AD_MESSAGE));
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() -> TestResult {
    let (status, text) = send(create_test_app(), "POST", "/analyze", Some("{invalid json}".to_string())).await?;

    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    let json = test_utils::parse_json(&text)?;
    test_assert_eq!(json["success"], false);
    test_assert!(json["error"].as_str().is_some_and(|e| e.starts_with("invalid request body")));
    Ok(())
}

#[tokio::test]
async fn health_check_answers_ok() -> TestResult {
    let (status, text) = send(create_test_app(), "GET", "/health", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(text, "OK");
    Ok(())
}

#[tokio::test]
async fn metrics_are_not_found_without_recorder() -> TestResult {
    let (status, _) = send(create_test_app(), "GET", "/metrics", None).await?;
    test_utils::check_status_code(status, StatusCode::NOT_FOUND)
}

#[tokio::test]
async fn cors_preflight_is_answered() -> TestResult {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/analyze")
        .header("Origin", "chrome-extension://abcdef")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())?;

    let response = create_test_app()
        .oneshot(request)
        .await
        .map_err(|e| TestError::generic(format!("Request failed: {}", e)))?;

    test_utils::check_status_code(response.status(), StatusCode::OK)?;
    test_assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[test]
fn invalid_allowed_origin_is_a_config_error() {
    assert!(cors_layer("https://ok.example").is_ok());
    assert!(cors_layer("bad\norigin").is_err());
}
