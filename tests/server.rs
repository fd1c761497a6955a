mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::ScriptedEngine;
use quick_translate::{
    config::Config, routes, state::AppState, TranslateError, Translation,
};

fn app_with(engine: Arc<ScriptedEngine>) -> Router {
    routes::build_app(AppState::with_translator(Config::default(), engine))
}

fn echo_engine() -> Arc<ScriptedEngine> {
    ScriptedEngine::new(|text, source, _target| {
        let detected = if source == "auto" { "en" } else { source };
        Ok(Translation::new(
            format!("[{}]", text),
            Some(detected.to_string()),
        ))
    })
}

async fn post_translate(app: Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn translates_with_detected_language() {
    let engine = echo_engine();
    let (status, body) = post_translate(
        app_with(engine.clone()),
        json!({"text": "  Hello world ", "source_lang": "auto", "target_lang": "pt"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"translation": "[Hello world]", "detected_language": "en"}));
    assert_eq!(
        engine.calls.lock().unwrap().clone(),
        vec![("Hello world".to_string(), "auto".to_string(), "pt".to_string())]
    );
}

#[tokio::test]
async fn missing_languages_default_to_auto_and_english() {
    let engine = echo_engine();
    let (status, _) =
        post_translate(app_with(engine.clone()), json!({"text": "Bonjour"}).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let calls = engine.calls.lock().unwrap().clone();
    assert_eq!(calls[0].1, "auto");
    assert_eq!(calls[0].2, "en");
}

#[tokio::test]
async fn same_language_is_echoed_without_upstream_call() {
    let engine = echo_engine();
    let (status, body) = post_translate(
        app_with(engine.clone()),
        json!({"text": "Olá", "source_lang": "pt", "target_lang": "pt"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"translation": "Olá", "detected_language": "pt"}));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let cases = [
        ("{not json".to_string(), "Invalid JSON body"),
        (json!({"text": "   "}).to_string(), "Text not provided"),
        (
            json!({"text": "Hello", "source_lang": "xx", "target_lang": "pt"}).to_string(),
            "Unsupported source language: xx",
        ),
        (
            json!({"text": "Hello", "source_lang": "en", "target_lang": "auto"}).to_string(),
            "Unsupported target language: auto",
        ),
    ];

    for (body, message) in cases {
        let engine = echo_engine();
        let (status, response) = post_translate(app_with(engine.clone()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": message }));
        assert_eq!(engine.call_count(), 0);
    }
}

#[tokio::test]
async fn overly_long_text_is_rejected() {
    let mut config = Config::default();
    config.translation.max_text_length = 10;
    let engine = echo_engine();
    let app = routes::build_app(AppState::with_translator(config, engine.clone()));

    let (status, body) = post_translate(
        app,
        json!({"text": "This is far too long", "target_lang": "pt"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("10 characters"));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn upstream_failures_map_to_status_codes() {
    let cases = [
        (
            TranslateError::Payload("unsupported language".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            TranslateError::Connectivity("timed out".to_string()),
            StatusCode::BAD_GATEWAY,
        ),
        (
            TranslateError::Server {
                status: 503,
                message: "busy".to_string(),
            },
            StatusCode::BAD_GATEWAY,
        ),
        (
            TranslateError::Unknown("odd".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let engine = ScriptedEngine::new(move |_, _, _| Err(error.clone()));
        let (status, body) = post_translate(
            app_with(engine),
            json!({"text": "Hello", "target_lang": "pt"}).to_string(),
        )
        .await;
        assert_eq!(status, expected);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn health_reports_engine_and_languages() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app_with(echo_engine()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["translation_service"], "scripted");
    assert_eq!(body["supported_languages"][0], "auto");
}

#[tokio::test]
async fn unknown_routes_return_json_404() {
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();
    let response = app_with(echo_engine()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Page not found"}));
}
