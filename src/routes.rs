use axum::{
    extract::{rejection::JsonRejection, State},
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, error, warn};

use crate::config::ServerConfig;
use crate::error::{ApiError, FailureCategory};
use crate::languages;
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResponse, Translation};

pub const SERVICE_NAME: &str = "quick-translate";

pub fn create_routes(config: &ServerConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/translate", post(translate))
        .route("/health", get(health_check));

    match &config.static_dir {
        Some(dir) => {
            router.fallback_service(ServeDir::new(dir).not_found_service(not_found.into_service()))
        }
        None => router.fallback(not_found),
    }
}

/// Full application: routes, CORS, request tracing and state
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state.config.server))
        .layer(cors_layer(&state.config.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected translate body: {}", rejection);
        ApiError::bad_request("Invalid JSON body")
    })?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Text not provided"));
    }

    let max_len = state.config.translation.max_text_length;
    if text.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "Text exceeds the maximum of {} characters",
            max_len
        )));
    }

    let source_lang = request.source_lang.as_str();
    let target_lang = request.target_lang.as_str();
    if !languages::is_supported_source(source_lang) {
        return Err(ApiError::bad_request(format!(
            "Unsupported source language: {}",
            source_lang
        )));
    }
    if !languages::is_supported_target(target_lang) {
        return Err(ApiError::bad_request(format!(
            "Unsupported target language: {}",
            target_lang
        )));
    }

    // Nothing to translate between identical languages
    if source_lang == target_lang {
        return Ok(Json(TranslateResponse::success(Translation::new(
            text,
            Some(source_lang.to_string()),
        ))));
    }

    match state.translator.translate(text, source_lang, target_lang).await {
        Ok(translation) => Ok(Json(TranslateResponse::success(translation))),
        Err(err) => {
            match err.category() {
                FailureCategory::Payload => warn!("Translation rejected: {}", err),
                _ => error!("Translation error: {}", err),
            }
            Err(err.into())
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "translation_service": state.translator.name(),
        "supported_languages": languages::codes(),
    }))
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}
