use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use brain_core::{BrainError, BrainIndex, Category, FallbackLimits, FullScan, IndexedSearch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const DEFAULT_MAX_AGE_MS: u64 = 3_600_000;

#[derive(Clone)]
pub struct AppState {
    pub brain: Arc<BrainIndex>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub total_hits: usize,
    #[serde(flatten)]
    pub indexed: IndexedSearch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FullScan>,
}

#[derive(Deserialize)]
pub struct FullSearchParams {
    #[serde(default)]
    pub q: String,
    pub apis: Option<usize>,
    pub docs: Option<usize>,
    pub concepts: Option<usize>,
}

impl FullSearchParams {
    fn limits(&self) -> FallbackLimits {
        let d = FallbackLimits::default();
        FallbackLimits {
            apis: self.apis.unwrap_or(d.apis),
            docs: self.docs.unwrap_or(d.docs),
            concepts: self.concepts.unwrap_or(d.concepts),
        }
    }
}

#[derive(Deserialize)]
pub struct CategoryParam {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct FreshnessParams {
    pub max_age_ms: Option<u64>,
}

/// Error body for the HTTP surface. Caller mistakes map to 400, everything
/// else to 500.
pub enum ApiError {
    Brain(BrainError),
    /// A blocking task panicked or was cancelled.
    Internal(String),
}

impl From<BrainError> for ApiError {
    fn from(e: BrainError) -> Self { Self::Brain(e) }
}

fn error_code(e: &BrainError) -> &'static str {
    match e {
        BrainError::EmptyQuery => "empty_query",
        BrainError::UnknownCategory(_) => "unknown_category",
        _ => "internal",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Brain(e) if e.is_caller_error() => (StatusCode::BAD_REQUEST, error_code(&e), e.to_string()),
            ApiError::Brain(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_code(&e), e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };
        let body = serde_json::json!({ "error": code, "message": message });
        (status, Json(body)).into_response()
    }
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}

/// Run a core call off the async runtime; rebuilds, scans and mtime checks hit the disk.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        ApiError::Internal(e.to_string())
    })
}

pub fn build_app(brain: Arc<BrainIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/brain/rebuild", post(rebuild_handler))
        .route("/brain/stats", get(stats_handler))
        .route("/brain/search", get(search_handler))
        .route("/brain/search/full", get(full_search_handler))
        .route("/brain/keyword/:keyword", get(keyword_handler))
        .route("/brain/freshness", get(freshness_handler))
        .with_state(AppState { brain })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn rebuild_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(move || state.brain.rebuild()).await?;
    Ok(Json(report))
}

pub async fn stats_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = blocking(move || state.brain.stats()).await?;
    Ok(Json(stats))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let category = parse_category(params.category.as_deref())?;
    let brain = state.brain.clone();
    let query = params.q.clone();
    let indexed = blocking(move || brain.search_indexed(&query, category)).await??;

    // Caller-side policy: an empty indexed answer may be widened to a full scan.
    let fallback = if params.fallback && indexed.results.is_empty() {
        let brain = state.brain.clone();
        let query = params.q.clone();
        let full = blocking(move || brain.search_full(&query, FallbackLimits::default())).await??;
        tracing::debug!(query = %params.q, fallback_hits = full.total(), "indexed search empty, used full scan");
        Some(full)
    } else {
        None
    };

    let total_hits = indexed.results.len();
    Ok(Json(SearchResponse { query: params.q, took_ms: start.elapsed().as_millis(), total_hits, indexed, fallback }))
}

pub async fn full_search_handler(State(state): State<AppState>, Query(params): Query<FullSearchParams>) -> Result<Json<FullScan>, ApiError> {
    let limits = params.limits();
    let full = blocking(move || state.brain.search_full(&params.q, limits)).await??;
    Ok(Json(full))
}

pub async fn keyword_handler(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(params): Query<CategoryParam>,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_category(params.category.as_deref())?;
    let lookups = blocking(move || state.brain.search_single_keyword(&keyword, category)).await?;
    Ok(Json(lookups))
}

pub async fn freshness_handler(State(state): State<AppState>, Query(params): Query<FreshnessParams>) -> Result<impl IntoResponse, ApiError> {
    let max_age = Duration::from_millis(params.max_age_ms.unwrap_or(DEFAULT_MAX_AGE_MS));
    let report = blocking(move || state.brain.check_freshness(max_age)).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn panicking_task_is_an_internal_error() {
        let err = blocking(|| -> usize { panic!("index task blew up") }).await.err().unwrap();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn only_caller_errors_are_bad_requests() {
        let resp = ApiError::from(BrainError::EmptyQuery).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = ApiError::from(BrainError::UnknownCategory("recipes".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = ApiError::from(BrainError::DirectoryNotFound(PathBuf::from("/nope"))).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
