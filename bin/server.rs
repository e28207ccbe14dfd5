// Deathbat Twin Finder - Web Server
// JSON API over the twin matcher plus the static front-end

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use deathbat_twin::{
    attach_owner, resolve_twin, Catalog, Deathbat, MarketplaceRegistry, TwinError, TwinOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state. The catalog is loaded once before the server
/// accepts traffic and shared read-only across request handlers.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    owners: Arc<MarketplaceRegistry>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct TwinQuery {
    token_id: String,
}

/// Twin response: the source record plus either its twin or a one-of-one
/// marker. Both records carry enriched owners (or "unknown").
#[derive(Serialize)]
struct TwinResponse {
    source: Deathbat,
    #[serde(skip_serializing_if = "Option::is_none")]
    twin: Option<Deathbat>,
    one_of_one: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u32>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /twin?token_id=N - Resolve the twin for one token id
async fn twin(State(state): State<AppState>, Query(query): Query<TwinQuery>) -> impl IntoResponse {
    tracing::info!("GET /twin?token_id={}", query.token_id);

    // Range-check before touching the catalog; non-numeric and out-of-range
    // ids are both a 400.
    let Some(range) = state.catalog.id_range() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<TwinResponse>::err("catalog is empty")),
        );
    };
    let invalid = TwinError::InvalidTokenId {
        min: *range.start(),
        max: *range.end(),
    };
    let token_id: u32 = match query.token_id.parse() {
        Ok(id) if range.contains(&id) => id,
        _ => {
            tracing::warn!("twin: {}: {}", query.token_id, invalid);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err(invalid.to_string())),
            );
        }
    };

    // The match itself is a pure in-memory scan; only the owner lookups do
    // I/O, so only they leave the async context.
    let (source, outcome) = {
        let resolved = match resolve_twin(&state.catalog, token_id) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!("twin: {}: {}", token_id, err);
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::err(err.to_string())),
                );
            }
        };
        let twin = match resolved.outcome {
            TwinOutcome::Twin { record, score } => Some((record.clone(), score)),
            TwinOutcome::OneOfOne => None,
        };
        (resolved.source.clone(), twin)
    };

    let owners = state.owners.clone();
    let response = tokio::task::spawn_blocking(move || {
        let mut source = source;
        attach_owner(owners.as_ref(), &mut source);

        let (twin, score) = match outcome {
            Some((mut record, score)) => {
                attach_owner(owners.as_ref(), &mut record);
                (Some(record), Some(score))
            }
            None => (None, None),
        };

        TwinResponse {
            one_of_one: twin.is_none(),
            source,
            twin,
            score,
        }
    })
    .await;

    match response {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::ok(response))),
        Err(err) => {
            tracing::error!("twin: {}: join error: {}", token_id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err("internal error")),
            )
        }
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../static/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let catalog_path =
        std::env::var("DEATHBATS_JSON").unwrap_or_else(|_| "deathbats.json".to_string());
    let catalog = Catalog::load(&catalog_path)?;
    tracing::info!("loaded {} Deathbats from {}", catalog.len(), catalog_path);

    // Blocking reqwest client; build it off the async runtime.
    let owners = tokio::task::spawn_blocking(MarketplaceRegistry::new).await?;

    let state = AppState {
        catalog: Arc::new(catalog),
        owners: Arc::new(owners),
    };

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/twin", get(twin))
        .route("/api/health", get(health_check))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:6660".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("twin server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
