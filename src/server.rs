// HTTP surface: a single /graphql endpoint plus a health probe, with a
// CORS allow-list and bearer-token session extraction.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::config::CorsConfig;
use crate::session::{Session, SessionKeys};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut req = req.into_inner();
    if let Some(session) = extract_session(&headers, &state.keys) {
        req = req.data(session);
    }
    state.schema.execute(req).await.into()
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.store.ping().await.is_ok();
    Json(serde_json::json!({
        "status": if store_ok { "healthy" } else { "degraded" },
        "service": "taskboard",
        "store": store_ok,
    }))
}

/// Pull an authenticated session out of the Authorization header.
/// Absent or invalid tokens yield an anonymous request; auth-sensitive
/// resolvers reject those themselves.
fn extract_session(headers: &HeaderMap, keys: &SessionKeys) -> Option<Session> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?;
    match keys.verify(token) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Rejected session token: {}", e);
            None
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring malformed CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
