// Dashboard data layer: executes operations against the API, keeps a
// TTL-bound response cache, and exposes loading/error state to views.

pub mod cache;
pub mod queries;
pub mod views;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub use cache::{cache_key, ResponseCache};

/// How operations reach the server. Abstracted so tests can count calls
/// and views never depend on a concrete HTTP stack.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `{ query, variables }` and return the raw response body
    /// (`{ data }` or `{ errors: [...] }`).
    async fn post(
        &self,
        query: &str,
        variables: &Value,
        with_credentials: bool,
    ) -> AppResult<Value>;
}

/// HTTP transport against a live /graphql endpoint.
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// Attach a session token sent when a call asks for credentials.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        query: &str,
        variables: &Value,
        with_credentials: bool,
    ) -> AppResult<Value> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if with_credentials {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Query(format!("Request failed: {}", e)))?;
        response
            .json()
            .await
            .map_err(|e| AppError::Query(format!("Malformed response body: {}", e)))
    }
}

/// Client-side executor with response caching and observable state.
pub struct ApiClient<T: Transport> {
    transport: T,
    cache: Mutex<ResponseCache>,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
    /// Monotone request counter; a finished request only writes state back
    /// if no newer request has started since (superseded responses cannot
    /// clobber newer loading/error state).
    generation: AtomicU64,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, cache_capacity: usize) -> Self {
        Self {
            transport,
            cache: Mutex::new(ResponseCache::new(cache_capacity)),
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop cached responses for operations starting with `prefix`.
    pub fn invalidate(&self, prefix: &str) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate_prefix(prefix)
    }

    /// Execute a query. With `use_cache`, a live cached response (younger
    /// than `ttl`) is returned without a network call; otherwise the result
    /// is fetched, cached, and returned.
    pub async fn execute_query(
        &self,
        operation: &str,
        variables: Value,
        with_credentials: bool,
        use_cache: bool,
        ttl: Duration,
    ) -> AppResult<Value> {
        let key = cache_key(operation, &variables);

        if use_cache {
            let hit = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key, ttl);
            if let Some(data) = hit {
                return Ok(data);
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let outcome = match self
            .transport
            .post(operation, &variables, with_credentials)
            .await
        {
            Ok(body) => extract_data(body),
            Err(e) => Err(e),
        };

        // Cleanup runs on success and failure alike, but only for the
        // newest request.
        if self.generation.load(Ordering::SeqCst) == generation {
            self.loading.store(false, Ordering::SeqCst);
            *self.error.lock().unwrap_or_else(PoisonError::into_inner) =
                outcome.as_ref().err().map(|e| e.to_string());
        }

        let data = outcome?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, data.clone());
        Ok(data)
    }

    /// Execute a mutation: never served from cache, and cached responses
    /// for the given operation prefixes are invalidated on success.
    pub async fn execute_mutation(
        &self,
        operation: &str,
        variables: Value,
        with_credentials: bool,
        invalidate_prefixes: &[&str],
    ) -> AppResult<Value> {
        let data = self
            .execute_query(operation, variables, with_credentials, false, Duration::ZERO)
            .await?;
        for prefix in invalidate_prefixes {
            self.invalidate(prefix.trim());
        }
        Ok(data)
    }
}

/// Unwrap a GraphQL response body: errors win over data, and the first
/// error's message is what views display.
fn extract_data(mut body: Value) -> AppResult<Value> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if let Some(first) = errors.first() {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown GraphQL error");
            return Err(AppError::Query(message.to_string()));
        }
    }
    Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}
