//! HTTP API
//!
//! axum router exposing the taxonomy CRUD and the suggestion endpoint.
//! Responses use the `{ok, data}` / `{ok:false, error}` envelope, and
//! mutating routes sit behind the shared-secret middleware.

pub mod routes;

use crate::error::TasnifError;
use crate::i18n;
use crate::store::CategoryStore;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Span};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CategoryStore>,
    /// Shared secret; empty disables the check (dev)
    pub api_token: String,
    /// Default number of suggestions when the caller gives no limit
    pub suggest_limit: usize,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let mutating = Router::new()
        .route(
            "/categories",
            post(routes::add_category)
                .put(routes::update_category)
                .delete(routes::delete_category),
        )
        .route("/categories/add-keyword", post(routes::add_keyword))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token,
        ));

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/categories", get(routes::list_categories))
        .route("/suggest", get(routes::suggest))
        .merge(mutating)
        .layer(
            TraceLayer::new_for_http().on_request(|request: &Request, _span: &Span| {
                info!("{} {}", request.method(), request.uri().path())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Gate mutating calls behind the shared secret
///
/// Accepts the token from the `x-api-token` header or a `token` query
/// parameter, like the original backend.
async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.api_token.is_empty() {
        // No token configured => allow (dev)
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("x-api-token")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| query_token(request.uri()));

    if provided.as_deref() == Some(state.api_token.as_str()) {
        return next.run(request).await;
    }

    warn!("🔒 Rejected mutating request with missing or invalid token");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "ok": false, "error": i18n::tr("error.unauthorized") })),
    )
        .into_response()
}

fn query_token(uri: &Uri) -> Option<String> {
    uri.query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token=").map(str::to_string))
}

/// Error wrapper mapping the tagged store errors onto HTTP statuses
pub struct ApiError(pub TasnifError);

impl<E: Into<TasnifError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            TasnifError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            TasnifError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            TasnifError::Storage(message) => {
                error!("storage failure: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, i18n::tr("error.storage"))
            }
            TasnifError::Remote(message) => {
                error!("remote mirror failure: {}", message);
                (StatusCode::BAD_GATEWAY, i18n::tr("error.storage"))
            }
            other => {
                error!("unhandled error: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, i18n::tr("error.storage"))
            }
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}
