//! Route Handlers
//!
//! Thin translation between HTTP and the store/matcher; all validation
//! lives in the store, all scoring in the core.

use crate::api::{ApiError, AppState};
use crate::core::matcher::{filter_categories, match_categories};
use crate::error::TasnifError;
use crate::i18n;
use crate::store::{AddKeywordRequest, CategoryDraft, CategoryUpdate};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// GET / - plain-text endpoint listing
pub async fn index() -> &'static str {
    concat!(
        "Tasnif Taxonomy API\n",
        "\n",
        "Available endpoints:\n",
        "- GET    /health\n",
        "- GET    /categories[?q=...]\n",
        "- GET    /suggest?q=...[&limit=N]\n",
        "- POST   /categories              (requires x-api-token if configured)\n",
        "- PUT    /categories              (requires x-api-token if configured)\n",
        "- DELETE /categories?id=...       (requires x-api-token if configured)\n",
        "- POST   /categories/add-keyword  (requires x-api-token if configured)\n",
    )
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// GET /categories - full collection, or substring-filtered with `?q=`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let categories = state.store.list().await?;
    let data = match params.q.as_deref() {
        Some(q) => serde_json::to_value(filter_categories(q, &categories))?,
        None => serde_json::to_value(&categories)?,
    };
    Ok(Json(json!({ "ok": true, "data": data })))
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// GET /suggest - ranked category matches for a free-text store name
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.q.unwrap_or_default();
    let limit = params.limit.unwrap_or(state.suggest_limit);

    let categories = state.store.list().await?;
    let matches = match_categories(&query, &categories, limit);
    Ok(Json(json!({ "ok": true, "data": matches })))
}

/// POST /categories
pub async fn add_category(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.store.add(draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "data": category })),
    ))
}

/// PUT /categories
pub async fn update_category(
    State(state): State<AppState>,
    Json(update): Json<CategoryUpdate>,
) -> Result<Json<Value>, ApiError> {
    let category = state.store.update(update).await?;
    Ok(Json(json!({ "ok": true, "data": category })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<u32>,
}

/// DELETE /categories?id=...
pub async fn delete_category(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let Some(id) = params.id else {
        return Err(TasnifError::Validation(i18n::tr("error.id_required")).into());
    };

    let removed = state.store.delete(id).await?;
    Ok(Json(json!({ "ok": true, "data": removed })))
}

/// POST /categories/add-keyword
pub async fn add_keyword(
    State(state): State<AppState>,
    Json(request): Json<AddKeywordRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(id) = request.category_id else {
        return Err(TasnifError::Validation(i18n::tr("error.category_id_required")).into());
    };

    let category = state
        .store
        .add_keywords(id, request.keyword_ar, request.keyword_en)
        .await?;
    Ok(Json(json!({
        "ok": true,
        "message": i18n::tr("msg.keywords_added"),
        "data": category,
    })))
}
