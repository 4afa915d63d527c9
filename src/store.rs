//! Category Store
//!
//! Persistence seam for the taxonomy: a JSON-file store and a remote
//! mirror that proxies the same operations to another instance of this
//! API. The matching core never touches this layer; it only consumes the
//! decoded collection.

use crate::audit;
use crate::category::Category;
use crate::core::normalizer::normalize;
use crate::error::{TasnifError, TasnifResult};
use crate::i18n;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;
use tracing::{info, warn};

/// Data files inside the data directory; reads prefer bundled snapshots,
/// writes always land on the base file
const BASE_FILE: &str = "categories.json";
const MERGED_FILE: &str = "categories_merged.json";
const BUNDLED_FILE: &str = "categories_bundled.json";

/// New-category payload; the store assigns the id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub search_key_words_ar: Vec<String>,
    #[serde(default)]
    pub search_key_words_en: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<u32>,
    #[serde(default)]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub negative_key_words_ar: Vec<String>,
    #[serde(default)]
    pub negative_key_words_en: Vec<String>,
    #[serde(default)]
    pub disallow_partial: bool,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_key_words_ar: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_key_words_en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_key_words_ar: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_key_words_en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallow_partial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Body of `POST /categories/add-keyword`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddKeywordRequest {
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_en: Option<String>,
}

/// Async seam over the two store backends
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Full collection snapshot, in stored order
    async fn list(&self) -> TasnifResult<Vec<Category>>;

    async fn add(&self, draft: CategoryDraft) -> TasnifResult<Category>;

    async fn update(&self, update: CategoryUpdate) -> TasnifResult<Category>;

    async fn delete(&self, id: u32) -> TasnifResult<Category>;

    async fn add_keywords(
        &self,
        id: u32,
        keyword_ar: Option<String>,
        keyword_en: Option<String>,
    ) -> TasnifResult<Category>;
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// JSON-file backed store
///
/// Reads re-decode the file on every call (small catalogs); writers are
/// serialized behind one lock so read-modify-write cycles never interleave.
pub struct FileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Prefer bundled -> merged -> base
    fn read_path(&self) -> PathBuf {
        for name in [BUNDLED_FILE, MERGED_FILE, BASE_FILE] {
            let path = self.data_dir.join(name);
            if path.exists() {
                return path;
            }
        }
        self.data_dir.join(BASE_FILE)
    }

    async fn read_all(&self) -> TasnifResult<Vec<Category>> {
        let path = self.read_path();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TasnifError::Storage(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| TasnifError::Storage(format!("{}: {}", path.display(), e)))
    }

    async fn write_all(&self, categories: &[Category]) -> TasnifResult<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let pretty = serde_json::to_string_pretty(categories)?;
        tokio::fs::write(self.data_dir.join(BASE_FILE), pretty).await?;
        Ok(())
    }

    fn audit(&self, entry: &str) {
        if let Err(e) = audit::log(&self.data_dir, entry) {
            warn!("Failed to write audit log: {}", e);
        }
    }
}

/// Duplicate check with the same normalization the matcher uses, so
/// "مَخابز" and "مخابز" collide
fn ensure_unique_name(
    categories: &[Category],
    name_ar: &str,
    skip_id: Option<u32>,
) -> TasnifResult<()> {
    let needle = normalize(name_ar);
    let taken = categories
        .iter()
        .any(|c| Some(c.id) != skip_id && normalize(&c.name_ar) == needle);
    if taken {
        return Err(TasnifError::Validation(i18n::tr("error.duplicate_name")));
    }
    Ok(())
}

fn materialize(draft: CategoryDraft, id: u32) -> Category {
    Category {
        id,
        name_ar: draft.name_ar,
        name_en: draft.name_en,
        code: draft.code,
        search_key_words_ar: draft.search_key_words_ar,
        search_key_words_en: draft.search_key_words_en,
        parent_id: draft.parent_id,
        description_ar: draft.description_ar,
        description_en: draft.description_en,
        negative_key_words_ar: draft.negative_key_words_ar,
        negative_key_words_en: draft.negative_key_words_en,
        disallow_partial: draft.disallow_partial,
        domain: draft.domain,
    }
}

fn apply_update(category: &mut Category, update: CategoryUpdate) {
    if let Some(v) = update.name_ar {
        category.name_ar = v;
    }
    if let Some(v) = update.name_en {
        category.name_en = v;
    }
    if let Some(v) = update.code {
        category.code = v;
    }
    if let Some(v) = update.search_key_words_ar {
        category.search_key_words_ar = v;
    }
    if let Some(v) = update.search_key_words_en {
        category.search_key_words_en = v;
    }
    if let Some(v) = update.parent_id {
        category.parent_id = Some(v);
    }
    if let Some(v) = update.description_ar {
        category.description_ar = Some(v);
    }
    if let Some(v) = update.description_en {
        category.description_en = Some(v);
    }
    if let Some(v) = update.negative_key_words_ar {
        category.negative_key_words_ar = v;
    }
    if let Some(v) = update.negative_key_words_en {
        category.negative_key_words_en = v;
    }
    if let Some(v) = update.disallow_partial {
        category.disallow_partial = v;
    }
    if let Some(v) = update.domain {
        category.domain = Some(v);
    }
}

#[async_trait]
impl CategoryStore for FileStore {
    async fn list(&self) -> TasnifResult<Vec<Category>> {
        self.read_all().await
    }

    async fn add(&self, draft: CategoryDraft) -> TasnifResult<Category> {
        let _guard = self.write_lock.lock().await;
        let mut categories = self.read_all().await?;

        ensure_unique_name(&categories, &draft.name_ar, None)?;

        let next_id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = materialize(draft, next_id);
        categories.push(category.clone());
        self.write_all(&categories).await?;

        info!("➕ Category added: id={} '{}'", category.id, category.name_ar);
        self.audit(&format!(
            "Category Added: id={} name_ar={}",
            category.id, category.name_ar
        ));
        Ok(category)
    }

    async fn update(&self, update: CategoryUpdate) -> TasnifResult<Category> {
        let Some(id) = update.id else {
            return Err(TasnifError::Validation(i18n::tr("error.id_required")));
        };

        let _guard = self.write_lock.lock().await;
        let mut categories = self.read_all().await?;

        let Some(idx) = categories.iter().position(|c| c.id == id) else {
            return Err(TasnifError::NotFound(i18n::tr("error.category_not_found")));
        };

        if let Some(name_ar) = update.name_ar.as_deref() {
            ensure_unique_name(&categories, name_ar, Some(id))?;
        }

        apply_update(&mut categories[idx], update);
        let updated = categories[idx].clone();
        self.write_all(&categories).await?;

        info!("✏️ Category updated: id={}", id);
        self.audit(&format!("Category Updated: id={}", id));
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> TasnifResult<Category> {
        let _guard = self.write_lock.lock().await;
        let mut categories = self.read_all().await?;

        let Some(idx) = categories.iter().position(|c| c.id == id) else {
            return Err(TasnifError::NotFound(i18n::tr("error.category_not_found")));
        };

        // A parent with live children must not disappear from under them
        if categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(TasnifError::Validation(i18n::tr("error.has_children")));
        }

        let removed = categories.remove(idx);
        self.write_all(&categories).await?;

        info!("🗑️ Category deleted: id={} '{}'", removed.id, removed.name_ar);
        self.audit(&format!(
            "Category Deleted: id={} name_ar={}",
            removed.id, removed.name_ar
        ));
        Ok(removed)
    }

    async fn add_keywords(
        &self,
        id: u32,
        keyword_ar: Option<String>,
        keyword_en: Option<String>,
    ) -> TasnifResult<Category> {
        let keyword_ar = keyword_ar.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        let keyword_en = keyword_en.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        if keyword_ar.is_none() && keyword_en.is_none() {
            return Err(TasnifError::Validation(i18n::tr("error.keyword_required")));
        }

        let _guard = self.write_lock.lock().await;
        let mut categories = self.read_all().await?;

        let Some(idx) = categories.iter().position(|c| c.id == id) else {
            return Err(TasnifError::NotFound(i18n::tr("error.category_not_found")));
        };

        let category = &mut categories[idx];
        if let Some(kw) = keyword_ar {
            if !category.search_key_words_ar.contains(&kw) {
                category.search_key_words_ar.push(kw);
            }
        }
        if let Some(kw) = keyword_en {
            if !category.search_key_words_en.contains(&kw) {
                category.search_key_words_en.push(kw);
            }
        }

        let updated = categories[idx].clone();
        self.write_all(&categories).await?;

        self.audit(&format!("Keywords Added: id={}", id));
        Ok(updated)
    }
}

// ---------------------------------------------------------------------------
// Remote mirror
// ---------------------------------------------------------------------------

/// `{ok, data}` / `{ok:false, error}` envelope used by the API
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    ok: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Proxies store operations to a remote instance of this API
///
/// Reads retry with exponential backoff; mutations are forwarded once and
/// carry the shared secret.
pub struct RemoteStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.header("x-api-token", &self.token)
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> TasnifResult<T> {
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;

        if envelope.ok {
            return envelope
                .data
                .ok_or_else(|| TasnifError::Remote("empty response payload".to_string()));
        }

        let message = envelope.error.unwrap_or_else(|| status.to_string());
        Err(match status.as_u16() {
            404 => TasnifError::NotFound(message),
            400 => TasnifError::Validation(message),
            _ => TasnifError::Remote(message),
        })
    }

    async fn fetch_list(&self) -> TasnifResult<Vec<Category>> {
        let response = self.client.get(self.endpoint("/categories")).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl CategoryStore for RemoteStore {
    async fn list(&self) -> TasnifResult<Vec<Category>> {
        let strategy = ExponentialBackoff::from_millis(200).take(2);
        Retry::spawn(strategy, || self.fetch_list()).await
    }

    async fn add(&self, draft: CategoryDraft) -> TasnifResult<Category> {
        let response = self
            .with_token(self.client.post(self.endpoint("/categories")))
            .json(&draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, update: CategoryUpdate) -> TasnifResult<Category> {
        let response = self
            .with_token(self.client.put(self.endpoint("/categories")))
            .json(&update)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: u32) -> TasnifResult<Category> {
        let response = self
            .with_token(
                self.client
                    .delete(self.endpoint(&format!("/categories?id={}", id))),
            )
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn add_keywords(
        &self,
        id: u32,
        keyword_ar: Option<String>,
        keyword_en: Option<String>,
    ) -> TasnifResult<Category> {
        let request = AddKeywordRequest {
            category_id: Some(id),
            keyword_ar,
            keyword_en,
        };
        let response = self
            .with_token(self.client.post(self.endpoint("/categories/add-keyword")))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: u32, name_ar: &str) -> Category {
        Category {
            id,
            name_ar: name_ar.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_name_uses_matcher_normalization() {
        let categories = vec![named(1, "مخابز")];

        // Diacritics and hamza variants collide with the stored name
        assert!(ensure_unique_name(&categories, "مَخابز", None).is_err());
        assert!(ensure_unique_name(&categories, "مطاعم", None).is_ok());

        // A category may keep its own name on update
        assert!(ensure_unique_name(&categories, "مخابز", Some(1)).is_ok());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let mut category = named(3, "مقاهي");
        category.search_key_words_ar = vec!["قهوة".to_string()];

        apply_update(
            &mut category,
            CategoryUpdate {
                id: Some(3),
                name_en: Some("Cafes".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(category.name_en, "Cafes");
        assert_eq!(category.name_ar, "مقاهي");
        assert_eq!(category.search_key_words_ar, vec!["قهوة".to_string()]);
    }

    #[test]
    fn test_materialize_assigns_id() {
        let draft = CategoryDraft {
            name_ar: "ورد".to_string(),
            ..Default::default()
        };
        let category = materialize(draft, 12);
        assert_eq!(category.id, 12);
        assert_eq!(category.name_ar, "ورد");
        assert!(category.search_key_words_en.is_empty());
    }
}
