//! Internationalization (i18n) Support
//!
//! Localized user-visible messages for the API layer. Arabic is the
//! primary language of the taxonomy; English is the fallback catalog.

use std::sync::RwLock;
use tracing::info;

/// Current active language
static CURRENT_LANG: RwLock<String> = RwLock::new(String::new());

/// RTL (Right-to-Left) languages
const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ur"];

/// Initialize i18n with the configured language
pub fn init(lang: Option<&str>) {
    set_language(lang.unwrap_or("ar"));
}

/// Set the active language
pub fn set_language(lang: &str) {
    let mut current = CURRENT_LANG.write().expect("i18n lock poisoned");
    *current = lang.to_string();
    info!("🌐 Language set to: {}", lang);
}

/// Get the current language (defaults to Arabic)
pub fn current_language() -> String {
    let lang = CURRENT_LANG.read().expect("i18n lock poisoned").clone();
    if lang.is_empty() {
        "ar".to_string()
    } else {
        lang
    }
}

/// Check if current language is RTL
pub fn is_rtl() -> bool {
    let lang = current_language();
    RTL_LANGUAGES.contains(&lang.as_str())
}

/// Translate a message key (gettext-style)
///
/// Falls back to the English catalog, then to the key itself.
pub fn tr(key: &str) -> String {
    let lang = current_language();
    lookup(&lang, key)
        .or_else(|| lookup("en", key))
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn lookup(lang: &str, key: &str) -> Option<&'static str> {
    let value = match (lang, key) {
        ("ar", "error.unauthorized") => "غير مصرح",
        ("ar", "error.category_not_found") => "التصنيف غير موجود",
        ("ar", "error.duplicate_name") => "اسم التصنيف العربي مكرر",
        ("ar", "error.has_children") => "لا يمكن حذف تصنيف له تصنيفات فرعية",
        ("ar", "error.id_required") => "id مطلوب",
        ("ar", "error.category_id_required") => "معرف التصنيف مطلوب",
        ("ar", "error.keyword_required") => "يجب إدخال كلمة مفتاحية بالعربي أو الإنجليزي على الأقل",
        ("ar", "error.storage") => "تعذر الوصول إلى ملف التصنيفات",
        ("ar", "msg.keywords_added") => "تم إضافة الكلمات المفتاحية بنجاح",
        ("en", "error.unauthorized") => "unauthorized",
        ("en", "error.category_not_found") => "Category not found",
        ("en", "error.duplicate_name") => "Arabic category name is already in use",
        ("en", "error.has_children") => "Cannot delete a category that still has subcategories",
        ("en", "error.id_required") => "id is required",
        ("en", "error.category_id_required") => "Category id is required",
        ("en", "error.keyword_required") => "At least one Arabic or English keyword is required",
        ("en", "error.storage") => "Category storage is unavailable",
        ("en", "msg.keywords_added") => "Keywords added successfully",
        _ => return None,
    };
    Some(value)
}
