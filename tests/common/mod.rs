//! Shared fixtures for the integration tests

use std::path::Path;
use tasnif::category::Category;

/// A small realistic taxonomy: bakeries/cookies hierarchy, a category
/// with negative keywords, and an unrelated control category.
pub fn sample_categories() -> Vec<Category> {
    let mut bakeries = Category {
        id: 55,
        name_ar: "مخابز".to_string(),
        name_en: "Bakeries".to_string(),
        code: "1071".to_string(),
        ..Default::default()
    };
    bakeries.search_key_words_ar = vec!["مخبز".to_string(), "افران".to_string()];
    bakeries.search_key_words_en = vec!["bakery".to_string()];

    let mut cookies = Category {
        id: 308,
        name_ar: "كوكيز".to_string(),
        name_en: "Cookies".to_string(),
        code: "1073".to_string(),
        parent_id: Some(55),
        ..Default::default()
    };
    cookies.search_key_words_ar = vec!["كوكيز".to_string(), "مخبز الكوكيز".to_string()];

    let mut cafes = Category {
        id: 2,
        name_ar: "مقاهي".to_string(),
        name_en: "Cafes".to_string(),
        code: "5630".to_string(),
        ..Default::default()
    };
    cafes.search_key_words_ar = vec!["قهوة".to_string(), "كافيه".to_string()];
    cafes.negative_key_words_ar = vec!["ادوات".to_string()];

    let mut pharmacies = Category {
        id: 70,
        name_ar: "صيدليات".to_string(),
        name_en: "Pharmacies".to_string(),
        code: "4772".to_string(),
        ..Default::default()
    };
    pharmacies.search_key_words_ar = vec!["صيدلية".to_string()];

    vec![bakeries, cookies, cafes, pharmacies]
}

/// Write the sample taxonomy into `dir/categories.json`
pub fn seed_data_dir(dir: &Path) {
    let json = serde_json::to_string_pretty(&sample_categories()).expect("Failed to serialize");
    std::fs::write(dir.join("categories.json"), json).expect("Failed to seed data dir");
}
