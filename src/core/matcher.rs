//! Category Matching
//!
//! Multi-signal scoring of a free-text store name against the category
//! taxonomy: full-name similarity, keyword similarity, per-token keyword
//! hits, and negative-keyword penalties, aggregated into a confidence.

use crate::category::{Category, CategoryMatch};
use crate::core::normalizer::{normalize, tokenize};
use std::collections::HashSet;
use tracing::debug;

/// Minimum similarity for the name and whole-keyword signals
const SIGNAL_THRESHOLD: f64 = 0.3;
/// Minimum similarity for the per-token keyword signal
const TOKEN_THRESHOLD: f64 = 0.5;
/// Score for a single token fully contained in a multi-word target
const PARTIAL_SCORE: f64 = 0.6;
/// Flat bonus when the query equals a keyword exactly
const EXACT_KEYWORD_BONUS: f64 = 3.0;
const NEGATIVE_PENALTY: f64 = 0.6;
const CONFIDENCE_FLOOR: f64 = 0.1;
/// At most this many matched keywords are reported as evidence
const MAX_EVIDENCE: usize = 3;

/// Similarity between two strings in [0, 1]
///
/// Rules are tried in priority order and the first hit wins: exact
/// normalized equality (1.0), single-token containment (0.6, only with
/// `allow_partial`), then Jaccard over the token sets.
pub fn similarity(a: &str, b: &str, allow_partial: bool) -> f64 {
    let n1 = normalize(a);
    let n2 = normalize(b);

    if !n1.is_empty() && n1 == n2 {
        return 1.0;
    }

    let t1: Vec<&str> = n1.split_whitespace().collect();
    let t2: Vec<&str> = n2.split_whitespace().collect();

    // Whole-token containment only; arbitrary substrings produce false
    // positives on short words
    if allow_partial
        && ((t1.len() == 1 && t2.contains(&t1[0])) || (t2.len() == 1 && t1.contains(&t2[0])))
    {
        return PARTIAL_SCORE;
    }

    let s1: HashSet<&str> = t1.iter().copied().collect();
    let s2: HashSet<&str> = t2.iter().copied().collect();
    let union = s1.union(&s2).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = s1.intersection(&s2).count();
    intersection as f64 / union as f64
}

/// Match a store name against the collection, ranked by confidence
///
/// Blank queries return no matches. Only Arabic search keywords are
/// scored; the English lists are stored but do not contribute. Ties keep
/// the original collection order.
pub fn match_categories<'a>(
    query: &str,
    categories: &'a [Category],
    max_results: usize,
) -> Vec<CategoryMatch<'a>> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query_norm = normalize(query);
    let query_tokens = tokenize(query);
    let query_token_set: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();

    let mut matches: Vec<CategoryMatch<'a>> = Vec::new();

    for category in categories {
        let allow_partial = !category.disallow_partial;

        let mut total_score = 0.0_f64;
        let mut match_count = 0_u32;
        let mut matched_keywords: Vec<String> = Vec::new();

        // The primary name is the single strongest signal
        let name_score = similarity(query, &category.name_ar, allow_partial);
        if name_score > SIGNAL_THRESHOLD {
            total_score += name_score * 3.0;
            match_count += 1;
            push_evidence(&mut matched_keywords, &category.name_ar);
        }

        for keyword in &category.search_key_words_ar {
            if query_norm == normalize(keyword) {
                // Exact keyword equality always dominates
                total_score += EXACT_KEYWORD_BONUS;
                match_count += 1;
                push_evidence(&mut matched_keywords, keyword);
            } else {
                let keyword_score = similarity(query, keyword, allow_partial);
                if keyword_score > SIGNAL_THRESHOLD {
                    total_score += keyword_score * 2.0;
                    match_count += 1;
                    push_evidence(&mut matched_keywords, keyword);
                }
            }

            // A single word of a multi-word query can still hit a keyword
            // even when the full query does not
            for token in &query_tokens {
                let token_score = similarity(token, keyword, allow_partial);
                if token_score > TOKEN_THRESHOLD {
                    total_score += token_score;
                    match_count += 1;
                    push_evidence(&mut matched_keywords, keyword);
                }
            }
        }

        // Penalties leave match_count untouched so they are not diluted
        // by the confidence denominator; they may push the total below zero
        for negative in category
            .negative_key_words_ar
            .iter()
            .chain(category.negative_key_words_en.iter())
        {
            let token = normalize(negative);
            if !token.is_empty() && query_token_set.contains(token.as_str()) {
                total_score -= NEGATIVE_PENALTY;
            }
        }

        if match_count > 0 && total_score > 0.0 {
            // The +1 damps lone weak signals away from full confidence
            let confidence = (total_score / f64::from(match_count + 1)).min(1.0);
            if confidence > CONFIDENCE_FLOOR {
                let parent_category = category
                    .parent_id
                    .and_then(|pid| categories.iter().find(|c| c.id == pid));
                matches.push(CategoryMatch {
                    category,
                    parent_category,
                    confidence,
                    matched_keywords,
                });
            }
        }
    }

    // Stable sort, so equal confidences keep collection order
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(max_results);

    debug!("{} match(es) for '{}'", matches.len(), query);
    matches
}

/// Highest-confidence match, if any
pub fn find_best_category<'a>(
    query: &str,
    categories: &'a [Category],
) -> Option<CategoryMatch<'a>> {
    match_categories(query, categories, 1).into_iter().next()
}

/// Unscored substring filter for list browsing
///
/// Keeps every category whose normalized name or any normalized Arabic
/// keyword contains the normalized query. A blank query keeps everything.
pub fn filter_categories<'a>(search_text: &str, categories: &'a [Category]) -> Vec<&'a Category> {
    if search_text.trim().is_empty() {
        return categories.iter().collect();
    }

    let needle = normalize(search_text);

    categories
        .iter()
        .filter(|category| {
            normalize(&category.name_ar).contains(&needle)
                || category
                    .search_key_words_ar
                    .iter()
                    .any(|kw| normalize(kw).contains(&needle))
        })
        .collect()
}

/// Bounded append-if-absent: the first three distinct hits are kept
fn push_evidence(evidence: &mut Vec<String>, keyword: &str) {
    if evidence.len() < MAX_EVIDENCE && !evidence.iter().any(|k| k == keyword) {
        evidence.push(keyword.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u32, name_ar: &str, keywords: &[&str]) -> Category {
        Category {
            id,
            name_ar: name_ar.to_string(),
            search_key_words_ar: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_similarity_exact() {
        assert_eq!(similarity("مخبز", "مخبز", true), 1.0);
        assert_eq!(similarity("مَخْبَز", "مخبز", false), 1.0);
    }

    #[test]
    fn test_similarity_containment() {
        assert_eq!(similarity("مخبز", "مخبز الكوكيز", true), 0.6);
        assert_eq!(similarity("مخبز الكوكيز", "مخبز", true), 0.6);
        // With partials disabled the same pair falls through to Jaccard
        assert_eq!(similarity("مخبز", "مخبز الكوكيز", false), 0.5);
    }

    #[test]
    fn test_similarity_jaccard() {
        // intersection 1, union 3
        let score = similarity("مخبز حلويات", "مخبز افراح", false);
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_blank_strings() {
        assert_eq!(similarity("", "", true), 0.0);
        assert_eq!(similarity("", "مخبز", true), 0.0);
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let categories = vec![category(1, "مخابز", &["مخبز"])];
        assert!(match_categories("", &categories, 5).is_empty());
        assert!(match_categories("   ", &categories, 5).is_empty());
    }

    #[test]
    fn test_exact_keyword_beats_partial_containment() {
        let categories = vec![
            category(55, "مخابز", &["مخبز"]),
            category(308, "كوكيز", &["مخبز الكوكيز"]),
        ];

        let matches = match_categories("مخبز", &categories, 5);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].category.id, 55);
        assert_eq!(matches[1].category.id, 308);
        assert!(matches[0].confidence > matches[1].confidence);
    }

    #[test]
    fn test_exact_name_outranks_keyword_partial() {
        let categories = vec![
            category(2, "حلويات", &["مخبز الكوكيز"]),
            category(1, "مخبز", &[]),
        ];

        let matches = match_categories("مخبز", &categories, 5);
        assert_eq!(matches[0].category.id, 1);
    }

    #[test]
    fn test_negative_keyword_lowers_ranking() {
        let plain = vec![category(1, "مطاعم", &["مطعم"])];
        let mut penalized = plain.clone();
        penalized[0].negative_key_words_ar = vec!["سريع".to_string()];

        let query = "مطعم سريع";
        let base = match_categories(query, &plain, 1)[0].confidence;
        let hit = match_categories(query, &penalized, 1)[0].confidence;
        assert!(hit < base, "penalty did not lower confidence: {hit} vs {base}");
    }

    #[test]
    fn test_negative_keyword_can_exclude_entirely() {
        let query = "كيك ادوات تجهيزات";

        let clean = vec![category(1, "حلويات", &["كيك اعراس"])];
        assert!(!match_categories(query, &clean, 5).is_empty());

        // One weak token signal, two penalties: the total goes non-positive
        let mut penalized = clean.clone();
        penalized[0].negative_key_words_ar = vec!["ادوات".to_string(), "تجهيزات".to_string()];
        assert!(match_categories(query, &penalized, 5).is_empty());
    }

    #[test]
    fn test_disallow_partial_falls_back_to_jaccard() {
        let mut categories = vec![category(9, "مخبز الكوكيز", &[])];

        let open = match_categories("مخبز", &categories, 1)[0].confidence;
        assert!((open - 0.9).abs() < 1e-9); // 0.6 × 3 / 2

        categories[0].disallow_partial = true;
        let strict = match_categories("مخبز", &categories, 1)[0].confidence;
        assert!((strict - 0.75).abs() < 1e-9); // 0.5 × 3 / 2
        assert!(strict < open);
    }

    #[test]
    fn test_evidence_capped_at_three_in_found_order() {
        let categories = vec![category(3, "قهوة", &["قهوة", "بن", "محمصة", "كوفي"])];

        let matches = match_categories("قهوة بن محمصة كوفي", &categories, 1);
        let evidence = &matches[0].matched_keywords;
        assert_eq!(evidence.len(), 3);
        assert_eq!(evidence[0], "قهوة");
        assert!(!evidence.contains(&"كوفي".to_string()));
    }

    #[test]
    fn test_parent_resolved_from_collection() {
        let mut categories = vec![category(55, "مخابز", &[]), category(308, "كوكيز", &["كوكيز"])];
        categories[1].parent_id = Some(55);

        let matches = match_categories("كوكيز", &categories, 1);
        let parent = matches[0].parent_category.expect("parent not resolved");
        assert_eq!(parent.id, 55);
    }

    #[test]
    fn test_unresolved_parent_is_none() {
        let mut categories = vec![category(308, "كوكيز", &["كوكيز"])];
        categories[0].parent_id = Some(999);

        let matches = match_categories("كوكيز", &categories, 1);
        assert!(matches[0].parent_category.is_none());
    }

    #[test]
    fn test_find_best_category_none_when_nothing_qualifies() {
        let categories = vec![category(1, "مخابز", &["مخبز"])];
        assert!(find_best_category("zzz", &categories).is_none());
    }

    #[test]
    fn test_max_results_respected() {
        let categories = vec![
            category(1, "مخبز", &["مخبز"]),
            category(2, "مخابز", &["مخبز"]),
            category(3, "افران", &["مخبز"]),
        ];
        assert_eq!(match_categories("مخبز", &categories, 2).len(), 2);
    }

    #[test]
    fn test_filter_categories_substring() {
        let categories = vec![
            category(55, "مخابز", &["مخبز"]),
            category(308, "كوكيز", &["مخبز الكوكيز"]),
            category(70, "صيدليات", &["صيدلية"]),
        ];

        let hits = filter_categories("كوك", &categories);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 308);

        // Keyword containment counts too
        let hits = filter_categories("مخبز", &categories);
        assert_eq!(hits.len(), 2);

        // Blank filter keeps everything
        assert_eq!(filter_categories("  ", &categories).len(), 3);
    }

    #[test]
    fn test_duplicate_keywords_do_not_duplicate_evidence() {
        let categories = vec![category(4, "ورد", &["زهور", "زهور"])];

        let matches = match_categories("زهور", &categories, 1);
        assert_eq!(matches[0].matched_keywords, vec!["زهور".to_string()]);
    }
}
