//! Arabic Text Normalization
//!
//! Canonicalizes store names and keywords before any comparison. Writers
//! use hamza variants, taa marbuta and diacritics interchangeably, so the
//! folding here keeps otherwise-identical words from fragmenting.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Arabic-script character directly followed by a Latin letter
    static ref ARABIC_LATIN: Regex =
        Regex::new(r"(\p{Arabic})([A-Za-z])").expect("valid boundary regex");
    /// Latin letter directly followed by an Arabic-script character
    static ref LATIN_ARABIC: Regex =
        Regex::new(r"([A-Za-z])(\p{Arabic})").expect("valid boundary regex");
}

/// Arabic function words dropped during tokenization.
///
/// Compared verbatim against already-normalized tokens; the single-character
/// entries are subsumed by the length filter.
const STOP_WORDS: &[&str] = &[
    "و", "في", "من", "إلى", "على", "عن", "أو", "ل", "لل", "ال", "با", "ب",
];

/// Canonicalize a raw string for comparison
///
/// Splits adjoined Arabic/Latin runs, strips tashkeel, folds letter
/// variants (hamza alefs, taa marbuta, alef maksura), turns digits,
/// hyphens, underscores and other non-letters into spaces, lowercases,
/// and collapses whitespace. Idempotent.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Adjoined words like "Shoppingزهور" split into separate tokens
    let split = ARABIC_LATIN.replace_all(text, "${1} ${2}");
    let split = LATIN_ARABIC.replace_all(&split, "${1} ${2}");

    let mut folded = String::with_capacity(split.len());
    for c in split.chars() {
        match c {
            // tashkeel and harakat carry no lexical distinction
            '\u{064B}'..='\u{065F}' => {}
            'أ' | 'إ' | 'آ' => folded.push('ا'),
            'ة' => folded.push('ه'),
            'ى' => folded.push('ي'),
            '0'..='9' | '٠'..='٩' => folded.push(' '),
            '_' | '-' => folded.push(' '),
            c if c.is_alphabetic() || c.is_whitespace() => folded.push(c),
            _ => folded.push(' '),
        }
    }

    folded
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a string into normalized tokens
///
/// Tokens of length ≤ 1 and stop words are dropped. Duplicates and order
/// are preserved; downstream scoring treats token collections as sets.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| c.is_whitespace() || c == ',' || c == '،')
        .filter(|word| word.chars().count() > 1 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}
