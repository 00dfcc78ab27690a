//! Text normalizer: the single cleanup pass shared by skill matching, role
//! classification and semantic similarity.
//!
//! The classifier and the similarity scorer must observe the same cleaned text,
//! otherwise scores computed against the same vectorizer stop being comparable.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+\s*").unwrap());
static RE_HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\S+").unwrap());
static RE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\S+").unwrap());
static RE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"[!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~]"##).unwrap());
static RE_NON_ASCII: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Cleans raw text into a canonical lowercase, single-spaced string.
///
/// Steps, in order:
/// 1. URLs (`http…`) are dropped together with trailing whitespace
/// 2. `#hashtags` and `@mentions` are dropped
/// 3. ASCII punctuation becomes a space
/// 4. Non-ASCII characters become a space
/// 5. Whitespace runs collapse to one space; result is trimmed and lowercased
///
/// Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = RE_URL.replace_all(text, " ");
    let text = RE_HASHTAG.replace_all(&text, " ");
    let text = RE_MENTION.replace_all(&text, " ");
    let text = RE_PUNCTUATION.replace_all(&text, " ");
    let text = RE_NON_ASCII.replace_all(&text, " ");
    let text = RE_WHITESPACE.replace_all(&text, " ");

    text.trim().to_lowercase()
}

/// Splits normalized text into its tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

/// Title-cases a phrase: a cased character is uppercased when it follows an
/// uncased one and lowercased otherwise ("machine learning" → "Machine Learning",
/// "sql" → "Sql", "3d modeling" → "3D Modeling").
pub fn title_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut prev_cased = false;
    for c in phrase.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}
