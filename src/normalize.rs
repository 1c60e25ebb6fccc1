use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use unidecode::unidecode;

// Pick cells sometimes embed a display rank, e.g. "12 - Ludvig Aberg".
static RANK_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*-\s*").expect("valid rank prefix regex"));

// Trailing annotations like "(a)" amateur markers or "(USA)" country codes.
static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*?\)").expect("valid paren regex"));

// Sheets mark a pick that was not in the field at entry time, e.g.
// "Player Not Listed - Joe Nobody" or "player not listed: Joe Nobody".
static NOT_LISTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)player\s+not\s+listed\s*[-:]?\s*").expect("valid marker regex"));

// Exact-match fixes for misspellings that keep showing up in pick sheets.
// Keys and values are both post-normalization (lowercase, ASCII).
static CORRECTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("scotty scheffler", "scottie scheffler"),
        ("rory mcelroy", "rory mcilroy"),
        ("ludwig aberg", "ludvig aberg"),
        ("cam smith", "cameron smith"),
        ("matt fitzpatrick", "matthew fitzpatrick"),
        ("joaquin nieman", "joaquin niemann"),
    ])
});

/// Outcome of normalizing one free-text name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameKey {
    /// Usable matching key.
    Key(String),
    /// The text carried an explicit "not listed" marker. The payload is the
    /// key for whatever followed the marker, if anything did.
    Unlisted(Option<String>),
}

impl NameKey {
    pub fn key(&self) -> Option<&str> {
        match self {
            NameKey::Key(key) => Some(key),
            NameKey::Unlisted(key) => key.as_deref(),
        }
    }
}

/// Canonicalize a raw name into a matching key.
///
/// The steps run in a fixed order: strip a leading "<rank> - " prefix, detect
/// the "player not listed" marker, strip parenthetical annotations, fold
/// diacritics to ASCII, lowercase, then apply the correction table. The key
/// is only ever used for equality lookups, never shown to the user.
pub fn normalize(raw: &str) -> Option<NameKey> {
    if raw.trim().is_empty() {
        return None;
    }

    let stripped = RANK_PREFIX_RE.replace(raw.trim(), "");

    if let Some(m) = NOT_LISTED_RE.find(&stripped) {
        let trailing = &stripped[m.end()..];
        return Some(NameKey::Unlisted(clean_key(trailing)));
    }

    clean_key(&stripped).map(NameKey::Key)
}

/// `normalize` flattened to just the key, for callers that do not care about
/// the unlisted marker (leaderboard names never carry it).
pub fn normalize_key(raw: &str) -> Option<String> {
    normalize(raw).and_then(|key| key.key().map(str::to_string))
}

/// The human-readable form of a pick cell: rank prefix stripped, case and
/// diacritics preserved. Used for display strings and exports.
pub fn display_text(raw: &str) -> String {
    RANK_PREFIX_RE.replace(raw.trim(), "").trim().to_string()
}

/// Last whitespace-separated token of a key. Used as the secondary sort key
/// when the resolver breaks ties alphabetically.
pub fn surname(key: &str) -> &str {
    key.rsplit(char::is_whitespace).next().unwrap_or(key)
}

fn clean_key(text: &str) -> Option<String> {
    let no_parens = PAREN_RE.replace_all(text, "");
    let folded = unidecode(&no_parens).to_lowercase();
    let trimmed = folded.trim();
    if trimmed.is_empty() {
        return None;
    }
    let corrected = CORRECTIONS.get(trimmed).copied().unwrap_or(trimmed);
    Some(corrected.to_string())
}
