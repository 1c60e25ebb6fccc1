use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_key, surname};
use crate::pool_params::{PoolParams, TiePolicy};

/// One row as reported by a leaderboard source, before any cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub position: String,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}

/// A competitor with its resolved tournament rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub display_name: String,
    pub key: String,
    /// Parsed reported position; `None` for CUT/WD/DQ or unparsable text.
    pub position: Option<u32>,
    pub rank: u32,
}

/// Resolved leaderboard: unique keys, ranks >= 1, competitors held in rank
/// order. Rebuilt wholly on every feed refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    competitors: Vec<Competitor>,
    by_key: HashMap<String, usize>,
}

impl Leaderboard {
    pub fn get(&self, key: &str) -> Option<&Competitor> {
        self.by_key.get(key).map(|idx| &self.competitors[*idx])
    }

    /// Substring-containment fallback for picks the exact lookup missed: a
    /// pick key matches a competitor key when either contains the other.
    ///
    /// Last-resort only. A bare surname can hit the wrong one of two players
    /// sharing it, so the first hit in rank order wins and callers flag every
    /// use of this path for review.
    pub fn fallback_match(&self, key: &str) -> Option<&Competitor> {
        if key.is_empty() {
            return None;
        }
        self.competitors
            .iter()
            .find(|c| c.key.contains(key) || key.contains(c.key.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter()
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

/// Parse a reported position: plain integer, or integer behind a tie marker
/// ("T5" -> 5). Anything else (CUT, WD, DQ, "-", junk) is `None` and scores
/// the missed-cut sentinel.
pub fn parse_position(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('T')
        .or_else(|| trimmed.strip_prefix('t'))
        .unwrap_or(trimmed);
    digits.parse::<u32>().ok()
}

/// Resolve raw feed entries into the canonical key -> competitor mapping.
///
/// Entries whose name normalizes to nothing are dropped. Duplicate keys keep
/// the last entry seen. Rank assignment depends on the tie policy: `Shared`
/// uses the reported position itself (tied competitors tie), while
/// `DenseSequential` orders by (position, surname) and assigns dense ranks.
pub fn resolve(entries: &[RawEntry], params: &PoolParams) -> Leaderboard {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, (String, Option<u32>)> = HashMap::new();
    for entry in entries {
        let Some(key) = normalize_key(&entry.name) else {
            continue;
        };
        let position = parse_position(&entry.position);
        if seen
            .insert(key.clone(), (entry.name.trim().to_string(), position))
            .is_none()
        {
            order.push(key);
        }
    }

    let mut rows: Vec<(String, String, Option<u32>)> = order
        .into_iter()
        .filter_map(|key| {
            seen.remove(&key)
                .map(|(display_name, position)| (key, display_name, position))
        })
        .collect();

    // Deterministic regardless of feed order: position first (missed cuts
    // last), then surname, then the full key.
    rows.sort_by(|a, b| {
        let pos_a = a.2.unwrap_or(params.missed_cut_rank).max(1);
        let pos_b = b.2.unwrap_or(params.missed_cut_rank).max(1);
        pos_a
            .cmp(&pos_b)
            .then_with(|| surname(&a.0).cmp(surname(&b.0)))
            .then_with(|| a.0.cmp(&b.0))
    });

    let competitors: Vec<Competitor> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, (key, display_name, position))| {
            let rank = match params.tie_policy {
                TiePolicy::Shared => position.unwrap_or(params.missed_cut_rank).max(1),
                TiePolicy::DenseSequential => (idx + 1) as u32,
            };
            Competitor {
                display_name,
                key,
                position,
                rank,
            }
        })
        .collect();

    let by_key = competitors
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.key.clone(), idx))
        .collect();

    Leaderboard {
        competitors,
        by_key,
    }
}
