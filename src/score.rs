use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::Leaderboard;
use crate::normalize::{self, NameKey};
use crate::pool_params::{PoolParams, RankPolicy};

/// One raw row from the pick sheet: identity plus the ordered pick cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRow {
    pub id: String,
    pub picks: Vec<String>,
}

/// A malformed batch is fatal and produces no partial output. Per-pick data
/// problems (unmatched names, unparsable positions) never surface here; they
/// are recovered with the configured sentinels and flagged in the output.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("pick table row {row} has a blank participant identity")]
    BlankIdentity { row: usize },
}

/// The outcome for one non-empty pick slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickMatch {
    pub raw: String,
    pub display_name: String,
    /// Matched competitor's rank; `None` when the pick matched nothing.
    pub rank: Option<u32>,
    pub applied_score: u32,
    pub matched: bool,
    /// Matched only via the substring fallback; kept visible for review.
    pub via_fallback: bool,
    /// The cell carried the "player not listed" marker.
    pub explicitly_unlisted: bool,
    /// Included in the total under the active best-N policy.
    pub counted: bool,
}

impl PickMatch {
    /// Display contract consumed by the TUI and the exports.
    pub fn display(&self) -> String {
        format!("{} ({})", self.display_name, self.applied_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub id: String,
    pub picks: Vec<PickMatch>,
    /// Picks that yielded a usable key (shown as "picks considered").
    pub considered: usize,
    pub total: u32,
    pub rank: u32,
}

impl ParticipantResult {
    pub fn unmatched(&self) -> impl Iterator<Item = &PickMatch> {
        self.picks.iter().filter(|p| !p.matched)
    }
}

/// Score the whole pool against a resolved leaderboard.
///
/// Duplicate identities collapse to their first row. Per-participant matching
/// runs on the rayon pool; the final sort and placement assignment is a
/// single serial pass (ascending total, lower is better).
pub fn score_pool(
    rows: &[PickRow],
    leaderboard: &Leaderboard,
    params: &PoolParams,
) -> Result<Vec<ParticipantResult>, ScoreError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique: Vec<&PickRow> = Vec::new();
    for (row, pick_row) in rows.iter().enumerate() {
        let id = pick_row.id.trim();
        if id.is_empty() {
            return Err(ScoreError::BlankIdentity { row });
        }
        if seen.insert(id) {
            unique.push(pick_row);
        }
    }

    let mut results: Vec<ParticipantResult> = unique
        .par_iter()
        .map(|row| score_participant(row, leaderboard, params))
        .collect();

    results.sort_by_key(|r| r.total);
    assign_placements(&mut results, params.rank_policy);
    Ok(results)
}

fn score_participant(
    row: &PickRow,
    leaderboard: &Leaderboard,
    params: &PoolParams,
) -> ParticipantResult {
    let mut picks: Vec<PickMatch> = Vec::new();
    let mut considered = 0usize;
    for raw in &row.picks {
        if raw.trim().is_empty() {
            continue;
        }
        let (pick, had_key) = match_pick(raw, leaderboard, params);
        if had_key {
            considered += 1;
        }
        picks.push(pick);
    }

    // Best-N keeps the N lowest scores; equal scores keep pick order.
    let keep = params.best_n.unwrap_or(picks.len()).min(picks.len());
    let mut by_score: Vec<usize> = (0..picks.len()).collect();
    by_score.sort_by_key(|&idx| picks[idx].applied_score);
    for &idx in by_score.iter().take(keep) {
        picks[idx].counted = true;
    }

    let total = picks
        .iter()
        .filter(|p| p.counted)
        .map(|p| p.applied_score)
        .sum();

    ParticipantResult {
        id: row.id.trim().to_string(),
        picks,
        considered,
        total,
        rank: 0,
    }
}

fn match_pick(raw: &str, leaderboard: &Leaderboard, params: &PoolParams) -> (PickMatch, bool) {
    let display_name = normalize::display_text(raw);
    let (key, explicitly_unlisted) = match normalize::normalize(raw) {
        Some(NameKey::Key(key)) => (Some(key), false),
        Some(NameKey::Unlisted(key)) => (key, true),
        None => (None, false),
    };

    let mut pick = PickMatch {
        raw: raw.to_string(),
        display_name,
        rank: None,
        applied_score: params.default_score,
        matched: false,
        via_fallback: false,
        explicitly_unlisted,
        counted: false,
    };

    let Some(key) = key else {
        return (pick, false);
    };

    if let Some(competitor) = leaderboard.get(&key) {
        pick.rank = Some(competitor.rank);
        pick.applied_score = competitor.rank;
        pick.matched = true;
    } else if let Some(competitor) = leaderboard.fallback_match(&key) {
        pick.rank = Some(competitor.rank);
        pick.applied_score = competitor.rank;
        pick.matched = true;
        pick.via_fallback = true;
    }

    (pick, true)
}

fn assign_placements(results: &mut [ParticipantResult], policy: RankPolicy) {
    match policy {
        RankPolicy::StableSort => {
            for (idx, result) in results.iter_mut().enumerate() {
                result.rank = (idx + 1) as u32;
            }
        }
        RankPolicy::Competition => {
            let mut prev_total = None;
            let mut prev_rank = 0u32;
            for (idx, result) in results.iter_mut().enumerate() {
                if prev_total != Some(result.total) {
                    prev_rank = (idx + 1) as u32;
                    prev_total = Some(result.total);
                }
                result.rank = prev_rank;
            }
        }
    }
}
