use std::env;

use serde::{Deserialize, Serialize};

/// Rank assignment for competitors that report the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// Tied competitors share the reported position as their rank.
    Shared,
    /// Every competitor gets a distinct dense rank; ties are ordered
    /// alphabetically by surname.
    DenseSequential,
}

/// Placement assignment for the final pool standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankPolicy {
    /// 1-based sort position; equal totals keep their input order.
    StableSort,
    /// Equal totals share a placement, the next distinct total skips ahead.
    Competition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolParams {
    /// Score substituted for a pick that matches nothing in the field.
    pub default_score: u32,
    /// Rank substituted for a non-numeric reported position (CUT, WD, DQ).
    pub missed_cut_rank: u32,
    /// Sum only the N best pick scores; `None` sums all of them.
    pub best_n: Option<usize>,
    pub tie_policy: TiePolicy,
    pub rank_policy: RankPolicy,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            default_score: 100,
            missed_cut_rank: 100,
            best_n: None,
            tie_policy: TiePolicy::Shared,
            rank_policy: RankPolicy::Competition,
        }
    }
}

impl PoolParams {
    /// Defaults with `POOL_*` environment overrides applied. Resolved once at
    /// startup; the scoring core itself never reads the environment.
    pub fn from_env() -> Self {
        let mut params = Self::default();
        if let Some(val) = parse_env::<u32>("POOL_DEFAULT_SCORE") {
            params.default_score = val;
        }
        if let Some(val) = parse_env::<u32>("POOL_MISSED_CUT_RANK") {
            params.missed_cut_rank = val;
        }
        if let Ok(raw) = env::var("POOL_BEST_N") {
            let raw = raw.trim().to_lowercase();
            if raw == "all" {
                params.best_n = None;
            } else if let Ok(n) = raw.parse::<usize>() {
                params.best_n = Some(n.max(1));
            }
        }
        if let Ok(raw) = env::var("POOL_TIE_POLICY") {
            match raw.trim().to_lowercase().as_str() {
                "shared" => params.tie_policy = TiePolicy::Shared,
                "dense-sequential" => params.tie_policy = TiePolicy::DenseSequential,
                _ => {}
            }
        }
        if let Ok(raw) = env::var("POOL_RANK_POLICY") {
            match raw.trim().to_lowercase().as_str() {
                "stable-sort" => params.rank_policy = RankPolicy::StableSort,
                "competition" => params.rank_policy = RankPolicy::Competition,
                _ => {}
            }
        }
        params
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|val| val.trim().parse().ok())
}
