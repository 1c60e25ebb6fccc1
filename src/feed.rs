use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::leaderboard::RawEntry;
use crate::mock_feed;
use crate::state::{Delta, ProviderCommand};

const LIVE_GOLF_BASE_URL: &str = "https://livegolfapi.com/api/v1/tournaments";
const ESPN_LEADERBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/golf/pga/leaderboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    LiveGolf,
    Espn,
    Mock,
}

impl FeedSource {
    pub fn from_env() -> Self {
        match env::var("LEADERBOARD_SOURCE")
            .unwrap_or_else(|_| "espn".to_string())
            .to_lowercase()
            .as_str()
        {
            "livegolf" => FeedSource::LiveGolf,
            "mock" => FeedSource::Mock,
            _ => FeedSource::Espn,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedSource::LiveGolf => "livegolf",
            FeedSource::Espn => "espn",
            FeedSource::Mock => "mock",
        }
    }
}

pub fn fetch_leaderboard(source: FeedSource, ttl: Duration) -> Result<Vec<RawEntry>> {
    match source {
        FeedSource::LiveGolf => fetch_live_golf(ttl),
        FeedSource::Espn => fetch_espn(ttl),
        FeedSource::Mock => Ok(mock_feed::sample_field()),
    }
}

fn fetch_live_golf(ttl: Duration) -> Result<Vec<RawEntry>> {
    let tournament_id =
        env::var("LIVEGOLF_TOURNAMENT_ID").context("LIVEGOLF_TOURNAMENT_ID is not set")?;
    let client = http_client()?;
    let url = format!("{LIVE_GOLF_BASE_URL}/{tournament_id}/leaderboard");
    let body = fetch_json_cached(client, &url, &[("accept", "application/json")], ttl)
        .context("request failed")?;
    parse_live_golf_leaderboard_json(&body)
}

fn fetch_espn(ttl: Duration) -> Result<Vec<RawEntry>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, ESPN_LEADERBOARD_URL, &[], ttl).context("request failed")?;
    parse_espn_leaderboard_json(&body)
}

/// Live Golf API shape: `{"players": [{"name": ..., "position": ...}]}`.
/// Position values arrive as either strings ("T2", "CUT") or bare numbers.
pub fn parse_live_golf_leaderboard_json(raw: &str) -> Result<Vec<RawEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid leaderboard json")?;
    let players = root
        .get("players")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut entries = Vec::new();
    for player in &players {
        let Some(name) = string_at(player, &["name"]) else {
            continue;
        };
        let position = string_at(player, &["position"]).unwrap_or_default();
        entries.push(RawEntry::new(name, position));
    }
    Ok(entries)
}

/// ESPN site API shape: the first event's first competition carries the
/// competitor list; names live under `athlete.displayName` and positions
/// under `status.position.displayValue` ("1", "T2", "CUT").
pub fn parse_espn_leaderboard_json(raw: &str) -> Result<Vec<RawEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid leaderboard json")?;
    let competitors = root
        .get("events")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("competitions"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("competitors"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut entries = Vec::new();
    for competitor in &competitors {
        let Some(name) = string_at(competitor, &["athlete", "displayName"])
            .or_else(|| string_at(competitor, &["athlete", "fullName"]))
        else {
            continue;
        };
        let position = string_at(competitor, &["status", "position", "displayValue"])
            .or_else(|| string_at(competitor, &["status", "displayValue"]))
            .unwrap_or_default();
        entries.push(RawEntry::new(name, position));
    }
    Ok(entries)
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Background provider: initial fetch, periodic refresh on the poll
/// interval, and on-demand refreshes (which bypass the body cache TTL).
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let source = FeedSource::from_env();
        let poll_interval = Duration::from_secs(
            env::var("LEADERBOARD_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(300)
                .max(30),
        );
        let mut last_fetch = Instant::now() - poll_interval;

        loop {
            let mut force = false;
            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshField => force = true,
                }
            }

            if force || last_fetch.elapsed() >= poll_interval {
                let ttl = if force { Duration::ZERO } else { poll_interval };
                match fetch_leaderboard(source, ttl) {
                    Ok(entries) => {
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] Field refreshed from {} ({} entries)",
                            source.label(),
                            entries.len()
                        )));
                        let _ = tx.send(Delta::Field(entries));
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Field fetch error: {err}")));
                    }
                }
                last_fetch = Instant::now();
            }

            thread::sleep(Duration::from_millis(500));
        }
    });
}
