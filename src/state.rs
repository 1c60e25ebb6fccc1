use std::collections::VecDeque;
use std::time::SystemTime;

use crate::leaderboard::{self, Leaderboard, RawEntry};
use crate::pool_params::PoolParams;
use crate::score::{self, ParticipantResult, PickRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Standings,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Pool placement order (the scorer's output order).
    Placement,
    /// Alphabetical by participant identity.
    Name,
}

#[derive(Debug, Clone)]
pub enum Delta {
    Field(Vec<RawEntry>),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshField,
}

pub struct AppState {
    pub screen: Screen,
    pub sort: SortMode,
    pub params: PoolParams,
    pub pick_rows: Vec<PickRow>,
    pub field: Vec<RawEntry>,
    pub leaderboard: Leaderboard,
    pub results: Vec<ParticipantResult>,
    pub score_error: Option<String>,
    pub selected: usize,
    pub field_scroll: usize,
    pub logs: VecDeque<String>,
    pub last_refresh: Option<SystemTime>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(params: PoolParams, pick_rows: Vec<PickRow>) -> Self {
        Self {
            screen: Screen::Standings,
            sort: SortMode::Placement,
            params,
            pick_rows,
            field: Vec::new(),
            leaderboard: Leaderboard::default(),
            results: Vec::new(),
            score_error: None,
            selected: 0,
            field_scroll: 0,
            logs: VecDeque::new(),
            last_refresh: None,
            help_overlay: false,
        }
    }

    /// Results in the current display order. Placement order is the scorer's
    /// own output order; Name re-sorts a view, never the underlying results.
    pub fn sorted_results(&self) -> Vec<&ParticipantResult> {
        let mut rows: Vec<&ParticipantResult> = self.results.iter().collect();
        if self.sort == SortMode::Name {
            rows.sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
        }
        rows
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            SortMode::Placement => SortMode::Name,
            SortMode::Name => SortMode::Placement,
        };
        self.selected = 0;
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Standings => Screen::Field,
            Screen::Field => Screen::Standings,
        };
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Whole-batch recompute: resolve the field, rescore every participant.
    /// Nothing is patched incrementally.
    pub fn recompute(&mut self) {
        self.leaderboard = leaderboard::resolve(&self.field, &self.params);
        match score::score_pool(&self.pick_rows, &self.leaderboard, &self.params) {
            Ok(results) => {
                self.results = results;
                self.score_error = None;
            }
            Err(err) => {
                self.results = Vec::new();
                self.score_error = Some(err.to_string());
            }
        }
        if !self.results.is_empty() {
            self.selected = self.selected.min(self.results.len() - 1);
        } else {
            self.selected = 0;
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Field(entries) => {
            state.field = entries;
            state.last_refresh = Some(SystemTime::now());
            state.recompute();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
