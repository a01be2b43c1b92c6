//! Application state for the dashboard shell.
//!
//! The match collection is immutable once loaded and replaced wholesale on
//! reload; analyzers take it by reference and never read ambient state.

use std::collections::VecDeque;

use crate::dataset::MatchRecord;
use crate::matchup::MatchupMode;

pub const DEFAULT_LAST_N: usize = 10;
const MIN_LAST_N: usize = 1;
const MAX_LAST_N: usize = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Matchup,
}

/// Where a load attempt ended up. `Failed` is transport failure (the parser
/// was never reached); `EmptyParse` means the transport succeeded but the
/// text had no usable rows. The two must never be conflated, or the UI would
/// show misleading zero-percent statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    EmptyParse,
    Failed(String),
}

/// Which matchup slot the next Enter press fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSlot {
    TeamA,
    TeamB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    Split,
    Overall,
    HeadToHead,
}

impl ModeSelection {
    pub fn label(self) -> &'static str {
        match self {
            ModeSelection::Split => "home/away split",
            ModeSelection::Overall => "overall",
            ModeSelection::HeadToHead => "head-to-head",
        }
    }
}

/// One message from the loader thread.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    Loaded { source: String, matches: Vec<MatchRecord> },
    Failed { source: String, error: String },
}

pub struct AppState {
    pub matches: Vec<MatchRecord>,
    pub load: LoadStatus,
    pub source_label: String,
    pub screen: Screen,
    pub teams: Vec<String>,
    pub cursor: usize,
    pub pick: PickSlot,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub mode: ModeSelection,
    pub last_n: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            load: LoadStatus::Loading,
            source_label: String::new(),
            screen: Screen::Overview,
            teams: Vec::new(),
            cursor: 0,
            pick: PickSlot::TeamA,
            team_a: None,
            team_b: None,
            mode: ModeSelection::Split,
            last_n: DEFAULT_LAST_N,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % self.teams.len();
    }

    pub fn select_prev(&mut self) {
        if self.teams.is_empty() {
            self.cursor = 0;
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.teams.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    /// Assign the team under the cursor to the active slot and advance the
    /// slot. Assigning a team already held by the other slot is refused (a
    /// matchup needs two distinct teams).
    pub fn assign_team(&mut self) {
        let Some(name) = self.teams.get(self.cursor).cloned() else {
            return;
        };
        match self.pick {
            PickSlot::TeamA => {
                if self.team_b.as_deref() == Some(name.as_str()) {
                    self.push_log("[WARN] Pick two different teams");
                    return;
                }
                self.team_a = Some(name);
                self.pick = PickSlot::TeamB;
            }
            PickSlot::TeamB => {
                if self.team_a.as_deref() == Some(name.as_str()) {
                    self.push_log("[WARN] Pick two different teams");
                    return;
                }
                self.team_b = Some(name);
                self.pick = PickSlot::TeamA;
            }
        }
    }

    pub fn cycle_mode(&mut self) {
        self.mode = match self.mode {
            ModeSelection::Split => ModeSelection::Overall,
            ModeSelection::Overall => ModeSelection::HeadToHead,
            ModeSelection::HeadToHead => ModeSelection::Split,
        };
    }

    pub fn bump_last_n(&mut self, delta: isize) {
        let next = self.last_n.saturating_add_signed(delta);
        self.last_n = next.clamp(MIN_LAST_N, MAX_LAST_N);
    }

    /// The analyzer-facing mode for the current selection.
    pub fn matchup_mode(&self) -> MatchupMode {
        match self.mode {
            ModeSelection::Split => MatchupMode::HomeAwaySplit { last_n: self.last_n },
            ModeSelection::Overall => MatchupMode::Overall,
            ModeSelection::HeadToHead => MatchupMode::HeadToHead,
        }
    }

    /// Input order is most-recent-first, so the head of the collection is
    /// the recent-matches table.
    pub fn recent_matches(&self, count: usize) -> &[MatchRecord] {
        &self.matches[..self.matches.len().min(count)]
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted, de-duplicated names of every team appearing in the collection.
pub fn team_names(matches: &[MatchRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in matches {
        names.push(m.home_team.clone());
        names.push(m.away_team.clone());
    }
    names.sort();
    names.dedup();
    names
}

/// Fold a loader message into the state, keeping the transport / structural
/// failure taxonomy visible: a failed fetch, a fetch that parsed to nothing
/// and real data each land in a distinct status.
pub fn apply_load_event(state: &mut AppState, event: LoadEvent) {
    match event {
        LoadEvent::Loaded { source, matches } => {
            state.source_label = source;
            if matches.is_empty() {
                state.matches = Vec::new();
                state.teams = Vec::new();
                state.load = LoadStatus::EmptyParse;
                state.push_log("[WARN] Source fetched but no matches parsed");
            } else {
                state.push_log(format!("[INFO] {} matches loaded", matches.len()));
                state.teams = team_names(&matches);
                state.matches = matches;
                state.load = LoadStatus::Ready;
            }
            state.cursor = 0;
            state.team_a = None;
            state.team_b = None;
            state.pick = PickSlot::TeamA;
        }
        LoadEvent::Failed { source, error } => {
            state.source_label = source;
            state.load = LoadStatus::Failed(error.clone());
            state.push_log(format!("[WARN] Load failed: {error}"));
        }
    }
}
