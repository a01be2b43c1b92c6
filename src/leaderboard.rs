//! Per-team aggregate table, ranked 3-points-for-a-win.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::dataset::MatchRecord;

const LEADERBOARD_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub name: String,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRow {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn points(&self) -> usize {
        self.wins * 3 + self.draws
    }

    pub fn played(&self) -> usize {
        self.wins + self.draws + self.losses
    }
}

/// Accumulate every team's record and return the top eight by
/// `wins*3 + draws`. The sort is stable, so tied teams keep the order in
/// which they first appeared in the input.
pub fn build_leaderboard(matches: &[MatchRecord]) -> Vec<TeamRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<TeamRow> = Vec::new();

    let mut row_for = |rows: &mut Vec<TeamRow>, name: &str| -> usize {
        if let Some(idx) = index.get(name) {
            return *idx;
        }
        let idx = rows.len();
        rows.push(TeamRow::new(name));
        index.insert(name.to_string(), idx);
        idx
    };

    for m in matches {
        let home = row_for(&mut rows, &m.home_team);
        {
            let row = &mut rows[home];
            row.goals_for += m.fthg;
            row.goals_against += m.ftag;
            match m.ftr.as_str() {
                "H" => row.wins += 1,
                "D" => row.draws += 1,
                _ => row.losses += 1,
            }
        }

        let away = row_for(&mut rows, &m.away_team);
        {
            let row = &mut rows[away];
            row.goals_for += m.ftag;
            row.goals_against += m.fthg;
            match m.ftr.as_str() {
                "A" => row.wins += 1,
                "D" => row.draws += 1,
                _ => row.losses += 1,
            }
        }
    }

    rows.sort_by_key(|row| Reverse(row.points()));
    rows.truncate(LEADERBOARD_SIZE);
    rows
}
