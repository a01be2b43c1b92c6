//! Whole-dataset aggregate statistics.

use crate::dataset::MatchRecord;

/// League-wide counts and rates over one match collection. Recomputed on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueStats {
    pub total_matches: usize,
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
    pub avg_goals: f64,
    pub home_win_pct: f64,
    pub draw_pct: f64,
    pub away_win_pct: f64,
    pub over_25_pct: f64,
    pub both_score_pct: f64,
}

/// Aggregate an arbitrary match subset. `None` when the slice is empty;
/// callers render that as a no-data state, not as zero percentages.
///
/// Win/draw/away counts trust the stored result code; goal-based rates use
/// the raw goal counts.
pub fn analyze_league(matches: &[MatchRecord]) -> Option<LeagueStats> {
    if matches.is_empty() {
        return None;
    }
    let total = matches.len();

    let mut home_wins = 0usize;
    let mut draws = 0usize;
    let mut away_wins = 0usize;
    let mut total_goals = 0u64;
    let mut over_25 = 0usize;
    let mut both_score = 0usize;

    for m in matches {
        match m.ftr.as_str() {
            "H" => home_wins += 1,
            "D" => draws += 1,
            "A" => away_wins += 1,
            _ => {}
        }
        total_goals += u64::from(m.total_goals());
        if m.is_over_25() {
            over_25 += 1;
        }
        if m.both_scored() {
            both_score += 1;
        }
    }

    Some(LeagueStats {
        total_matches: total,
        home_wins,
        draws,
        away_wins,
        avg_goals: total_goals as f64 / total as f64,
        home_win_pct: pct(home_wins, total),
        draw_pct: pct(draws, total),
        away_win_pct: pct(away_wins, total),
        over_25_pct: pct(over_25, total),
        both_score_pct: pct(both_score, total),
    })
}

pub(crate) fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(home: &str, away: &str, fthg: u32, ftag: u32, ftr: &str) -> MatchRecord {
        MatchRecord {
            div: "E0".to_string(),
            date: "16/08/2025".to_string(),
            time: "15:00".to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            fthg,
            ftag,
            ftr: ftr.to_string(),
            hthg: 0,
            htag: 0,
            htr: String::new(),
        }
    }

    #[test]
    fn empty_input_is_no_data() {
        assert!(analyze_league(&[]).is_none());
    }

    #[test]
    fn counts_and_rates() {
        let matches = vec![
            m("A", "B", 3, 1, "H"),
            m("B", "C", 0, 0, "D"),
            m("C", "A", 1, 2, "A"),
            m("A", "C", 2, 2, "D"),
        ];
        let stats = analyze_league(&matches).unwrap();
        assert_eq!(stats.total_matches, 4);
        assert_eq!(stats.home_wins, 1);
        assert_eq!(stats.draws, 2);
        assert_eq!(stats.away_wins, 1);
        // 4 + 0 + 3 + 4 goals over 4 matches.
        assert!((stats.avg_goals - 2.75).abs() < 1e-9);
        // Over 2.5 is strict: the 3-goal and two 4-goal matches qualify.
        assert!((stats.over_25_pct - 75.0).abs() < 1e-9);
        // Both-score needs strictly positive goals on each side.
        assert!((stats.both_score_pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn pct_guards_zero_total() {
        assert_eq!(pct(3, 0), 0.0);
    }
}
