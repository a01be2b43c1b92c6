//! Two-team comparative analysis with rule-based narrative insights.
//!
//! Three subset-selection policies (recent home form vs recent away form,
//! full records, shared head-to-head meetings) feed one aggregation routine
//! and one insight evaluator.

use crate::dataset::MatchRecord;
use crate::league_patterns::pct;

const GOALS_LINE: f64 = 2.5;
const BTS_EMIT_MIN: f64 = 50.0;
const BTS_HIGH_MIN: f64 = 65.0;
const FAVORITE_GAP: f64 = 20.0;
const FAVORITE_HIGH_GAP: f64 = 30.0;
const SOLID_DEFENSE_MIN: f64 = 30.0;
const SOLID_DEFENSE_HIGH: f64 = 40.0;

const H2H_OVER_25_PATTERN_MIN: f64 = 70.0;
const H2H_BTS_PATTERN_MIN: f64 = 70.0;
const H2H_HOME_WIN_SHARE_MIN: f64 = 70.0;
const H2H_DRAW_PATTERN_MIN: f64 = 40.0;

/// Which match subsets feed the two sides of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupMode {
    /// Team A's recent home matches against team B's recent away matches,
    /// each capped at `last_n` most recent by input order.
    HomeAwaySplit { last_n: usize },
    /// Both teams' full records, any venue.
    Overall,
    /// The meetings between the two teams, either venue order.
    HeadToHead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

/// One generated finding. Insights are emitted in fixed rule order (goal
/// volume, both-score, favorite-or-balanced, defensive solidity), never
/// re-sorted by confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub confidence: Confidence,
}

/// Aggregate record for one team over one match subset. Every rate is 0.0
/// when its denominator is zero.
///
/// Wins here come from the goal comparison within each match, not from the
/// stored result code; the leaderboard makes the opposite choice.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamAggregate {
    pub team: String,
    pub games: usize,
    pub home_games: usize,
    pub away_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub home_win_rate: f64,
    pub away_win_rate: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub avg_home_goals_for: f64,
    pub avg_home_goals_against: f64,
    pub avg_away_goals_for: f64,
    pub avg_away_goals_against: f64,
    pub clean_sheet_rate: f64,
    pub failed_to_score_rate: f64,
    pub over_25_rate: f64,
    pub both_score_rate: f64,
}

/// The venue lens a side is analysed through, which picks the figures the
/// insight rules compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideContext {
    Home,
    Away,
    Overall,
}

impl SideContext {
    /// Phrase dropped into insight descriptions after the team name.
    pub fn label(self) -> &'static str {
        match self {
            SideContext::Home => "at home",
            SideContext::Away => "away",
            SideContext::Overall => "overall",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideReport {
    pub aggregate: TeamAggregate,
    pub context: SideContext,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparativeReport {
    pub side_a: SideReport,
    pub side_b: SideReport,
    pub insights: Vec<Insight>,
}

/// Shared-meetings summary plus plain-text recurring patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadToHeadReport {
    pub team_a: String,
    pub team_b: String,
    pub total: usize,
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,
    pub a_home_wins: usize,
    pub b_home_wins: usize,
    pub a_win_pct: f64,
    pub b_win_pct: f64,
    pub draw_pct: f64,
    pub avg_goals: f64,
    pub over_25_pct: f64,
    pub both_score_pct: f64,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchupReport {
    Comparative(ComparativeReport),
    HeadToHead(HeadToHeadReport),
}

/// Run the comparison for the selected mode. `None` means insufficient data:
/// an empty subset on either side, or no shared meetings. Callers show an
/// empty state, never zeroed statistics.
pub fn analyze_matchup(
    team_a: &str,
    team_b: &str,
    matches: &[MatchRecord],
    mode: MatchupMode,
) -> Option<MatchupReport> {
    match mode {
        MatchupMode::HomeAwaySplit { .. } => {
            let (subset_a, subset_b) = select_subsets(team_a, team_b, matches, mode);
            comparative(team_a, team_b, &subset_a, &subset_b, SideContext::Home, SideContext::Away)
        }
        MatchupMode::Overall => {
            let (subset_a, subset_b) = select_subsets(team_a, team_b, matches, mode);
            comparative(
                team_a,
                team_b,
                &subset_a,
                &subset_b,
                SideContext::Overall,
                SideContext::Overall,
            )
        }
        MatchupMode::HeadToHead => {
            let (shared, _) = select_subsets(team_a, team_b, matches, mode);
            head_to_head(team_a, team_b, &shared).map(MatchupReport::HeadToHead)
        }
    }
}

/// The single subset-selection strategy behind all three modes. For
/// head-to-head the two subsets are the same shared set.
pub fn select_subsets<'a>(
    team_a: &str,
    team_b: &str,
    matches: &'a [MatchRecord],
    mode: MatchupMode,
) -> (Vec<&'a MatchRecord>, Vec<&'a MatchRecord>) {
    match mode {
        MatchupMode::HomeAwaySplit { last_n } => {
            // Input order is most-recent-first, so a prefix is the lookback
            // window.
            let a = matches
                .iter()
                .filter(|m| m.home_team == team_a)
                .take(last_n)
                .collect();
            let b = matches
                .iter()
                .filter(|m| m.away_team == team_b)
                .take(last_n)
                .collect();
            (a, b)
        }
        MatchupMode::Overall => {
            let a = matches.iter().filter(|m| m.involves(team_a)).collect();
            let b = matches.iter().filter(|m| m.involves(team_b)).collect();
            (a, b)
        }
        MatchupMode::HeadToHead => {
            let shared: Vec<&MatchRecord> = matches
                .iter()
                .filter(|m| {
                    (m.home_team == team_a && m.away_team == team_b)
                        || (m.home_team == team_b && m.away_team == team_a)
                })
                .collect();
            (shared.clone(), shared)
        }
    }
}

fn comparative(
    team_a: &str,
    team_b: &str,
    subset_a: &[&MatchRecord],
    subset_b: &[&MatchRecord],
    context_a: SideContext,
    context_b: SideContext,
) -> Option<MatchupReport> {
    if subset_a.is_empty() || subset_b.is_empty() {
        return None;
    }
    let side_a = SideReport {
        aggregate: aggregate_for_team(team_a, subset_a),
        context: context_a,
    };
    let side_b = SideReport {
        aggregate: aggregate_for_team(team_b, subset_b),
        context: context_b,
    };
    let insights = generate_insights(&side_a, &side_b);
    Some(MatchupReport::Comparative(ComparativeReport {
        side_a,
        side_b,
        insights,
    }))
}

/// Aggregate one team's record over a subset of its matches. The subset may
/// mix venues (overall mode) or be single-venue (split mode); venue-specific
/// figures fall back to 0.0 where the team never played that venue.
pub fn aggregate_for_team(team: &str, subset: &[&MatchRecord]) -> TeamAggregate {
    let mut wins = 0usize;
    let mut draws = 0usize;
    let mut losses = 0usize;
    let mut home_wins = 0usize;
    let mut away_wins = 0usize;
    let mut home_games = 0usize;
    let mut away_games = 0usize;
    let mut goals_for = 0u64;
    let mut goals_against = 0u64;
    let mut home_gf = 0u64;
    let mut home_ga = 0u64;
    let mut away_gf = 0u64;
    let mut away_ga = 0u64;
    let mut clean_sheets = 0usize;
    let mut failed_to_score = 0usize;
    let mut over_25 = 0usize;
    let mut both_score = 0usize;

    for m in subset {
        let is_home = m.home_team == team;
        let gf = if is_home { m.fthg } else { m.ftag };
        let ga = if is_home { m.ftag } else { m.fthg };

        goals_for += u64::from(gf);
        goals_against += u64::from(ga);
        if is_home {
            home_games += 1;
            home_gf += u64::from(gf);
            home_ga += u64::from(ga);
        } else {
            away_games += 1;
            away_gf += u64::from(gf);
            away_ga += u64::from(ga);
        }

        if gf > ga {
            wins += 1;
            if is_home {
                home_wins += 1;
            } else {
                away_wins += 1;
            }
        } else if gf == ga {
            draws += 1;
        } else {
            losses += 1;
        }

        if ga == 0 {
            clean_sheets += 1;
        }
        if gf == 0 {
            failed_to_score += 1;
        }
        if gf + ga > 2 {
            over_25 += 1;
        }
        if gf > 0 && ga > 0 {
            both_score += 1;
        }
    }

    let games = subset.len();
    TeamAggregate {
        team: team.to_string(),
        games,
        home_games,
        away_games,
        wins,
        draws,
        losses,
        win_rate: pct(wins, games),
        home_win_rate: pct(home_wins, home_games),
        away_win_rate: pct(away_wins, away_games),
        avg_goals_for: avg(goals_for, games),
        avg_goals_against: avg(goals_against, games),
        avg_home_goals_for: avg(home_gf, home_games),
        avg_home_goals_against: avg(home_ga, home_games),
        avg_away_goals_for: avg(away_gf, away_games),
        avg_away_goals_against: avg(away_ga, away_games),
        clean_sheet_rate: pct(clean_sheets, games),
        failed_to_score_rate: pct(failed_to_score, games),
        over_25_rate: pct(over_25, games),
        both_score_rate: pct(both_score, games),
    }
}

fn avg(total: u64, games: usize) -> f64 {
    if games == 0 {
        return 0.0;
    }
    total as f64 / games as f64
}

/// The figures a side contributes to the insight rules, after the venue lens
/// is applied.
struct SideView<'a> {
    team: &'a str,
    location: &'static str,
    win_rate: f64,
    avg_goals_for: f64,
    avg_goals_against: f64,
    clean_sheet_rate: f64,
    failed_to_score_rate: f64,
    both_score_rate: f64,
}

impl<'a> SideView<'a> {
    fn new(side: &'a SideReport) -> Self {
        let agg = &side.aggregate;
        let (win_rate, avg_goals_for, avg_goals_against) = match side.context {
            SideContext::Home => (agg.home_win_rate, agg.avg_home_goals_for, agg.avg_home_goals_against),
            SideContext::Away => (agg.away_win_rate, agg.avg_away_goals_for, agg.avg_away_goals_against),
            SideContext::Overall => (agg.win_rate, agg.avg_goals_for, agg.avg_goals_against),
        };
        Self {
            team: &agg.team,
            location: side.context.label(),
            win_rate,
            avg_goals_for,
            avg_goals_against,
            clean_sheet_rate: agg.clean_sheet_rate,
            failed_to_score_rate: agg.failed_to_score_rate,
            both_score_rate: agg.both_score_rate,
        }
    }
}

/// Apply the four prediction rules, in order, to the two sides.
pub fn generate_insights(side_a: &SideReport, side_b: &SideReport) -> Vec<Insight> {
    let a = SideView::new(side_a);
    let b = SideView::new(side_b);
    let mut out = Vec::new();

    // Attack-vs-defense goal expectation across both directions of play.
    let predicted_goals = (a.avg_goals_for + b.avg_goals_against) / 2.0
        + (b.avg_goals_for + a.avg_goals_against) / 2.0;
    if predicted_goals > GOALS_LINE {
        out.push(Insight {
            title: "\u{1f525} High-Scoring Game Expected".to_string(),
            description: format!(
                "Predicted total: {:.2} goals. {} scores {:.2} {} and {} scores {:.2} {}.",
                predicted_goals,
                a.team,
                a.avg_goals_for,
                a.location,
                b.team,
                b.avg_goals_for,
                b.location,
            ),
            confidence: Confidence::High,
        });
    }

    let both_score_avg = (a.both_score_rate + b.both_score_rate) / 2.0;
    if both_score_avg > BTS_EMIT_MIN {
        out.push(Insight {
            title: "\u{26bd} Both Teams Should Score".to_string(),
            description: format!(
                "{} finds the net in {:.0}% of games {} and {} in {:.0}% {}.",
                a.team,
                100.0 - a.failed_to_score_rate,
                a.location,
                b.team,
                100.0 - b.failed_to_score_rate,
                b.location,
            ),
            confidence: if both_score_avg > BTS_HIGH_MIN {
                Confidence::High
            } else {
                Confidence::Medium
            },
        });
    }

    let gap = (a.win_rate - b.win_rate).abs();
    if gap > FAVORITE_GAP {
        let (favorite, other) = if a.win_rate > b.win_rate { (&a, &b) } else { (&b, &a) };
        out.push(Insight {
            title: format!("\u{1f3c6} {} Is the Favorite", favorite.team),
            description: format!(
                "{} {} wins {:.0}% of games against {:.0}% for the opposition.",
                favorite.team, favorite.location, favorite.win_rate, other.win_rate,
            ),
            confidence: if gap > FAVORITE_HIGH_GAP {
                Confidence::High
            } else {
                Confidence::Medium
            },
        });
    } else {
        out.push(Insight {
            title: "\u{2696} Evenly Matched".to_string(),
            description: format!(
                "{} {} ({:.0}% wins) vs {} {} ({:.0}% wins).",
                a.team, a.location, a.win_rate, b.team, b.location, b.win_rate,
            ),
            confidence: Confidence::Medium,
        });
    }

    if a.clean_sheet_rate > SOLID_DEFENSE_MIN || b.clean_sheet_rate > SOLID_DEFENSE_MIN {
        let solid = if a.clean_sheet_rate > b.clean_sheet_rate { &a } else { &b };
        out.push(Insight {
            title: format!("\u{1f6e1} {} Keeps It Tight at the Back", solid.team),
            description: format!(
                "{} {} has kept a clean sheet in {:.0}% of the games analysed.",
                solid.team, solid.location, solid.clean_sheet_rate,
            ),
            confidence: if solid.clean_sheet_rate > SOLID_DEFENSE_HIGH {
                Confidence::High
            } else {
                Confidence::Medium
            },
        });
    }

    out
}

/// Summarise the shared meetings. Win attribution trusts the stored result
/// code, matching the leaderboard convention.
fn head_to_head(team_a: &str, team_b: &str, shared: &[&MatchRecord]) -> Option<HeadToHeadReport> {
    if shared.is_empty() {
        return None;
    }
    let total = shared.len();

    let mut a_wins = 0usize;
    let mut b_wins = 0usize;
    let mut draws = 0usize;
    let mut a_home_wins = 0usize;
    let mut b_home_wins = 0usize;
    let mut total_goals = 0u64;
    let mut over_25 = 0usize;
    let mut both_score = 0usize;

    for m in shared {
        let a_is_home = m.home_team == team_a;
        match m.ftr.as_str() {
            "H" => {
                if a_is_home {
                    a_wins += 1;
                    a_home_wins += 1;
                } else {
                    b_wins += 1;
                    b_home_wins += 1;
                }
            }
            "A" => {
                if a_is_home {
                    b_wins += 1;
                } else {
                    a_wins += 1;
                }
            }
            _ => draws += 1,
        }
        total_goals += u64::from(m.total_goals());
        if m.is_over_25() {
            over_25 += 1;
        }
        if m.both_scored() {
            both_score += 1;
        }
    }

    let over_25_pct = pct(over_25, total);
    let both_score_pct = pct(both_score, total);
    let draw_pct = pct(draws, total);

    let mut patterns = Vec::new();
    if over_25_pct >= H2H_OVER_25_PATTERN_MIN {
        patterns.push(format!(
            "Goals flow in this fixture: {over_25_pct:.0}% of meetings went over 2.5."
        ));
    }
    if both_score_pct >= H2H_BTS_PATTERN_MIN {
        patterns.push(format!(
            "Both sides usually score: {both_score_pct:.0}% of meetings saw goals at each end."
        ));
    }
    for (team, wins, home_wins) in [(team_a, a_wins, a_home_wins), (team_b, b_wins, b_home_wins)] {
        if wins > 0 && pct(home_wins, wins) >= H2H_HOME_WIN_SHARE_MIN {
            patterns.push(format!(
                "{team} takes this fixture mostly at home ({home_wins} of {wins} wins)."
            ));
        }
    }
    if draw_pct >= H2H_DRAW_PATTERN_MIN {
        patterns.push(format!(
            "Stalemates are common: {draw_pct:.0}% of meetings ended level."
        ));
    }

    Some(HeadToHeadReport {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        total,
        a_wins,
        b_wins,
        draws,
        a_home_wins,
        b_home_wins,
        a_win_pct: pct(a_wins, total),
        b_win_pct: pct(b_wins, total),
        draw_pct,
        avg_goals: avg(total_goals, total),
        over_25_pct,
        both_score_pct,
        patterns,
    })
}
