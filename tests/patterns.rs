use std::fs;
use std::path::PathBuf;

use matchday_terminal::dataset::{parse_matches, MatchRecord};
use matchday_terminal::leaderboard::build_leaderboard;
use matchday_terminal::league_patterns::analyze_league;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_matches() -> Vec<MatchRecord> {
    parse_matches(&read_fixture("sample_matches.csv"))
}

fn m(home: &str, away: &str, fthg: u32, ftag: u32, ftr: &str) -> MatchRecord {
    MatchRecord {
        div: "E0".to_string(),
        date: "01/08/2025".to_string(),
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
fn league_stats_over_fixture() {
    let stats = analyze_league(&fixture_matches()).expect("fixture has matches");
    assert_eq!(stats.total_matches, 12);
    assert_eq!(stats.home_wins, 5);
    assert_eq!(stats.draws, 4);
    assert_eq!(stats.away_wins, 3);
    assert!((stats.avg_goals - 2.5).abs() < 1e-9);
    assert!((stats.over_25_pct - 50.0).abs() < 1e-9);
    assert!((stats.both_score_pct - 50.0).abs() < 1e-9);
}

#[test]
fn result_percentages_sum_to_one_hundred() {
    let stats = analyze_league(&fixture_matches()).expect("fixture has matches");
    // Sum after one-decimal display rounding, as the cards render them.
    let rounded: f64 = [stats.home_win_pct, stats.draw_pct, stats.away_win_pct]
        .iter()
        .map(|p| format!("{p:.1}").parse::<f64>().unwrap())
        .sum();
    assert!((rounded - 100.0).abs() <= 0.1, "sum was {rounded}");
}

#[test]
fn empty_league_is_no_data() {
    assert!(analyze_league(&[]).is_none());
}

#[test]
fn leaderboard_over_fixture() {
    let rows = build_leaderboard(&fixture_matches());
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    // Chelsea and Newcastle tie on 7 points; Chelsea appeared first.
    assert_eq!(
        names,
        ["Arsenal", "Chelsea", "Newcastle", "Liverpool", "Everton", "Spurs"]
    );

    let arsenal = &rows[0];
    assert_eq!((arsenal.wins, arsenal.draws, arsenal.losses), (3, 1, 0));
    assert_eq!(arsenal.goals_for, 8);
    assert_eq!(arsenal.goals_against, 3);
    assert_eq!(arsenal.points(), 10);
}

#[test]
fn tally_matches_appearances() {
    let matches = fixture_matches();
    for row in build_leaderboard(&matches) {
        let appearances = matches.iter().filter(|m| m.involves(&row.name)).count();
        assert_eq!(row.played(), appearances, "team {}", row.name);
    }
}

#[test]
fn leaderboard_sorted_and_truncated() {
    // Ten teams, one match each pair, descending strength.
    let mut matches = Vec::new();
    for i in 0..5u32 {
        let home = format!("Team{}", i * 2 + 1);
        let away = format!("Team{}", i * 2 + 2);
        // Home side wins every time; later pairs never win.
        let ftr = if i < 3 { "H" } else { "D" };
        matches.push(m(&home, &away, 2, 0, ftr));
    }
    let rows = build_leaderboard(&matches);
    assert_eq!(rows.len(), 8);
    for pair in rows.windows(2) {
        assert!(pair[0].points() >= pair[1].points());
    }
}

#[test]
fn single_draw_scenario() {
    let rows = build_leaderboard(&[m("A", "B", 1, 1, "D")]);
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!((row.wins, row.draws, row.losses), (0, 1, 0));
        assert_eq!(row.goals_for, 1);
        assert_eq!(row.goals_against, 1);
    }
}
