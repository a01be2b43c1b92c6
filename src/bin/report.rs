//! One-shot text report over a CSV source: league patterns, top-8 table and
//! an optional matchup comparison, printed to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;

use matchday_terminal::dataset::parse_matches;
use matchday_terminal::fetch;
use matchday_terminal::leaderboard::build_leaderboard;
use matchday_terminal::league_patterns::analyze_league;
use matchday_terminal::matchup::{
    analyze_matchup, ComparativeReport, HeadToHeadReport, MatchupMode, MatchupReport, SideContext,
    SideReport,
};
use matchday_terminal::state::DEFAULT_LAST_N;

const DEFAULT_CSV_URL: &str = "https://www.football-data.co.uk/mmz4281/2526/E0.csv";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (source_label, raw) = load_source()?;
    let matches = parse_matches(&raw);

    println!("Matchday report - generated {}", Utc::now().to_rfc3339());
    println!("Source: {source_label}");
    println!();

    let Some(stats) = analyze_league(&matches) else {
        println!("The source was fetched but no matches could be parsed from it.");
        return Ok(());
    };

    println!("== League patterns ==");
    println!("Matches: {}", stats.total_matches);
    println!(
        "Results: {} home / {} draw / {} away ({:.1}% / {:.1}% / {:.1}%)",
        stats.home_wins,
        stats.draws,
        stats.away_wins,
        stats.home_win_pct,
        stats.draw_pct,
        stats.away_win_pct
    );
    println!("Avg goals: {:.2} per match", stats.avg_goals);
    println!("Over 2.5: {:.1}%", stats.over_25_pct);
    println!("Both teams scored: {:.1}%", stats.both_score_pct);
    println!();

    println!("== Top 8 ==");
    for (idx, row) in build_leaderboard(&matches).iter().enumerate() {
        println!(
            "{:>2}. {:<24} {:>2}W {:>2}D {:>2}L  {:>3}:{:<3} ({} pts)",
            idx + 1,
            row.name,
            row.wins,
            row.draws,
            row.losses,
            row.goals_for,
            row.goals_against,
            row.points()
        );
    }

    if let Some((team_a, team_b)) = matchup_args() {
        println!();
        print_matchup(&team_a, &team_b, &matches)?;
    }

    Ok(())
}

fn load_source() -> Result<(String, String)> {
    if let Some(path) = flag_value("--csv") {
        let path = PathBuf::from(path);
        let raw = fetch::read_csv_file(&path)?;
        return Ok((path.display().to_string(), raw));
    }
    let url = flag_value("--url")
        .or_else(|| std::env::var("MATCH_CSV_URL").ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_CSV_URL.to_string());
    let raw = fetch::fetch_csv_text(&url)?;
    Ok((url, raw))
}

fn matchup_args() -> Option<(String, String)> {
    let team_a = flag_value("--team-a")?;
    let team_b = flag_value("--team-b")?;
    Some((team_a, team_b))
}

fn print_matchup(team_a: &str, team_b: &str, matches: &[matchday_terminal::dataset::MatchRecord]) -> Result<()> {
    let mode = parse_mode()?;
    let mode_label = match mode {
        MatchupMode::HomeAwaySplit { last_n } => format!("home/away split, last {last_n}"),
        MatchupMode::Overall => "overall".to_string(),
        MatchupMode::HeadToHead => "head-to-head".to_string(),
    };
    println!("== Matchup: {team_a} vs {team_b} ({mode_label}) ==");

    match analyze_matchup(team_a, team_b, matches, mode) {
        None => println!("Not enough data for this comparison."),
        Some(MatchupReport::Comparative(report)) => print_comparative(&report),
        Some(MatchupReport::HeadToHead(report)) => print_head_to_head(&report),
    }
    Ok(())
}

fn print_comparative(report: &ComparativeReport) {
    for insight in &report.insights {
        println!("{} [{}]", insight.title, insight.confidence.label());
        println!("  {}", insight.description);
    }
    println!();
    print_side(&report.side_a);
    print_side(&report.side_b);
}

fn print_side(side: &SideReport) {
    let agg = &side.aggregate;
    let win_rate = match side.context {
        SideContext::Home => agg.home_win_rate,
        SideContext::Away => agg.away_win_rate,
        SideContext::Overall => agg.win_rate,
    };
    println!(
        "{} ({}): {}W {}D {}L over {} games, {:.0}% wins, CS {:.0}%, O2.5 {:.0}%, BTS {:.0}%",
        agg.team,
        side.context.label(),
        agg.wins,
        agg.draws,
        agg.losses,
        agg.games,
        win_rate,
        agg.clean_sheet_rate,
        agg.over_25_rate,
        agg.both_score_rate
    );
}

fn print_head_to_head(report: &HeadToHeadReport) {
    println!(
        "{} meetings: {} {} wins ({:.0}%), {} {} wins ({:.0}%), {} draws ({:.0}%)",
        report.total,
        report.team_a,
        report.a_wins,
        report.a_win_pct,
        report.team_b,
        report.b_wins,
        report.b_win_pct,
        report.draws,
        report.draw_pct
    );
    println!(
        "Avg goals {:.2}, over 2.5 {:.0}%, both scored {:.0}%",
        report.avg_goals, report.over_25_pct, report.both_score_pct
    );
    for pattern in &report.patterns {
        println!("- {pattern}");
    }
    if report.patterns.is_empty() {
        println!("No recurring patterns in this fixture.");
    }
}

fn parse_mode() -> Result<MatchupMode> {
    let last_n = flag_value("--last-n")
        .map(|raw| raw.parse::<usize>().context("--last-n must be a number"))
        .transpose()?
        .unwrap_or(DEFAULT_LAST_N);
    match flag_value("--mode").as_deref() {
        None | Some("split") => Ok(MatchupMode::HomeAwaySplit { last_n }),
        Some("overall") => Ok(MatchupMode::Overall),
        Some("h2h") | Some("head-to-head") => Ok(MatchupMode::HeadToHead),
        Some(other) => Err(anyhow!("unknown mode {other} (split|overall|h2h)")),
    }
}

fn flag_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
