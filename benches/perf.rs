use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use matchday_terminal::dataset::parse_matches;
use matchday_terminal::leaderboard::build_leaderboard;
use matchday_terminal::league_patterns::analyze_league;
use matchday_terminal::matchup::{analyze_matchup, MatchupMode};

const TEAMS: &[&str] = &[
    "Arsenal", "Aston Villa", "Bournemouth", "Brentford", "Brighton", "Chelsea",
    "Crystal Palace", "Everton", "Fulham", "Leeds", "Liverpool", "Man City",
    "Man United", "Newcastle", "Nottm Forest", "Spurs", "West Ham", "Wolves",
    "Burnley", "Sunderland",
];

/// Deterministic multi-season CSV in the source format: every ordered team
/// pair meets once per season.
fn synth_csv(seasons: usize) -> String {
    let mut out = String::from("Div,Date,Time,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,HTR\n");
    let mut tick = 0usize;
    for season in 0..seasons {
        for (hi, home) in TEAMS.iter().enumerate() {
            for (ai, away) in TEAMS.iter().enumerate() {
                if hi == ai {
                    continue;
                }
                tick += 1;
                let fthg = (tick * 7 + hi) % 5;
                let ftag = (tick * 3 + ai) % 4;
                let ftr = if fthg > ftag {
                    "H"
                } else if fthg == ftag {
                    "D"
                } else {
                    "A"
                };
                let hthg = fthg.min(1);
                let htag = ftag.min(1);
                let htr = if hthg > htag {
                    "H"
                } else if hthg == htag {
                    "D"
                } else {
                    "A"
                };
                writeln!(
                    out,
                    "E0,{:02}/{:02}/20{:02},15:00,{home},{away},{fthg},{ftag},{ftr},{hthg},{htag},{htr}",
                    (tick % 28) + 1,
                    (tick % 12) + 1,
                    20 + season,
                )
                .expect("write to string");
            }
        }
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let raw = synth_csv(3);
    c.bench_function("parse_matches", |b| {
        b.iter(|| {
            let matches = parse_matches(black_box(&raw));
            black_box(matches.len());
        })
    });
}

fn bench_league_analysis(c: &mut Criterion) {
    let matches = parse_matches(&synth_csv(3));
    c.bench_function("analyze_league", |b| {
        b.iter(|| {
            let stats = analyze_league(black_box(&matches)).unwrap();
            black_box(stats.total_matches);
        })
    });
}

fn bench_leaderboard(c: &mut Criterion) {
    let matches = parse_matches(&synth_csv(3));
    c.bench_function("build_leaderboard", |b| {
        b.iter(|| {
            let rows = build_leaderboard(black_box(&matches));
            black_box(rows.len());
        })
    });
}

fn bench_matchup_split(c: &mut Criterion) {
    let matches = parse_matches(&synth_csv(3));
    c.bench_function("matchup_split", |b| {
        b.iter(|| {
            let report = analyze_matchup(
                black_box("Arsenal"),
                black_box("Chelsea"),
                &matches,
                MatchupMode::HomeAwaySplit { last_n: 10 },
            );
            black_box(report.is_some());
        })
    });
}

fn bench_matchup_head_to_head(c: &mut Criterion) {
    let matches = parse_matches(&synth_csv(3));
    c.bench_function("matchup_head_to_head", |b| {
        b.iter(|| {
            let report = analyze_matchup(
                black_box("Arsenal"),
                black_box("Chelsea"),
                &matches,
                MatchupMode::HeadToHead,
            );
            black_box(report.is_some());
        })
    });
}

criterion_group!(
    perf,
    bench_parse,
    bench_league_analysis,
    bench_leaderboard,
    bench_matchup_split,
    bench_matchup_head_to_head
);
criterion_main!(perf);
