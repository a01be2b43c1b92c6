use std::fs;
use std::path::PathBuf;

use matchday_terminal::dataset::parse_matches;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_sample_fixture() {
    let raw = read_fixture("sample_matches.csv");
    let matches = parse_matches(&raw);
    assert_eq!(matches.len(), 12);

    let first = &matches[0];
    assert_eq!(first.div, "E0");
    assert_eq!(first.date, "23/08/2025");
    assert_eq!(first.time, "17:30");
    assert_eq!(first.home_team, "Arsenal");
    assert_eq!(first.away_team, "Chelsea");
    assert_eq!(first.fthg, 3);
    assert_eq!(first.ftag, 1);
    assert_eq!(first.ftr, "H");
    assert_eq!(first.hthg, 1);
    assert_eq!(first.htag, 0);
    assert_eq!(first.htr, "H");
}

#[test]
fn never_yields_empty_team_names() {
    let raw = read_fixture("sample_matches.csv");
    for m in parse_matches(&raw) {
        assert!(!m.home_team.is_empty());
        assert!(!m.away_team.is_empty());
    }
}

#[test]
fn drops_row_with_missing_team() {
    let matches = parse_matches("HomeTeam,AwayTeam,FTHG,FTAG,FTR\n,Team2,1,0,H");
    assert!(matches.is_empty());
}

#[test]
fn too_short_input_is_empty() {
    assert!(parse_matches("").is_empty());
    assert!(parse_matches("HomeTeam,AwayTeam,FTHG,FTAG,FTR").is_empty());
    assert!(parse_matches("\n  \n\t\n").is_empty());
}

#[test]
fn blank_lines_are_skipped() {
    let raw = "HomeTeam,AwayTeam,FTHG,FTAG,FTR\n\nAlpha,Beta,1,0,H\n   \nGamma,Delta,0,0,D\n";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].home_team, "Alpha");
    assert_eq!(matches[1].away_team, "Delta");
}

#[test]
fn short_row_defaults_missing_trailing_fields() {
    let raw = "Div,Date,Time,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,HTR\nE0,01/08/2025,15:00,Alpha,Beta";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.fthg, 0);
    assert_eq!(m.ftag, 0);
    assert_eq!(m.hthg, 0);
    assert_eq!(m.htag, 0);
    // A blank result code is filled from the goal comparison.
    assert_eq!(m.ftr, "D");
    assert_eq!(m.htr, "");
}

#[test]
fn unparsable_goals_coerce_to_zero() {
    let raw = "HomeTeam,AwayTeam,FTHG,FTAG,FTR\nAlpha,Beta,abc,2.9,H";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].fthg, 0);
    // Leading digits are honoured, trailing junk is not.
    assert_eq!(matches[0].ftag, 2);
}

#[test]
fn crlf_and_padding_are_trimmed() {
    let raw = "HomeTeam, AwayTeam ,FTHG,FTAG,FTR\r\n Alpha , Beta ,1,0,H\r\n";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].home_team, "Alpha");
    assert_eq!(matches[0].away_team, "Beta");
    assert_eq!(matches[0].ftr, "H");
}

#[test]
fn stored_result_code_is_trusted_verbatim() {
    // Source says H even though the goals read as a draw; tallies trust the
    // source and the derived code stays available as the cross-check.
    let raw = "HomeTeam,AwayTeam,FTHG,FTAG,FTR\nAlpha,Beta,0,0,H";
    let matches = parse_matches(raw);
    assert_eq!(matches[0].ftr, "H");
    assert_eq!(matches[0].derived_result(), 'D');
}

#[test]
fn unknown_columns_pass_through_opaquely() {
    let raw = "HomeTeam,AwayTeam,FTHG,FTAG,FTR,Referee,Attendance\nAlpha,Beta,2,1,H,M Oliver,59923";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].fthg, 2);
}

#[test]
fn column_order_follows_header() {
    let raw = "FTAG,FTHG,AwayTeam,HomeTeam,FTR\n2,1,Beta,Alpha,A";
    let matches = parse_matches(raw);
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.home_team, "Alpha");
    assert_eq!(m.away_team, "Beta");
    assert_eq!(m.fthg, 1);
    assert_eq!(m.ftag, 2);
}
