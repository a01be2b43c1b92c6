use matchday_terminal::dataset::MatchRecord;
use matchday_terminal::matchup::MatchupMode;
use matchday_terminal::state::{
    apply_load_event, team_names, AppState, LoadEvent, LoadStatus, ModeSelection, PickSlot,
};

fn m(home: &str, away: &str) -> MatchRecord {
    MatchRecord {
        div: "E0".to_string(),
        date: "01/08/2025".to_string(),
        time: "15:00".to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        fthg: 1,
        ftag: 0,
        ftr: "H".to_string(),
        hthg: 0,
        htag: 0,
        htr: String::new(),
    }
}

#[test]
fn load_taxonomy_keeps_states_distinct() {
    let mut state = AppState::new();
    assert_eq!(state.load, LoadStatus::Loading);

    apply_load_event(
        &mut state,
        LoadEvent::Failed {
            source: "http://example/e0.csv".to_string(),
            error: "http 404".to_string(),
        },
    );
    assert_eq!(state.load, LoadStatus::Failed("http 404".to_string()));

    // Transport succeeded but nothing parsed: a different state from failure
    // and from ready.
    apply_load_event(
        &mut state,
        LoadEvent::Loaded {
            source: "http://example/e0.csv".to_string(),
            matches: Vec::new(),
        },
    );
    assert_eq!(state.load, LoadStatus::EmptyParse);
    assert!(state.matches.is_empty());

    apply_load_event(
        &mut state,
        LoadEvent::Loaded {
            source: "http://example/e0.csv".to_string(),
            matches: vec![m("B", "A")],
        },
    );
    assert_eq!(state.load, LoadStatus::Ready);
    assert_eq!(state.matches.len(), 1);
}

#[test]
fn loaded_event_rebuilds_team_list_and_clears_selection() {
    let mut state = AppState::new();
    state.team_a = Some("Old".to_string());
    state.cursor = 5;
    apply_load_event(
        &mut state,
        LoadEvent::Loaded {
            source: "file.csv".to_string(),
            matches: vec![m("Zeta", "Alpha"), m("Alpha", "Mu")],
        },
    );
    assert_eq!(state.teams, ["Alpha", "Mu", "Zeta"]);
    assert_eq!(state.cursor, 0);
    assert_eq!(state.team_a, None);
    assert_eq!(state.pick, PickSlot::TeamA);
}

#[test]
fn team_names_are_sorted_and_unique() {
    let names = team_names(&[m("B", "A"), m("A", "C"), m("C", "B")]);
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn assign_team_fills_slots_and_rejects_duplicates() {
    let mut state = AppState::new();
    state.teams = vec!["A".to_string(), "B".to_string()];

    state.assign_team();
    assert_eq!(state.team_a.as_deref(), Some("A"));
    assert_eq!(state.pick, PickSlot::TeamB);

    // Same cursor again: refused, slot unchanged.
    state.assign_team();
    assert_eq!(state.team_b, None);
    assert_eq!(state.pick, PickSlot::TeamB);

    state.select_next();
    state.assign_team();
    assert_eq!(state.team_b.as_deref(), Some("B"));
    assert_eq!(state.pick, PickSlot::TeamA);
}

#[test]
fn selection_wraps_both_directions() {
    let mut state = AppState::new();
    state.teams = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    state.select_prev();
    assert_eq!(state.cursor, 2);
    state.select_next();
    assert_eq!(state.cursor, 0);
}

#[test]
fn mode_cycles_and_maps_to_analyzer_modes() {
    let mut state = AppState::new();
    assert_eq!(state.mode, ModeSelection::Split);
    assert_eq!(
        state.matchup_mode(),
        MatchupMode::HomeAwaySplit { last_n: state.last_n }
    );

    state.cycle_mode();
    assert_eq!(state.matchup_mode(), MatchupMode::Overall);
    state.cycle_mode();
    assert_eq!(state.matchup_mode(), MatchupMode::HeadToHead);
    state.cycle_mode();
    assert_eq!(state.mode, ModeSelection::Split);
}

#[test]
fn lookback_window_clamps() {
    let mut state = AppState::new();
    state.bump_last_n(-100);
    assert_eq!(state.last_n, 1);
    state.bump_last_n(1000);
    assert_eq!(state.last_n, 38);
}

#[test]
fn recent_matches_caps_at_collection_head() {
    let mut state = AppState::new();
    state.matches = vec![m("A", "B"), m("C", "D")];
    assert_eq!(state.recent_matches(10).len(), 2);
    assert_eq!(state.recent_matches(1).len(), 1);
    assert_eq!(state.recent_matches(1)[0].home_team, "A");
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..500 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().unwrap(), "[INFO] line 499");
}
