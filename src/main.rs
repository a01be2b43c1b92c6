use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Row, Table};

use matchday_terminal::dataset::{parse_matches, MatchRecord};
use matchday_terminal::fetch;
use matchday_terminal::leaderboard::build_leaderboard;
use matchday_terminal::league_patterns::analyze_league;
use matchday_terminal::matchup::{
    analyze_matchup, ComparativeReport, Confidence, HeadToHeadReport, Insight, MatchupReport,
    SideContext, SideReport,
};
use matchday_terminal::state::{
    apply_load_event, AppState, LoadEvent, LoadStatus, PickSlot, Screen,
};

const DEFAULT_CSV_URL: &str = "https://www.football-data.co.uk/mmz4281/2526/E0.csv";
const RECENT_TABLE_ROWS: usize = 10;

#[derive(Debug, Clone)]
enum CsvSource {
    Url(String),
    File(PathBuf),
}

impl CsvSource {
    fn label(&self) -> String {
        match self {
            CsvSource::Url(url) => url.clone(),
            CsvSource::File(path) => path.display().to_string(),
        }
    }
}

fn resolve_source() -> CsvSource {
    if let Ok(path) = std::env::var("MATCH_CSV_FILE")
        && !path.trim().is_empty()
    {
        return CsvSource::File(PathBuf::from(path.trim()));
    }
    if let Ok(url) = std::env::var("MATCH_CSV_URL")
        && !url.trim().is_empty()
    {
        return CsvSource::Url(url.trim().to_string());
    }
    CsvSource::Url(DEFAULT_CSV_URL.to_string())
}

/// One best-effort fetch-and-parse per load request, off the UI thread. The
/// result comes back as a single LoadEvent; transport failure and
/// parsed-but-empty arrive as different events.
fn spawn_loader(tx: mpsc::Sender<LoadEvent>, source: CsvSource) {
    thread::spawn(move || {
        let label = source.label();
        let text = match &source {
            CsvSource::Url(url) => fetch::fetch_csv_text(url),
            CsvSource::File(path) => fetch::read_csv_file(path),
        };
        let event = match text {
            Ok(raw) => LoadEvent::Loaded {
                source: label,
                matches: parse_matches(&raw),
            },
            Err(err) => LoadEvent::Failed {
                source: label,
                error: format!("{err:#}"),
            },
        };
        let _ = tx.send(event);
    });
}

struct App {
    state: AppState,
    should_quit: bool,
    load_tx: mpsc::Sender<LoadEvent>,
    source: CsvSource,
}

impl App {
    fn new(load_tx: mpsc::Sender<LoadEvent>, source: CsvSource) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            load_tx,
            source,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Overview,
            KeyCode::Char('2') => self.state.screen = Screen::Matchup,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.screen == Screen::Matchup {
                    self.state.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.state.screen == Screen::Matchup {
                    self.state.select_prev();
                }
            }
            KeyCode::Enter => {
                if self.state.screen == Screen::Matchup {
                    self.state.assign_team();
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.state.cycle_mode(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.bump_last_n(1),
            KeyCode::Char('-') => self.state.bump_last_n(-1),
            KeyCode::Char('c') => {
                self.state.team_a = None;
                self.state.team_b = None;
                self.state.pick = PickSlot::TeamA;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_reload(&mut self) {
        if self.state.load == LoadStatus::Loading {
            self.state.push_log("[INFO] Load already in flight");
            return;
        }
        self.state.load = LoadStatus::Loading;
        self.state.push_log("[INFO] Reloading source");
        spawn_loader(self.load_tx.clone(), self.source.clone());
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let source = resolve_source();
    spawn_loader(tx.clone(), source.clone());

    let mut app = App::new(tx, source);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<LoadEvent>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(event) = rx.try_recv() {
            apply_load_event(&mut app.state, event);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Overview => render_overview(frame, chunks[1], &app.state),
        Screen::Matchup => render_matchup(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Overview => "OVERVIEW",
        Screen::Matchup => "MATCHUP",
    };
    let status = match &state.load {
        LoadStatus::Loading => "loading...".to_string(),
        LoadStatus::Ready => format!("{} matches", state.matches.len()),
        LoadStatus::EmptyParse => "no matches parsed".to_string(),
        LoadStatus::Failed(_) => "load failed".to_string(),
    };
    let line1 = format!("  (o)  MATCHDAY TERMINAL | {screen} | {status}");
    let line2 = format!("  ~|~  {}", state.source_label);
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Overview => {
            "1 Overview | 2 Matchup | r Reload | ? Help | q Quit".to_string()
        }
        Screen::Matchup => format!(
            "j/k Move | Enter Pick {} | m Mode ({}) | +/- Lookback ({}) | c Clear | ? Help | q Quit",
            match state.pick {
                PickSlot::TeamA => "A",
                PickSlot::TeamB => "B",
            },
            state.mode.label(),
            state.last_n,
        ),
    }
}

/// Empty/error states get their own full-body message so a failed or empty
/// load is never mistaken for a league of zeros.
fn load_gate<'a>(state: &'a AppState) -> Option<Paragraph<'a>> {
    match &state.load {
        LoadStatus::Loading => Some(
            Paragraph::new("Loading match data...")
                .style(Style::default().fg(Color::DarkGray)),
        ),
        LoadStatus::Failed(err) => Some(
            Paragraph::new(format!("Could not load match data: {err}\n\nPress r to retry."))
                .style(Style::default().fg(Color::Red)),
        ),
        LoadStatus::EmptyParse => Some(
            Paragraph::new(
                "The source was fetched but no matches could be parsed from it.\n\nPress r to retry.",
            )
            .style(Style::default().fg(Color::Yellow)),
        ),
        LoadStatus::Ready => None,
    }
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(gate) = load_gate(state) {
        frame.render_widget(gate, area);
        return;
    }
    let Some(stats) = analyze_league(&state.matches) else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length((RECENT_TABLE_ROWS + 2) as u16),
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    render_stat_card(frame, cards[0], "Matches", &stats.total_matches.to_string());
    render_stat_card(frame, cards[1], "Avg Goals", &format!("{:.2}", stats.avg_goals));
    render_stat_card(frame, cards[2], "Over 2.5", &format!("{:.1}%", stats.over_25_pct));
    render_stat_card(frame, cards[3], "Both Score", &format!("{:.1}%", stats.both_score_pct));

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let results = [
        ("Home", stats.home_win_pct, Color::Green),
        ("Draw", stats.draw_pct, Color::Yellow),
        ("Away", stats.away_win_pct, Color::Red),
    ];
    let result_bars: Vec<Bar> = results
        .iter()
        .map(|(label, value, color)| {
            Bar::default()
                .value(value.round() as u64)
                .label(Line::from(*label))
                .style(Style::default().fg(*color))
        })
        .collect();
    let result_chart = BarChart::default()
        .block(
            Block::default()
                .title("Result distribution (%)")
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&result_bars))
        .bar_width(7)
        .bar_gap(2)
        .max(100);
    frame.render_widget(result_chart, charts[0]);

    let table_rows = build_leaderboard(&state.matches);
    let leader_bars: Vec<Bar> = table_rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(row.points() as u64)
                .label(Line::from(abbrev(&row.name)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let leader_chart = BarChart::default()
        .block(
            Block::default()
                .title("Top 8 teams (3pts a win)")
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&leader_bars))
        .bar_width(5)
        .bar_gap(1);
    frame.render_widget(leader_chart, charts[1]);

    render_recent_table(frame, rows[2], state.recent_matches(RECENT_TABLE_ROWS));
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: &str) {
    let card = Paragraph::new(value.to_string())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_recent_table(frame: &mut Frame, area: Rect, matches: &[MatchRecord]) {
    let header = Row::new(["Date", "Home", "Score", "Away"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = matches
        .iter()
        .map(|m| {
            Row::new([
                m.date.clone(),
                m.home_team.clone(),
                format!("{} - {}", m.fthg, m.ftag),
                m.away_team.clone(),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(38),
            Constraint::Length(7),
            Constraint::Percentage(38),
        ],
    )
    .header(header)
    .block(Block::default().title("Recent matches").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_matchup(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(gate) = load_gate(state) {
        frame.render_widget(gate, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(1)])
        .split(area);

    render_team_list(frame, columns[0], state);

    let (Some(team_a), Some(team_b)) = (state.team_a.as_deref(), state.team_b.as_deref()) else {
        let prompt = Paragraph::new(format!(
            "Pick two teams to compare.\n\nTeam A: {}\nTeam B: {}\n\nj/k to move, Enter to pick, m to change mode.",
            state.team_a.as_deref().unwrap_or("-"),
            state.team_b.as_deref().unwrap_or("-"),
        ))
        .block(Block::default().title("Matchup").borders(Borders::ALL));
        frame.render_widget(prompt, columns[1]);
        return;
    };

    match analyze_matchup(team_a, team_b, &state.matches, state.matchup_mode()) {
        None => {
            let empty = Paragraph::new(format!(
                "Not enough data to compare {team_a} and {team_b} in {} mode.\n\nTry another mode (m) or a longer lookback (+).",
                state.mode.label(),
            ))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Insufficient data").borders(Borders::ALL));
            frame.render_widget(empty, columns[1]);
        }
        Some(MatchupReport::Comparative(report)) => {
            render_comparative(frame, columns[1], &report);
        }
        Some(MatchupReport::HeadToHead(report)) => {
            render_head_to_head(frame, columns[1], &report);
        }
    }
}

fn render_team_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.teams.is_empty() {
        let empty =
            Paragraph::new("No teams").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.cursor, state.teams.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let name = &state.teams[idx];
        let mut tag = "   ";
        if state.team_a.as_deref() == Some(name.as_str()) {
            tag = "[A]";
        } else if state.team_b.as_deref() == Some(name.as_str()) {
            tag = "[B]";
        }
        let marker = if idx == state.cursor { ">" } else { " " };
        let style = if idx == state.cursor {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(format!("{marker} {tag} {name}")).style(style));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_comparative(frame: &mut Frame, area: Rect, report: &ComparativeReport) {
    let insight_height = (report.insights.len() as u16) * 3 + 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(insight_height.max(5)), Constraint::Min(8)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if report.insights.is_empty() {
        lines.push(Line::from("No patterns stood out for this pairing."));
    }
    for insight in &report.insights {
        lines.push(insight_title_line(insight));
        lines.push(Line::from(format!("   {}", insight.description)));
        lines.push(Line::from(""));
    }
    let predictions = Paragraph::new(lines)
        .block(Block::default().title("Pattern-based predictions").borders(Borders::ALL));
    frame.render_widget(predictions, rows[0]);

    let sides = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_side_card(frame, sides[0], &report.side_a, Color::Green);
    render_side_card(frame, sides[1], &report.side_b, Color::Red);
}

fn insight_title_line(insight: &Insight) -> Line<'_> {
    let confidence_style = match insight.confidence {
        Confidence::High => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Confidence::Medium => Style::default().fg(Color::Yellow),
    };
    Line::from(vec![
        Span::styled(insight.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!("[{}]", insight.confidence.label()), confidence_style),
    ])
}

fn render_side_card(frame: &mut Frame, area: Rect, side: &SideReport, color: Color) {
    let agg = &side.aggregate;
    let text = format!(
        "Record: {}W {}D {}L over {} games\nWin rate: {:.0}%\nGoals for: {:.2} per game\nGoals against: {:.2} per game\nClean sheets: {:.0}%\nFailed to score: {:.0}%\nOver 2.5: {:.0}%\nBoth score: {:.0}%",
        agg.wins,
        agg.draws,
        agg.losses,
        agg.games,
        relevant_win_rate(side),
        relevant_goals_for(side),
        relevant_goals_against(side),
        agg.clean_sheet_rate,
        agg.failed_to_score_rate,
        agg.over_25_rate,
        agg.both_score_rate,
    );
    let title = format!("{} ({})", agg.team, side.context.label());
    let card = Paragraph::new(text)
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(color));
    frame.render_widget(card, area);
}

fn relevant_win_rate(side: &SideReport) -> f64 {
    match side.context {
        SideContext::Home => side.aggregate.home_win_rate,
        SideContext::Away => side.aggregate.away_win_rate,
        SideContext::Overall => side.aggregate.win_rate,
    }
}

fn relevant_goals_for(side: &SideReport) -> f64 {
    match side.context {
        SideContext::Home => side.aggregate.avg_home_goals_for,
        SideContext::Away => side.aggregate.avg_away_goals_for,
        SideContext::Overall => side.aggregate.avg_goals_for,
    }
}

fn relevant_goals_against(side: &SideReport) -> f64 {
    match side.context {
        SideContext::Home => side.aggregate.avg_home_goals_against,
        SideContext::Away => side.aggregate.avg_away_goals_against,
        SideContext::Overall => side.aggregate.avg_goals_against,
    }
}

fn render_head_to_head(frame: &mut Frame, area: Rect, report: &HeadToHeadReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(area);

    let summary = format!(
        "{} meetings\n\n{}: {} wins ({:.0}%)\n{}: {} wins ({:.0}%)\nDraws: {} ({:.0}%)\n\nAvg goals: {:.2} | Over 2.5: {:.0}% | Both score: {:.0}%",
        report.total,
        report.team_a,
        report.a_wins,
        report.a_win_pct,
        report.team_b,
        report.b_wins,
        report.b_win_pct,
        report.draws,
        report.draw_pct,
        report.avg_goals,
        report.over_25_pct,
        report.both_score_pct,
    );
    let head = Paragraph::new(summary).block(
        Block::default()
            .title(format!("{} vs {} head-to-head", report.team_a, report.team_b))
            .borders(Borders::ALL),
    );
    frame.render_widget(head, rows[0]);

    let pattern_text = if report.patterns.is_empty() {
        "No recurring patterns in this fixture.".to_string()
    } else {
        report
            .patterns
            .iter()
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let patterns = Paragraph::new(pattern_text)
        .block(Block::default().title("Patterns").borders(Borders::ALL));
    frame.render_widget(patterns, rows[1]);
}

fn abbrev(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    cleaned.chars().take(3).collect::<String>().to_uppercase()
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Terminal - Help",
        "",
        "Global:",
        "  1            Overview",
        "  2            Matchup",
        "  r            Reload source",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Matchup:",
        "  j/k or ↑/↓   Move through teams",
        "  Enter        Assign team to the active slot",
        "  m            Cycle mode (split / overall / head-to-head)",
        "  +/-          Adjust lookback window (split mode)",
        "  c            Clear the selection",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
