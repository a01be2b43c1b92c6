//! Typed match records parsed from football-data.co.uk style CSV text.

/// One finished match as it appeared in the source CSV.
///
/// String fields are stored trimmed but otherwise verbatim; `date` in
/// particular keeps the source format and is never validated as a calendar
/// date. Records are built once during parse and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub div: String,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub fthg: u32,
    pub ftag: u32,
    pub ftr: String,
    pub hthg: u32,
    pub htag: u32,
    pub htr: String,
}

impl MatchRecord {
    pub fn total_goals(&self) -> u32 {
        self.fthg + self.ftag
    }

    /// Combined score strictly over the 2.5 goal line.
    pub fn is_over_25(&self) -> bool {
        self.total_goals() > 2
    }

    pub fn both_scored(&self) -> bool {
        self.fthg > 0 && self.ftag > 0
    }

    /// Result code re-derived from the goal counts, ignoring the stored
    /// `ftr`. Tallies trust the source code; this is the cross-check for
    /// inputs where the two disagree.
    pub fn derived_result(&self) -> char {
        if self.fthg > self.ftag {
            'H'
        } else if self.fthg < self.ftag {
            'A'
        } else {
            'D'
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Raw per-row fields, pre-coercion. Filled by header-name dispatch so a
/// mistyped column lands nowhere instead of shadowing a known field.
#[derive(Debug, Default)]
struct RawRow {
    div: String,
    date: String,
    time: String,
    home_team: String,
    away_team: String,
    fthg: String,
    ftag: String,
    ftr: String,
    hthg: String,
    htag: String,
    htr: String,
}

fn assign_field(row: &mut RawRow, name: &str, value: &str) {
    let slot = match name {
        "Div" => &mut row.div,
        "Date" => &mut row.date,
        "Time" => &mut row.time,
        "HomeTeam" => &mut row.home_team,
        "AwayTeam" => &mut row.away_team,
        "FTHG" => &mut row.fthg,
        "FTAG" => &mut row.ftag,
        "FTR" => &mut row.ftr,
        "HTHG" => &mut row.hthg,
        "HTAG" => &mut row.htag,
        "HTR" => &mut row.htr,
        // Columns beyond the record schema (odds, referees, shots) pass
        // through the file opaquely and are not retained.
        _ => return,
    };
    *slot = value.to_string();
}

/// Parse raw CSV text into match records.
///
/// Never fails: structurally broken input (no header, no data rows) yields an
/// empty vec, and defective rows are dropped or field-defaulted locally. The
/// first non-blank line is the header; its column order maps every following
/// row. Short rows are padded with empty trailing fields.
pub fn parse_matches(raw: &str) -> Vec<MatchRecord> {
    let lines: Vec<&str> = raw.split('\n').filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<&str> = lines[0].split(',').map(str::trim).collect();

    let mut out = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let values: Vec<&str> = line.split(',').collect();
        let mut row = RawRow::default();
        for (idx, name) in headers.iter().enumerate() {
            let value = values.get(idx).map(|v| v.trim()).unwrap_or("");
            assign_field(&mut row, name, value);
        }

        if row.home_team.is_empty() || row.away_team.is_empty() {
            continue;
        }

        let fthg = parse_goal_count(&row.fthg);
        let ftag = parse_goal_count(&row.ftag);
        let mut record = MatchRecord {
            div: row.div,
            date: row.date,
            time: row.time,
            home_team: row.home_team,
            away_team: row.away_team,
            fthg,
            ftag,
            ftr: row.ftr,
            hthg: parse_goal_count(&row.hthg),
            htag: parse_goal_count(&row.htag),
            htr: row.htr,
        };
        if record.ftr.is_empty() {
            record.ftr = record.derived_result().to_string();
        }
        out.push(record);
    }
    out
}

/// Goal cells carry plain non-negative integers; anything else (empty cell,
/// decimals after the integer part, stray text) coerces to the leading digit
/// run or 0 rather than rejecting the row.
fn parse_goal_count(raw: &str) -> u32 {
    let digits: &str = {
        let s = raw.trim();
        let end = s
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map(|(idx, _)| idx)
            .unwrap_or(s.len());
        &s[..end]
    };
    digits.parse::<u32>().unwrap_or(0)
}
