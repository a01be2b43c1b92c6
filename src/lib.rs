pub mod dataset;
pub mod fetch;
pub mod leaderboard;
pub mod league_patterns;
pub mod matchup;
pub mod state;
