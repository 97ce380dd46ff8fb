use serde::Serialize;

use super::common::StatTable;

/// Profile and statistics from a player's stats page.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub nickname: String,
    pub real_name: Option<String>,
    pub team: Option<String>,
    pub age: Option<String>,
    pub short_stats: StatTable,
    pub full_stats: StatTable,
}

impl PlayerProfile {
    /// Placeholder for a player whose stats page could not be rendered.
    pub fn unavailable(player_id: &str, nickname: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            nickname: nickname.to_string(),
            real_name: None,
            team: None,
            age: None,
            short_stats: StatTable::new(),
            full_stats: StatTable::new(),
        }
    }
}
