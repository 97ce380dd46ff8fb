use serde::Serialize;

use super::common::OrderedMap;

/// The match analytics panel, when a match has one.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalytics {
    pub insights: Vec<AnalyticsInsights>,
    pub head_to_head: Vec<AnalyticsHeadToHead>,
    pub handicap: Vec<AnalyticsHandicap>,
    pub map_handicap: Vec<AnalyticsMapHandicap>,
    pub map_stats: Vec<AnalyticsMapStat>,
}

/// Short textual insights listed for a team.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsInsights {
    pub team: Option<String>,
    pub insights: Vec<Option<String>>,
}

/// Player form and recent matches for one side.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsHeadToHead {
    pub team: Option<String>,
    pub players: OrderedMap<PlayerForm>,
    pub last_matches: Vec<AnalyticsRecentMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerForm {
    pub three_months: Option<String>,
    pub event: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsRecentMatch {
    pub opponent: Option<String>,
    pub score: Option<String>,
    pub match_type: Option<String>,
}

/// Past three months of results with the handicap each would have covered.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsHandicap {
    pub team: Option<String>,
    pub match_map_count: Option<String>,
    pub matches: Vec<HandicapResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandicapResult {
    pub score: Option<String>,
    pub handicap: Option<String>,
}

/// Average round margins, overall and per map.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsMapHandicap {
    pub overall: RoundMargins,
    pub maps: Vec<MapRoundMargins>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMargins {
    pub avg_rounds_lost_in_wins: Option<String>,
    pub avg_rounds_won_in_losses: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapRoundMargins {
    pub map: Option<String>,
    pub avg_rounds_lost_in_wins: Option<String>,
    pub avg_rounds_won_in_losses: Option<String>,
}

/// Pick, ban and win rates for one team on one map.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsMapStat {
    pub map: Option<String>,
    pub team: Option<String>,
    pub first_pick: Option<String>,
    pub first_ban: Option<String>,
    pub win: Option<String>,
    pub played: Option<String>,
    pub comment: Option<String>,
}
