use serde::Serialize;

use super::analytics::MatchAnalytics;
use super::common::OrderedMap;
use super::player::PlayerProfile;
use super::team::TeamCategoryStats;

/// Everything scraped for one upcoming match.
///
/// `lineups`, `past_results` and `team_stats` always hold exactly two entries
/// and index `i` refers to the same team in all three.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub slug: String,
    pub url: String,
    pub title: Option<String>,
    pub format: Option<String>,
    pub lineups: Vec<TeamLineup>,
    pub map_stats: Vec<MapStat>,
    pub past_results: Vec<TeamRecentForm>,
    pub head_to_head: HeadToHead,
    pub player_stats: Vec<PlayerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<MatchAnalytics>,
    pub team_stats: Vec<TeamCategoryStats>,
}

impl MatchRecord {
    /// Name of the directory this match is written to.
    pub fn output_name(&self) -> String {
        let name = if self.slug.is_empty() {
            self.match_id.clone()
        } else {
            format!("{}-{}", self.match_id, self.slug)
        };
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    }

    /// The part of the record that is known from the match page alone.
    pub fn pre_match(&self) -> PreMatchView<'_> {
        PreMatchView {
            match_id: &self.match_id,
            url: &self.url,
            title: self.title.as_deref(),
            format: self.format.as_deref(),
            lineups: &self.lineups,
            map_stats: &self.map_stats,
            past_results: &self.past_results,
            head_to_head: &self.head_to_head,
        }
    }
}

/// Borrowed view of a [`MatchRecord`] without player, team and analytics data.
#[derive(Debug, Serialize)]
pub struct PreMatchView<'a> {
    pub match_id: &'a str,
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub format: Option<&'a str>,
    pub lineups: &'a [TeamLineup],
    pub map_stats: &'a [MapStat],
    pub past_results: &'a [TeamRecentForm],
    pub head_to_head: &'a HeadToHead,
}

/// Fragments extracted from a rendered match page.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPage {
    pub title: Option<String>,
    pub format: Option<String>,
    pub lineups: Vec<TeamLineup>,
    pub map_stats: Vec<MapStat>,
    pub past_results: Vec<TeamRecentForm>,
    pub head_to_head: HeadToHead,
    pub analytics_url: Option<String>,
}

/// The roster a team brings to a match.
#[derive(Debug, Clone, Serialize)]
pub struct TeamLineup {
    pub team_id: u32,
    pub team_name: String,
    pub world_rank: Option<u32>,
    pub players: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineupPlayer {
    pub player_id: String,
    pub nickname: String,
}

/// Map pool statistics for one map, keyed by team name.
#[derive(Debug, Clone, Serialize)]
pub struct MapStat {
    pub map_name: Option<String>,
    pub per_team_stat: OrderedMap<MapTeamStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapTeamStat {
    pub win_percentage: Option<String>,
    pub maps_played: Option<String>,
}

/// A team's results over the past three months as listed on the match page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamRecentForm {
    pub team: Option<String>,
    pub matches: Vec<RecentResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentResult {
    pub opponent: Option<String>,
    pub map: Option<String>,
    pub score: Option<String>,
}

/// Prior meetings between the two teams.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadToHead {
    pub stats: HeadToHeadStats,
    pub listing: Vec<HeadToHeadMatch>,
}

/// Aggregate wins; all `None` when the teams never met.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadToHeadStats {
    pub team1: Option<HeadToHeadWins>,
    pub team2: Option<HeadToHeadWins>,
    pub overtimes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadWins {
    pub team: Option<String>,
    pub wins: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadMatch {
    pub date: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub event: Option<String>,
    pub map: Option<String>,
    pub result: Option<String>,
}
