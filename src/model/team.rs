use chrono::NaiveDate;
use serde::Serialize;

use super::common::StatTable;

/// One of the six team statistics pages fetched per team.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, strum_macros::Display, strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatsCategory {
    #[strum(serialize = "")]
    Overview,
    #[strum(serialize = "matches")]
    Matches,
    #[strum(serialize = "maps")]
    Maps,
    #[strum(serialize = "players")]
    Players,
    #[strum(serialize = "players/flashes")]
    Flashes,
    #[strum(serialize = "players/openingkills")]
    OpeningKills,
}

/// Statistics for one team across all categories, over a date window.
#[derive(Debug, Clone, Serialize)]
pub struct TeamCategoryStats {
    pub team: String,
    pub team_id: u32,
    pub slug: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub overview: StatTable,
    pub matches: Vec<TeamMatchRow>,
    pub maps: Vec<TeamMapStats>,
    pub player_overview: Vec<TeamPlayerRow>,
    pub flash_stats: Vec<TeamFlashRow>,
    pub opening_kill_stats: Vec<TeamOpeningKillRow>,
}

impl TeamCategoryStats {
    pub fn empty(
        team: &str,
        team_id: u32,
        slug: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Self {
        Self {
            team: team.to_string(),
            team_id,
            slug: slug.to_string(),
            window_start,
            window_end,
            overview: StatTable::new(),
            matches: Vec::new(),
            maps: Vec::new(),
            player_overview: Vec::new(),
            flash_stats: Vec::new(),
            opening_kill_stats: Vec::new(),
        }
    }
}

/// Parsed content of a single category page.
#[derive(Debug, Clone)]
pub enum TeamCategoryPage {
    Overview(StatTable),
    Matches(Vec<TeamMatchRow>),
    Maps(Vec<TeamMapStats>),
    Players(Vec<TeamPlayerRow>),
    Flashes(Vec<TeamFlashRow>),
    OpeningKills(Vec<TeamOpeningKillRow>),
}

impl TeamCategoryPage {
    /// An empty page of the given category.
    pub fn empty(category: TeamStatsCategory) -> Self {
        match category {
            TeamStatsCategory::Overview => TeamCategoryPage::Overview(StatTable::new()),
            TeamStatsCategory::Matches => TeamCategoryPage::Matches(Vec::new()),
            TeamStatsCategory::Maps => TeamCategoryPage::Maps(Vec::new()),
            TeamStatsCategory::Players => TeamCategoryPage::Players(Vec::new()),
            TeamStatsCategory::Flashes => TeamCategoryPage::Flashes(Vec::new()),
            TeamStatsCategory::OpeningKills => TeamCategoryPage::OpeningKills(Vec::new()),
        }
    }

    pub fn merge_into(self, stats: &mut TeamCategoryStats) {
        match self {
            TeamCategoryPage::Overview(t) => stats.overview = t,
            TeamCategoryPage::Matches(rows) => stats.matches = rows,
            TeamCategoryPage::Maps(rows) => stats.maps = rows,
            TeamCategoryPage::Players(rows) => stats.player_overview = rows,
            TeamCategoryPage::Flashes(rows) => stats.flash_stats = rows,
            TeamCategoryPage::OpeningKills(rows) => stats.opening_kill_stats = rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMatchRow {
    pub date: Option<String>,
    pub event: Option<String>,
    pub opponent: Option<String>,
    pub map: Option<String>,
    pub result: Option<String>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMapStats {
    pub map: Option<String>,
    pub stats: StatTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamPlayerRow {
    pub nickname: Option<String>,
    pub maps: Option<String>,
    pub rounds: Option<String>,
    pub kd_diff: Option<String>,
    pub kd: Option<String>,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamFlashRow {
    pub nickname: Option<String>,
    pub maps: Option<String>,
    pub rounds: Option<String>,
    pub thrown: Option<String>,
    pub blinded: Option<String>,
    pub opponents_flashed: Option<String>,
    pub diff: Option<String>,
    pub flash_assists: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamOpeningKillRow {
    pub nickname: Option<String>,
    pub maps: Option<String>,
    pub rounds: Option<String>,
    pub kpr: Option<String>,
    pub dpr: Option<String>,
    pub attempts: Option<String>,
    pub success: Option<String>,
    pub rating: Option<String>,
}
