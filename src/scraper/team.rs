use ::scraper::{ElementRef, Selector};
use chrono::{Months, NaiveDate};
use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::model::{
    StatTable, TeamCategoryPage, TeamFlashRow, TeamMapStats, TeamMatchRow, TeamOpeningKillRow,
    TeamPlayerRow, TeamStatsCategory,
};
use crate::scraper::{cell_text, child_cells, select_text, Html, BASE_URL};

const WINDOW_DATE_FORMAT: &str = "%Y-%m-%d";

/// URL-safe form of a team name: lowercase, spaces become hyphens.
pub fn team_slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// The three calendar months ending on `today`.
pub fn stats_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_months(Months::new(3))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

pub(crate) fn team_stats_url(
    category: TeamStatsCategory,
    team_id: u32,
    slug: &str,
    (start, end): (NaiveDate, NaiveDate),
) -> String {
    let prefix = match category {
        TeamStatsCategory::Overview => format!("{BASE_URL}/stats/teams"),
        _ => format!("{BASE_URL}/stats/teams/{category}"),
    };
    format!(
        "{prefix}/{team_id}/{slug}?startDate={}&endDate={}",
        start.format(WINDOW_DATE_FORMAT),
        end.format(WINDOW_DATE_FORMAT)
    )
}

pub(crate) fn parse_team_category(
    category: TeamStatsCategory,
    document: &Html,
) -> Result<TeamCategoryPage> {
    let page = match category {
        TeamStatsCategory::Overview => TeamCategoryPage::Overview(parse_overview(document)?),
        TeamStatsCategory::Matches => TeamCategoryPage::Matches(parse_matches(document)?),
        TeamStatsCategory::Maps => TeamCategoryPage::Maps(parse_maps(document)?),
        TeamStatsCategory::Players => TeamCategoryPage::Players(parse_players(document)?),
        TeamStatsCategory::Flashes => TeamCategoryPage::Flashes(parse_flashes(document)?),
        TeamStatsCategory::OpeningKills => {
            TeamCategoryPage::OpeningKills(parse_opening_kills(document)?)
        }
    };
    Ok(page)
}

fn parse_overview(document: &Html) -> Result<StatTable> {
    let box_selector = Selector::parse("div.col.standard-box")?;
    let label_selector = Selector::parse(".small-label-below")?;
    let value_selector = Selector::parse(".large-strong")?;

    let overview: StatTable = document
        .select(&box_selector)
        .filter_map(|b| {
            let label = select_text(&b, &label_selector)?;
            Some((label, select_text(&b, &value_selector)))
        })
        .collect();
    debug!(count = overview.len(), "parsed team overview");
    Ok(overview)
}

/// Cells of every body row in the page's stats table.
fn stats_table_rows(document: &Html) -> Result<Vec<Vec<ElementRef<'_>>>> {
    let row_selector = Selector::parse("table.stats-table tbody tr")?;
    Ok(document
        .select(&row_selector)
        .map(|row| child_cells(&row))
        .collect_vec())
}

fn parse_matches(document: &Html) -> Result<Vec<TeamMatchRow>> {
    let rows = stats_table_rows(document)?
        .iter()
        .map(|cells| TeamMatchRow {
            date: cell_text(cells, 0),
            event: cell_text(cells, 1),
            opponent: cell_text(cells, 3),
            map: cell_text(cells, 4),
            result: cell_text(cells, 5),
            outcome: cell_text(cells, 6),
        })
        .collect_vec();
    debug!(count = rows.len(), "parsed team matches");
    Ok(rows)
}

fn parse_maps(document: &Html) -> Result<Vec<TeamMapStats>> {
    let map_selector = Selector::parse("div.two-grid:not(.win-defeat-container) > div.col")?;
    let name_selector = Selector::parse(".map-pool")?;
    let row_selector = Selector::parse(".stats-row")?;

    let maps = document
        .select(&map_selector)
        .map(|item| TeamMapStats {
            map: select_text(&item, &name_selector),
            stats: item
                .select(&row_selector)
                .filter_map(|row| {
                    let cells = child_cells(&row);
                    Some((cell_text(&cells, 0)?, cell_text(&cells, 1)))
                })
                .collect(),
        })
        .collect_vec();
    debug!(count = maps.len(), "parsed team maps");
    Ok(maps)
}

fn parse_players(document: &Html) -> Result<Vec<TeamPlayerRow>> {
    let rows = stats_table_rows(document)?
        .iter()
        .map(|cells| TeamPlayerRow {
            nickname: cell_text(cells, 0),
            maps: cell_text(cells, 1),
            rounds: cell_text(cells, 2),
            kd_diff: cell_text(cells, 3),
            kd: cell_text(cells, 4),
            rating: cell_text(cells, 5),
        })
        .collect_vec();
    debug!(count = rows.len(), "parsed team players");
    Ok(rows)
}

fn parse_flashes(document: &Html) -> Result<Vec<TeamFlashRow>> {
    let rows = stats_table_rows(document)?
        .iter()
        .map(|cells| TeamFlashRow {
            nickname: cell_text(cells, 0),
            maps: cell_text(cells, 1),
            rounds: cell_text(cells, 2),
            thrown: cell_text(cells, 3),
            blinded: cell_text(cells, 4),
            opponents_flashed: cell_text(cells, 5),
            diff: cell_text(cells, 6),
            flash_assists: cell_text(cells, 7),
            success: cell_text(cells, 8),
        })
        .collect_vec();
    debug!(count = rows.len(), "parsed team flash stats");
    Ok(rows)
}

fn parse_opening_kills(document: &Html) -> Result<Vec<TeamOpeningKillRow>> {
    let rows = stats_table_rows(document)?
        .iter()
        .map(|cells| TeamOpeningKillRow {
            nickname: cell_text(cells, 0),
            maps: cell_text(cells, 1),
            rounds: cell_text(cells, 2),
            kpr: cell_text(cells, 3),
            dpr: cell_text(cells, 4),
            attempts: cell_text(cells, 5),
            success: cell_text(cells, 6),
            rating: cell_text(cells, 7),
        })
        .collect_vec();
    debug!(count = rows.len(), "parsed team opening kills");
    Ok(rows)
}
