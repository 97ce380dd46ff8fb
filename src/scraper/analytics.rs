use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::model::{
    AnalyticsHandicap, AnalyticsHeadToHead, AnalyticsInsights, AnalyticsMapHandicap,
    AnalyticsMapStat, AnalyticsRecentMatch, HandicapResult, MapRoundMargins, MatchAnalytics,
    OrderedMap, PlayerForm, RoundMargins,
};
use crate::scraper::{cell_text, child_cells, element_text, select_text, Html};

/// Any one of the sub-panels marks the page as an analytics page.
const PANEL_SENTINEL: &str = "div.analytics-insights-wrapper, \
    div.analytics-head-to-head-container, \
    div.analytics-handicap-wrapper, \
    div.analytics-handicap-map-wrapper, \
    div.analytics-map-stats";

/// Parse the analytics page of a match.
///
/// Returns `None` when the page carries no analytics panel at all.
pub(crate) fn parse_match_analytics(document: &Html) -> Result<Option<MatchAnalytics>> {
    let sentinel = Selector::parse(PANEL_SENTINEL)?;
    if document.select(&sentinel).next().is_none() {
        debug!("no analytics panel on page");
        return Ok(None);
    }

    let analytics = MatchAnalytics {
        insights: parse_insights(document)?,
        head_to_head: parse_head_to_head(document)?,
        handicap: parse_handicap(document)?,
        map_handicap: parse_map_handicap(document)?,
        map_stats: parse_map_stats(document)?,
    };
    debug!(
        insights = analytics.insights.len(),
        head_to_head = analytics.head_to_head.len(),
        handicap = analytics.handicap.len(),
        map_handicap = analytics.map_handicap.len(),
        map_stats = analytics.map_stats.len(),
        "parsed match analytics"
    );
    Ok(Some(analytics))
}

fn parse_insights(document: &Html) -> Result<Vec<AnalyticsInsights>> {
    let panel_selector = Selector::parse("div.analytics-insights-wrapper > div.col-6")?;
    let team_selector = Selector::parse(".team-name")?;
    let insight_selector = Selector::parse(".analytics-insights-insight")?;
    let info_selector = Selector::parse(".analytics-insights-info")?;

    Ok(document
        .select(&panel_selector)
        .map(|panel| AnalyticsInsights {
            team: select_text(&panel, &team_selector),
            insights: panel
                .select(&insight_selector)
                .map(|i| select_text(&i, &info_selector))
                .collect(),
        })
        .collect_vec())
}

fn parse_head_to_head(document: &Html) -> Result<Vec<AnalyticsHeadToHead>> {
    let container_selector = Selector::parse("div.analytics-head-to-head-container")?;
    let team_selector = Selector::parse(".team-name")?;
    let player_row_selector = Selector::parse(".table-container tbody tr")?;
    let nickname_selector = Selector::parse(".player-nickname")?;
    let three_months_selector = Selector::parse(".table-3-months")?;
    let event_selector = Selector::parse(".table-event")?;
    let last_match_selector = Selector::parse(".analytics-last-matches > a")?;
    let score_selector = Selector::parse(".recent-score")?;
    let match_type_selector = Selector::parse(".match-type")?;

    Ok(document
        .select(&container_selector)
        .map(|container| {
            let players: OrderedMap<PlayerForm> = container
                .select(&player_row_selector)
                .filter_map(|row| {
                    let nickname = select_text(&row, &nickname_selector)?;
                    let form = PlayerForm {
                        three_months: select_text(&row, &three_months_selector),
                        event: select_text(&row, &event_selector),
                    };
                    Some((nickname, form))
                })
                .collect();
            let last_matches = container
                .select(&last_match_selector)
                .map(|m| AnalyticsRecentMatch {
                    opponent: select_text(&m, &team_selector),
                    score: select_text(&m, &score_selector),
                    match_type: select_text(&m, &match_type_selector),
                })
                .collect();
            AnalyticsHeadToHead {
                team: select_text(&container, &team_selector),
                players,
                last_matches,
            }
        })
        .collect_vec())
}

fn parse_handicap(document: &Html) -> Result<Vec<AnalyticsHandicap>> {
    let panel_selector = Selector::parse("div.analytics-handicap-wrapper > div.col-6")?;
    let team_selector = Selector::parse(".team-name")?;
    let count_selector = Selector::parse(".match-map-count")?;
    let row_selector = Selector::parse("tbody tr")?;
    let score_selector = Selector::parse("td:not(.best-bet):not(.handicap-data)")?;
    let handicap_selector = Selector::parse(".handicap-data")?;

    Ok(document
        .select(&panel_selector)
        .map(|panel| AnalyticsHandicap {
            team: select_text(&panel, &team_selector),
            match_map_count: select_text(&panel, &count_selector),
            matches: panel
                .select(&row_selector)
                .map(|row| HandicapResult {
                    score: select_text(&row, &score_selector),
                    handicap: select_text(&row, &handicap_selector),
                })
                .collect(),
        })
        .collect_vec())
}

fn parse_map_handicap(document: &Html) -> Result<Vec<AnalyticsMapHandicap>> {
    let panel_selector = Selector::parse("div.analytics-handicap-map-wrapper > div.col-6")?;
    let overall_selector = Selector::parse(".analytics-handicap-map-data-overall-container")?;
    let row_selector = Selector::parse("tbody tr")?;

    Ok(document
        .select(&panel_selector)
        .map(|panel| {
            let overall = panel.select(&overall_selector).next();
            let overall_cells = overall.map(|o| child_cells(&o)).unwrap_or_default();
            let first_value = |index: usize| -> Option<String> {
                overall_cells
                    .get(index)
                    .and_then(|cell| child_cells(cell).first().and_then(element_text))
            };
            AnalyticsMapHandicap {
                overall: RoundMargins {
                    avg_rounds_lost_in_wins: first_value(0),
                    avg_rounds_won_in_losses: first_value(1),
                },
                maps: panel
                    .select(&row_selector)
                    .map(|row| {
                        let cells = child_cells(&row);
                        MapRoundMargins {
                            map: cell_text(&cells, 0),
                            avg_rounds_lost_in_wins: cell_text(&cells, 1),
                            avg_rounds_won_in_losses: cell_text(&cells, 2),
                        }
                    })
                    .collect(),
            }
        })
        .collect_vec())
}

/// Per-team pick/ban rows; the map cell spans both teams' rows, so rows
/// without one belong to the map of the row above.
fn parse_map_stats(document: &Html) -> Result<Vec<AnalyticsMapStat>> {
    let row_selector = Selector::parse("div.analytics-map-stats table.gtSmartphone-only tbody tr")?;
    let map_selector = Selector::parse("td[rowspan]")?;
    let team_selector = Selector::parse(".maps-team-name")?;
    let pick_selector = Selector::parse(".analytics-map-stats-pick-percentage")?;
    let ban_selector = Selector::parse(".analytics-map-stats-ban-percentage")?;
    let win_selector = Selector::parse(".analytics-map-stats-win-percentage")?;
    let played_selector = Selector::parse(".analytics-map-stats-played")?;
    let comment_selector = Selector::parse(".analytics-map-stats-comment")?;

    let mut current_map: Option<String> = None;
    let mut stats = Vec::new();
    for row in document.select(&row_selector) {
        if let Some(map) = select_text(&row, &map_selector) {
            current_map = Some(map);
        }
        stats.push(parse_map_stat_row(
            &row,
            current_map.clone(),
            [
                &team_selector,
                &pick_selector,
                &ban_selector,
                &win_selector,
                &played_selector,
                &comment_selector,
            ],
        ));
    }
    Ok(stats)
}

fn parse_map_stat_row(
    row: &ElementRef,
    map: Option<String>,
    [team, pick, ban, win, played, comment]: [&Selector; 6],
) -> AnalyticsMapStat {
    AnalyticsMapStat {
        map,
        team: select_text(row, team),
        first_pick: select_text(row, pick),
        first_ban: select_text(row, ban),
        win: select_text(row, win),
        played: select_text(row, played),
        comment: select_text(row, comment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYTICS: &str = r#"<html><body>
      <div class="analytics-insights-wrapper">
        <div class="col-6">
          <div class="team-name">MOUZ</div>
          <div class="analytics-insights-insight"><div class="analytics-insights-info">Won 8 of last 10 maps</div></div>
          <div class="analytics-insights-insight"><span>no info</span></div>
        </div>
        <div class="col-6"><div class="team-name">Los Kogutos</div></div>
      </div>
      <div class="analytics-head-to-head-container">
        <div class="analytics-head-to-head-header"><span class="team-name">MOUZ</span></div>
        <table class="table-container"><tbody>
          <tr><td class="player-nickname">torzsi</td><td class="table-3-months">1.18</td><td class="table-event">1.02</td></tr>
          <tr><td class="player-nickname">xertioN</td><td class="table-3-months">1.10</td></tr>
        </tbody></table>
        <div class="analytics-last-matches">
          <a href="/matches/1/x"><span class="team-name">FaZe</span><span class="recent-score">2 - 1</span><span class="match-type">bo3</span></a>
        </div>
      </div>
      <div class="analytics-handicap-wrapper">
        <div class="col-6">
          <div class="team-name">MOUZ</div><div class="match-map-count">12 maps</div>
          <table><tbody>
            <tr><td class="score">13 - 7</td><td class="handicap-data">+6</td><td class="best-bet">x</td></tr>
          </tbody></table>
        </div>
      </div>
      <div class="analytics-handicap-map-wrapper">
        <div class="col-6">
          <div class="analytics-handicap-map-data-overall-container">
            <div><span>5.2</span><span>avg rounds lost in wins</span></div>
            <div><span>8.1</span><span>avg rounds won in losses</span></div>
          </div>
          <table><tbody>
            <tr><td class="mapname">Mirage</td><td>4.5</td><td>9.0</td></tr>
          </tbody></table>
        </div>
      </div>
      <div class="analytics-map-stats">
        <table class="gtSmartphone-only"><tbody>
          <tr>
            <td rowspan="2">Ancient</td><td class="maps-team-name">MOUZ</td>
            <td class="analytics-map-stats-pick-percentage">30%</td><td class="analytics-map-stats-ban-percentage">0%</td>
            <td class="analytics-map-stats-win-percentage">70%</td><td class="analytics-map-stats-played">10</td>
            <td class="analytics-map-stats-comment">Comfort pick</td>
          </tr>
          <tr>
            <td class="maps-team-name">Los Kogutos</td>
            <td class="analytics-map-stats-pick-percentage">5%</td><td class="analytics-map-stats-ban-percentage">60%</td>
            <td class="analytics-map-stats-win-percentage">40%</td><td class="analytics-map-stats-played">5</td>
          </tr>
        </tbody></table>
      </div>
    </body></html>"#;

    #[test]
    fn test_parse_match_analytics() {
        let document = Html::parse_document(ANALYTICS);
        let analytics = parse_match_analytics(&document).unwrap().unwrap();

        assert_eq!(analytics.insights.len(), 2);
        assert_eq!(analytics.insights[0].team.as_deref(), Some("MOUZ"));
        assert_eq!(
            analytics.insights[0].insights,
            vec![Some("Won 8 of last 10 maps".to_string()), None]
        );
        assert!(analytics.insights[1].insights.is_empty());

        let h2h = &analytics.head_to_head[0];
        assert_eq!(h2h.team.as_deref(), Some("MOUZ"));
        assert_eq!(h2h.players.len(), 2);
        assert_eq!(h2h.players.get("xertioN").unwrap().event, None);
        assert_eq!(h2h.last_matches[0].opponent.as_deref(), Some("FaZe"));
        assert_eq!(h2h.last_matches[0].match_type.as_deref(), Some("bo3"));

        let handicap = &analytics.handicap[0];
        assert_eq!(handicap.match_map_count.as_deref(), Some("12 maps"));
        assert_eq!(handicap.matches[0].score.as_deref(), Some("13 - 7"));
        assert_eq!(handicap.matches[0].handicap.as_deref(), Some("+6"));

        let map_handicap = &analytics.map_handicap[0];
        assert_eq!(map_handicap.overall.avg_rounds_lost_in_wins.as_deref(), Some("5.2"));
        assert_eq!(map_handicap.overall.avg_rounds_won_in_losses.as_deref(), Some("8.1"));
        assert_eq!(map_handicap.maps[0].map.as_deref(), Some("Mirage"));
        assert_eq!(map_handicap.maps[0].avg_rounds_won_in_losses.as_deref(), Some("9.0"));

        assert_eq!(analytics.map_stats.len(), 2);
        assert_eq!(analytics.map_stats[1].map.as_deref(), Some("Ancient"));
        assert_eq!(analytics.map_stats[1].team.as_deref(), Some("Los Kogutos"));
        assert_eq!(analytics.map_stats[1].first_ban.as_deref(), Some("60%"));
        assert_eq!(analytics.map_stats[1].comment, None);
    }

    #[test]
    fn test_parse_match_analytics_without_panel() {
        let document = Html::parse_document("<html><body><div class=\"match\"></div></body></html>");
        assert!(parse_match_analytics(&document).unwrap().is_none());
    }
}
