use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::{HltvError, Result};
use crate::model::{
    HeadToHead, HeadToHeadMatch, HeadToHeadStats, HeadToHeadWins, LineupPlayer, MapStat,
    MapTeamStat, MatchPage, OrderedMap, RecentResult, TeamLineup, TeamRecentForm,
};
use crate::scraper::{absolute_url, child_cells, element_text, select_attr, select_text, Html};

/// Number of teams on every match page.
pub(crate) const TEAMS_PER_MATCH: usize = 2;

/// Extract every fragment the pipeline needs from a rendered match page.
///
/// Only the lineups are required; all other fragments degrade to
/// `None`/empty when their elements are absent.
pub(crate) fn parse_match_page(document: &Html) -> Result<MatchPage> {
    let lineups = parse_lineups(document)?;
    let map_stats = parse_map_stats(document, &lineups)?;
    let past_results = align_to_lineups(parse_past_results(document)?);
    let head_to_head = parse_head_to_head(document)?;
    let root = document.root_element();

    let title_selector = Selector::parse("div.timeAndEvent div.event")?;
    let title = select_text(&root, &title_selector);

    let format_selector = Selector::parse("div.preformatted-text")?;
    let format = select_text(&root, &format_selector).and_then(|text| {
        let format = text.split('*').next().unwrap_or_default().trim().to_string();
        (!format.is_empty()).then_some(format)
    });

    let analytics_selector = Selector::parse("a.matchpage-analytics-center-container")?;
    let analytics_url = select_attr(&root, &analytics_selector, "href").map(|h| absolute_url(&h));

    debug!(
        maps = map_stats.len(),
        h2h = head_to_head.listing.len(),
        analytics = analytics_url.is_some(),
        "parsed match page"
    );

    Ok(MatchPage {
        title,
        format,
        lineups,
        map_stats,
        past_results,
        head_to_head,
        analytics_url,
    })
}

pub(crate) fn parse_lineups(document: &Html) -> Result<Vec<TeamLineup>> {
    let lineup_selector = Selector::parse("div.lineups div.lineup")?;
    let lineups = document
        .select(&lineup_selector)
        .map(|e| parse_lineup(&e))
        .collect::<Result<Vec<_>>>()?;

    if lineups.is_empty() {
        return Err(HltvError::RequiredFragmentMissing {
            context: "lineup blocks (div.lineups div.lineup)",
        });
    }
    if lineups.len() != TEAMS_PER_MATCH {
        return Err(HltvError::RequiredFragmentMissing {
            context: "exactly two lineup blocks",
        });
    }
    Ok(lineups)
}

fn parse_lineup(lineup: &ElementRef) -> Result<TeamLineup> {
    let team_link_selector = Selector::parse("div.flex-align-center > a")?;
    let team_link = lineup
        .select(&team_link_selector)
        .next()
        .ok_or(HltvError::RequiredFragmentMissing {
            context: "lineup team link (div.flex-align-center > a)",
        })?;

    let team_id = team_link
        .value()
        .attr("href")
        .and_then(|href| href.split_once("/team/"))
        .and_then(|(_, rest)| rest.split('/').next())
        .ok_or(HltvError::RequiredFragmentMissing {
            context: "team id in lineup team link",
        })?
        .parse()?;
    let team_name = element_text(&team_link).unwrap_or_default();

    let rank_selector = Selector::parse("div.teamRanking > a")?;
    let world_rank = select_text(lineup, &rank_selector).and_then(|text| parse_world_rank(&text));

    let player_selector = Selector::parse("td.player > div.flagAlign")?;
    let players = lineup
        .select(&player_selector)
        .filter_map(|e| {
            let player_id = e.value().attr("data-player-id")?.trim().to_string();
            let nickname = element_text(&e)?;
            Some(LineupPlayer {
                player_id,
                nickname,
            })
        })
        .unique_by(|p| p.player_id.clone())
        .collect_vec();

    Ok(TeamLineup {
        team_id,
        team_name,
        world_rank,
        players,
    })
}

/// `"World rank: #12"` → `Some(12)`; anything else is unranked.
fn parse_world_rank(text: &str) -> Option<u32> {
    text.rsplit('#').next()?.trim().parse().ok()
}

/// Per-map stats keyed by the header's team names, or by the lineup team
/// names when the header is missing.
pub(crate) fn parse_map_stats(document: &Html, lineups: &[TeamLineup]) -> Result<Vec<MapStat>> {
    let header_selector = Selector::parse("div.map-stats-infobox-header")?;
    let (team1, team2) = document
        .select(&header_selector)
        .next()
        .map(|header| {
            let cells = child_cells(&header);
            (
                cells.get(1).and_then(element_text),
                cells.get(2).and_then(element_text),
            )
        })
        .unwrap_or_default();
    let lineup_name = |index: usize| {
        lineups
            .get(index)
            .map(|l| l.team_name.clone())
            .unwrap_or_else(|| format!("team{}", index + 1))
    };
    let team1 = team1.unwrap_or_else(|| lineup_name(0));
    let team2 = team2.unwrap_or_else(|| lineup_name(1));

    let maps_selector = Selector::parse("div.map-stats-infobox-maps")?;
    let map_name_selector = Selector::parse(".mapname")?;
    let win_selector = Selector::parse(".map-stats-infobox-winpercentage")?;
    let played_selector = Selector::parse(".map-stats-infobox-maps-played")?;

    let stats = document
        .select(&maps_selector)
        .map(|item| {
            let columns = child_cells(&item);
            let column_stat = |index: usize| {
                let column = columns.get(index);
                MapTeamStat {
                    win_percentage: column.and_then(|c| select_text(c, &win_selector)),
                    maps_played: column.and_then(|c| select_text(c, &played_selector)),
                }
            };
            let mut per_team_stat = OrderedMap::new();
            per_team_stat.insert(team1.clone(), column_stat(1));
            per_team_stat.insert(team2.clone(), column_stat(2));
            MapStat {
                map_name: select_text(&item, &map_name_selector),
                per_team_stat,
            }
        })
        .collect_vec();
    Ok(stats)
}

pub(crate) fn parse_past_results(document: &Html) -> Result<Vec<TeamRecentForm>> {
    let box_selector =
        Selector::parse("div.past-matches > :nth-child(3) > div.past-matches-box")?;
    let headline_selector = Selector::parse(".past-matches-headline")?;
    let row_selector = Selector::parse("tbody > tr")?;
    let opponent_selector = Selector::parse(".past-matches-teamname")?;
    let map_selector = Selector::parse(".past-matches-map")?;
    let score_selector = Selector::parse(".past-matches-score")?;

    let forms = document
        .select(&box_selector)
        .map(|item| TeamRecentForm {
            team: select_text(&item, &headline_selector),
            matches: item
                .select(&row_selector)
                .map(|row| RecentResult {
                    opponent: select_text(&row, &opponent_selector),
                    map: select_text(&row, &map_selector),
                    score: select_text(&row, &score_selector),
                })
                .collect(),
        })
        .collect_vec();
    Ok(forms)
}

/// Keep one entry per team: extra boxes are dropped, missing ones are empty.
fn align_to_lineups(mut forms: Vec<TeamRecentForm>) -> Vec<TeamRecentForm> {
    if forms.len() > TEAMS_PER_MATCH {
        warn!(count = forms.len(), "more past results boxes than teams, keeping the first two");
    } else if forms.len() < TEAMS_PER_MATCH {
        debug!(count = forms.len(), "past results missing for some teams");
    }
    forms.resize_with(TEAMS_PER_MATCH, TeamRecentForm::default);
    forms
}

pub(crate) fn parse_head_to_head(document: &Html) -> Result<HeadToHead> {
    let block_selector = Selector::parse("div.head-to-head")?;
    let stats = match document.select(&block_selector).next() {
        Some(block) => {
            let team1_selector = Selector::parse(".team1")?;
            let team1_wins_selector = Selector::parse(".right-border > .bold")?;
            let team2_selector = Selector::parse(".team2")?;
            let team2_wins_selector = Selector::parse(".left-border > .bold")?;
            let overtimes_selector = Selector::parse(".padding > :nth-child(3) > .bold")?;
            HeadToHeadStats {
                team1: Some(HeadToHeadWins {
                    team: select_text(&block, &team1_selector),
                    wins: select_text(&block, &team1_wins_selector),
                }),
                team2: Some(HeadToHeadWins {
                    team: select_text(&block, &team2_selector),
                    wins: select_text(&block, &team2_wins_selector),
                }),
                overtimes: select_text(&block, &overtimes_selector),
            }
        }
        None => HeadToHeadStats::default(),
    };

    let row_selector = Selector::parse("div.head-to-head-listing table tbody tr")?;
    let date_selector = Selector::parse(".date")?;
    let team1_selector = Selector::parse(".team1")?;
    let team2_selector = Selector::parse(".team2")?;
    let event_selector = Selector::parse(".event")?;
    let map_selector = Selector::parse(".map .dynamic-map-name-full")?;
    let result_selector = Selector::parse(".result")?;
    let listing = document
        .select(&row_selector)
        .map(|row| HeadToHeadMatch {
            date: select_text(&row, &date_selector),
            team1: select_text(&row, &team1_selector),
            team2: select_text(&row, &team2_selector),
            event: select_text(&row, &event_selector),
            map: select_text(&row, &map_selector),
            result: select_text(&row, &result_selector),
        })
        .collect_vec();

    Ok(HeadToHead { stats, listing })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEUP_MOUZ: &str = r#"
      <div class="lineup standard-box">
        <div class="box-headline flex-align-center">
          <div class="flex-align-center">
            <a href="/team/4494/mouz" class="text-ellipsis">MOUZ</a>
          </div>
          <div class="teamRanking"><a href="/ranking/teams">World rank: <span>#3</span></a></div>
        </div>
        <div class="players"><table><tbody>
          <tr>
            <td class="player"><div class="flagAlign" data-player-id="11816"><div class="text-ellipsis">torzsi</div></div></td>
            <td class="player"><div class="flagAlign" data-player-id="16920"><div class="text-ellipsis">xertioN</div></div></td>
          </tr>
          <tr>
            <td class="player"><div class="flagAlign" data-player-id="11816"><div class="text-ellipsis">torzsi</div></div></td>
          </tr>
        </tbody></table></div>
      </div>"#;

    const LINEUP_KOGUTOS: &str = r#"
      <div class="lineup standard-box">
        <div class="box-headline flex-align-center">
          <div class="flex-align-center">
            <a href="/team/12345/los-kogutos" class="text-ellipsis">Los Kogutos</a>
          </div>
        </div>
        <div class="players"><table><tbody>
          <tr>
            <td class="player"><div class="flagAlign" data-player-id="500"><div class="text-ellipsis">kogut</div></div></td>
          </tr>
        </tbody></table></div>
      </div>"#;

    fn match_page(extra: &str) -> String {
        format!(
            r#"<html><body>
              <div class="timeAndEvent"><div class="event text-ellipsis"><a href="/events/1/x">BLAST Premier</a></div></div>
              <div class="padding preformatted-text">Best of 3 (LAN)
              * Lower bracket final</div>
              <div class="lineups">{LINEUP_MOUZ}{LINEUP_KOGUTOS}</div>
              {extra}
            </body></html>"#
        )
    }

    #[test]
    fn test_parse_lineups() {
        let document = Html::parse_document(&match_page(""));
        let lineups = parse_lineups(&document).unwrap();

        assert_eq!(lineups.len(), 2);
        assert_eq!(lineups[0].team_id, 4494);
        assert_eq!(lineups[0].team_name, "MOUZ");
        assert_eq!(lineups[0].world_rank, Some(3));
        let nicknames = lineups[0].players.iter().map(|p| p.nickname.as_str()).collect_vec();
        assert_eq!(nicknames, vec!["torzsi", "xertioN"]);

        assert_eq!(lineups[1].team_id, 12345);
        assert_eq!(lineups[1].team_name, "Los Kogutos");
        assert_eq!(lineups[1].world_rank, None);
        assert_eq!(lineups[1].players[0].player_id, "500");
    }

    #[test]
    fn test_parse_lineups_missing_is_required() {
        let document = Html::parse_document("<html><body><p>maintenance</p></body></html>");
        let err = parse_lineups(&document).unwrap_err();
        assert!(matches!(err, HltvError::RequiredFragmentMissing { .. }));
    }

    #[test]
    fn test_parse_lineups_rejects_single_team() {
        let html = format!("<div class=\"lineups\">{LINEUP_MOUZ}</div>");
        let document = Html::parse_document(&html);
        assert!(parse_lineups(&document).is_err());
    }

    #[test]
    fn test_parse_world_rank() {
        assert_eq!(parse_world_rank("World rank: #12"), Some(12));
        assert_eq!(parse_world_rank("World rank:#1"), Some(1));
        assert_eq!(parse_world_rank("Unranked"), None);
    }

    #[test]
    fn test_parse_map_stats() {
        let html = match_page(
            r#"<div class="map-stats-infobox">
                 <div class="map-stats-infobox-header"><div>Map</div><div>MOUZ</div><div>Los Kogutos</div></div>
                 <div class="map-stats-infobox-maps">
                   <div class="map-stats-infobox-mapname-holder"><div class="mapname">Mirage</div></div>
                   <div class="map-stats-infobox-stats">
                     <div class="map-stats-infobox-winpercentage">64%</div>
                     <div class="map-stats-infobox-maps-played">14 maps</div>
                   </div>
                   <div class="map-stats-infobox-stats">
                     <div class="map-stats-infobox-winpercentage">-</div>
                     <div class="map-stats-infobox-maps-played">0 maps</div>
                   </div>
                 </div>
                 <div class="map-stats-infobox-maps">
                   <div class="map-stats-infobox-mapname-holder"><div class="mapname">Nuke</div></div>
                   <div class="map-stats-infobox-stats">
                     <div class="map-stats-infobox-winpercentage">50%</div>
                   </div>
                 </div>
               </div>"#,
        );
        let document = Html::parse_document(&html);
        let lineups = parse_lineups(&document).unwrap();
        let stats = parse_map_stats(&document, &lineups).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].map_name.as_deref(), Some("Mirage"));
        assert_eq!(stats[0].per_team_stat.len(), 2);
        let mouz = stats[0].per_team_stat.get("MOUZ").unwrap();
        assert_eq!(mouz.win_percentage.as_deref(), Some("64%"));
        assert_eq!(mouz.maps_played.as_deref(), Some("14 maps"));

        let nuke_mouz = stats[1].per_team_stat.get("MOUZ").unwrap();
        assert_eq!(nuke_mouz.maps_played, None);
        let nuke_kogutos = stats[1].per_team_stat.get("Los Kogutos").unwrap();
        assert_eq!(nuke_kogutos.win_percentage, None);
    }

    #[test]
    fn test_parse_map_stats_without_header_uses_lineup_names() {
        let html = match_page(
            r#"<div class="map-stats-infobox">
                 <div class="map-stats-infobox-maps">
                   <div class="map-stats-infobox-mapname-holder"><div class="mapname">Dust2</div></div>
                   <div class="map-stats-infobox-stats"><div class="map-stats-infobox-winpercentage">55%</div></div>
                   <div class="map-stats-infobox-stats"><div class="map-stats-infobox-winpercentage">40%</div></div>
                 </div>
               </div>"#,
        );
        let document = Html::parse_document(&html);
        let lineups = parse_lineups(&document).unwrap();
        let stats = parse_map_stats(&document, &lineups).unwrap();

        assert_eq!(
            stats[0].per_team_stat.keys().collect_vec(),
            vec!["MOUZ", "Los Kogutos"]
        );
        let kogutos = stats[0].per_team_stat.get("Los Kogutos").unwrap();
        assert_eq!(kogutos.win_percentage.as_deref(), Some("40%"));
    }

    #[test]
    fn test_parse_past_results_reads_only_the_team_grid() {
        let html = match_page(
            r#"<div class="past-matches">
                 <div class="standard-headline">Past 3 months</div>
                 <div class="past-matches-filtered">
                   <div class="past-matches-box"><div class="past-matches-headline">FILTERED-A</div></div>
                   <div class="past-matches-box"><div class="past-matches-headline">FILTERED-B</div></div>
                 </div>
                 <div class="past-matches-grid">
                   <div class="past-matches-box"><div class="past-matches-headline">MOUZ</div></div>
                   <div class="past-matches-box"><div class="past-matches-headline">Los Kogutos</div></div>
                 </div>
               </div>"#,
        );
        let document = Html::parse_document(&html);
        let page = parse_match_page(&document).unwrap();

        let teams = page.past_results.iter().map(|f| f.team.as_deref()).collect_vec();
        assert_eq!(teams, vec![Some("MOUZ"), Some("Los Kogutos")]);
    }

    #[test]
    fn test_parse_past_results_aligned_to_two_teams() {
        let html = match_page(
            r#"<div class="past-matches">
                 <div class="standard-headline">Past 3 months</div>
                 <div class="past-matches-filtered"></div>
                 <div class="past-matches-grid">
                   <div class="past-matches-box">
                     <div class="past-matches-headline">MOUZ</div>
                     <table><tbody>
                       <tr><td class="past-matches-teamname">FaZe</td><td class="past-matches-map">Inferno</td><td class="past-matches-score">13 - 9</td></tr>
                       <tr><td class="past-matches-teamname">G2</td><td class="past-matches-map">Nuke</td><td class="past-matches-score">7 - 13</td></tr>
                     </tbody></table>
                   </div>
                 </div>
               </div>"#,
        );
        let document = Html::parse_document(&html);
        let page = parse_match_page(&document).unwrap();

        assert_eq!(page.past_results.len(), 2);
        assert_eq!(page.past_results[0].team.as_deref(), Some("MOUZ"));
        assert_eq!(page.past_results[0].matches.len(), 2);
        assert_eq!(page.past_results[0].matches[1].score.as_deref(), Some("7 - 13"));
        assert_eq!(page.past_results[1].team, None);
        assert!(page.past_results[1].matches.is_empty());
    }

    #[test]
    fn test_parse_head_to_head() {
        let html = match_page(
            r#"<div class="head-to-head">
                 <div class="padding">
                   <div class="right-border"><div class="team1">MOUZ</div><div class="bold">4</div><div>Wins</div></div>
                   <div class="vs">vs</div>
                   <div class="overtimes"><div class="bold">1</div><div>Overtimes</div></div>
                   <div class="left-border"><div class="team2">Los Kogutos</div><div class="bold">2</div><div>Wins</div></div>
                 </div>
               </div>
               <div class="head-to-head-listing"><table><tbody>
                 <tr>
                   <td class="date">2024-05-01</td><td class="team1">MOUZ</td><td class="team2">Los Kogutos</td>
                   <td class="event">ESL Pro League</td><td class="map"><div class="dynamic-map-name-full">Ancient</div></td>
                   <td class="result">13 - 10</td>
                 </tr>
               </tbody></table></div>"#,
        );
        let document = Html::parse_document(&html);
        let h2h = parse_head_to_head(&document).unwrap();

        let team1 = h2h.stats.team1.unwrap();
        assert_eq!(team1.team.as_deref(), Some("MOUZ"));
        assert_eq!(team1.wins.as_deref(), Some("4"));
        let team2 = h2h.stats.team2.unwrap();
        assert_eq!(team2.team.as_deref(), Some("Los Kogutos"));
        assert_eq!(team2.wins.as_deref(), Some("2"));
        assert_eq!(h2h.stats.overtimes.as_deref(), Some("1"));

        assert_eq!(h2h.listing.len(), 1);
        assert_eq!(h2h.listing[0].map.as_deref(), Some("Ancient"));
        assert_eq!(h2h.listing[0].result.as_deref(), Some("13 - 10"));
    }

    #[test]
    fn test_parse_head_to_head_absent() {
        let document = Html::parse_document(&match_page(""));
        let h2h = parse_head_to_head(&document).unwrap();

        let json = serde_json::to_value(&h2h).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stats": {"team1": null, "team2": null, "overtimes": null},
                "listing": []
            })
        );
    }

    #[test]
    fn test_parse_match_page_header() {
        let html = match_page(
            r#"<a class="matchpage-analytics-center-container" href="/betting/analytics/2371234/mouz-vs-los-kogutos">Analytics</a>"#,
        );
        let document = Html::parse_document(&html);
        let page = parse_match_page(&document).unwrap();

        assert_eq!(page.title.as_deref(), Some("BLAST Premier"));
        assert_eq!(page.format.as_deref(), Some("Best of 3 (LAN)"));
        assert_eq!(
            page.analytics_url.as_deref(),
            Some("https://www.hltv.org/betting/analytics/2371234/mouz-vs-los-kogutos")
        );
        assert!(page.map_stats.is_empty());
    }

    #[test]
    fn test_parse_match_page_is_deterministic() {
        let html = match_page("");
        let first = parse_match_page(&Html::parse_document(&html)).unwrap();
        let second = parse_match_page(&Html::parse_document(&html)).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.analytics_url, None);
    }
}
